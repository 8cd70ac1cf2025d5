//! Bellows - Resolvedor de configs de boot do Redstone OS
//!
//! O fole que alimenta a forja.
//!
//! # Trocadilho
//! - Ignite (bootloader) = Acende a forja
//! - Bellows (config resolver) = Sopra o fogo
//! - Forge (kernel) = A forja
//! - Anvil (build tool) = A bigorna
//!
//! # Uso
//! ```bash
//! bellows probe /mnt/iso
//! bellows local /mnt/iso
//! bellows parse isolinux.cfg --wd file:///mnt/iso/isolinux --format toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::report::Format;

#[derive(Parser)]
#[command(name = "bellows")]
#[command(about = "🔥 Bellows - O fole que alimenta a forja do Redstone OS", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lista os caminhos de config procurados num disco
    Probe {
        /// Raiz do disco montado (marca os que existem)
        dir: Option<PathBuf>,
    },

    /// Resolve a config syslinux/isolinux de um disco montado
    Local {
        /// Raiz do disco montado
        dir: PathBuf,

        /// Formato de saída
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Resolve uma config syslinux a partir de uma URL ou caminho
    Parse {
        /// Config inicial (URL ou caminho relativo a --wd)
        reference: String,

        /// Diretório de trabalho (ex: tftp://10.0.0.1/pxe)
        #[arg(long)]
        wd: Option<String>,

        /// Formato de saída
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

impl Commands {
    fn format(&self) -> Format {
        match self {
            Commands::Probe { .. } => Format::Text,
            Commands::Local { format, .. } | Commands::Parse { format, .. } => *format,
        }
    }
}

/// RUST_LOG wins; otherwise --verbose/--quiet pick the level
fn init_tracing(verbose: bool, quiet: bool) -> Result<()> {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    // Banner
    if !cli.quiet && cli.command.format() == Format::Text {
        println!(
            "{}",
            "🔥 Bellows - Resolvedor de configs de boot do Redstone OS"
                .bright_cyan()
                .bold()
        );
        println!("{}", "   O fole que alimenta a forja".bright_black());
        println!();
    }

    match cli.command {
        Commands::Probe { dir } => commands::probe::run(dir, cli.verbose)?,
        Commands::Local { dir, format } => commands::local::run(&dir, format, cli.verbose)?,
        Commands::Parse {
            reference,
            wd,
            format,
        } => commands::parse::run(&reference, wd.as_deref(), format, cli.verbose)?,
    }

    Ok(())
}
