//! Comando parse - Resolve uma config syslinux a partir de uma URL

use anyhow::{Context, Result};
use bellows::core::{Schemes, Url, syslinux, utils};
use colored::*;

use super::report::{self, Format};

pub fn run(reference: &str, wd: Option<&str>, format: Format, verbose: bool) -> Result<()> {
    let wd = wd
        .map(Url::parse)
        .transpose()
        .context("Invalid working directory URL")?;

    if format == Format::Text {
        println!("{}", "📜 Lendo config syslinux...".bright_yellow());
        println!("   Config: {}", reference.bright_green());
        if let Some(ref wd) = wd {
            println!("   Diretório: {}", wd.to_string().bright_green());
        }
        utils::print_step("Resolvendo entradas de boot...");
    }

    let images = syslinux::parse_config(wd.as_ref(), reference, &Schemes::local())
        .context(format!("Failed to resolve {}", reference))?;

    report::emit(&images, format, verbose)
}
