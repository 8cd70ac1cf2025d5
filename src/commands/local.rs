//! Comando local - Resolve a config syslinux de um disco montado

use anyhow::{Context, Result};
use bellows::core::{syslinux, utils};
use colored::*;
use std::path::{Path, PathBuf};

use super::report::{self, Format};

pub fn run(dir: &Path, format: Format, verbose: bool) -> Result<()> {
    let root: PathBuf = std::path::absolute(dir)
        .context(format!("Failed to resolve path: {}", dir.display()))?;

    if format == Format::Text {
        println!("{}", "💽 Procurando config syslinux...".bright_yellow());
        println!("   Disco: {}", root.display().to_string().bright_green());
        utils::print_step("Resolvendo entradas de boot...");
    }

    let images = syslinux::parse_local_config(&root)
        .context(format!("Failed to resolve syslinux config on {}", root.display()))?;

    report::emit(&images, format, verbose)
}
