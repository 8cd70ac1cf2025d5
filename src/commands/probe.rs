//! Comando probe - Lista os caminhos de config procurados

use anyhow::Result;
use bellows::core::{probe, utils};
use colored::*;
use std::path::PathBuf;

pub fn run(dir: Option<PathBuf>, _verbose: bool) -> Result<()> {
    println!("{}", "🔍 Caminhos de config (em ordem):".bright_cyan());

    if let Some(ref d) = dir {
        println!("   Disco: {}", d.display().to_string().bright_green());
    }
    println!();

    for (i, candidate) in probe::probe_candidates().iter().enumerate() {
        let present = dir.as_ref().map(|d| d.join(candidate).is_file());
        utils::print_candidate(i + 1, candidate, present);
    }

    Ok(())
}
