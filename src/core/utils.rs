//! Utilities module - Terminal output for the CLI

use colored::*;

use super::fetch::Resource;
use super::image::LinuxImage;

/// Print a step message
pub fn print_step(message: &str) {
    println!("   {} {}", "→".bright_blue(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("   {} {}", "✓".bright_green(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("   {} {}", "⚠".bright_yellow(), message);
}

/// Print a probe candidate, marking whether it exists on disk
pub fn print_candidate(position: usize, candidate: &str, present: Option<bool>) {
    let marker = match present {
        Some(true) => "✓".bright_green(),
        Some(false) => "✗".bright_black(),
        None => "·".bright_black(),
    };
    println!("   {} {:>2}. {}", marker, position, candidate.bright_cyan());
}

/// Print one resolved image in boot order
pub fn print_image(position: usize, image: &LinuxImage) {
    let handle = |r: &Option<Resource>| {
        r.as_ref()
            .map_or_else(|| "-".to_string(), |r| r.url().to_string())
    };

    println!(
        "   {} {} {}",
        format!("{}.", position).bright_blue(),
        image.name.bright_cyan().bold(),
        format!("[{}]", image.label).bright_black()
    );
    println!("      kernel:  {}", handle(&image.kernel));
    println!("      initrd:  {}", handle(&image.initrd));
    println!("      cmdline: {}", image.cmdline.bright_black());
}
