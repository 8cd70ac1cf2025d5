//! Saída dos comandos - texto colorido ou TOML

use anyhow::{Context, Result};
use bellows::core::{LinuxImage, utils};
use clap::ValueEnum;
use serde::Serialize;

/// Formato de saída
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Texto para terminal
    Text,
    /// Relatório TOML (para scripts)
    Toml,
}

#[derive(Debug, Serialize)]
struct Report {
    images: Vec<ImageReport>,
}

#[derive(Debug, Serialize)]
struct ImageReport {
    label: String,
    name: String,
    cmdline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kernel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    initrd: Option<String>,
}

impl From<&LinuxImage> for ImageReport {
    fn from(image: &LinuxImage) -> Self {
        Self {
            label: image.label.clone(),
            name: image.name.clone(),
            cmdline: image.cmdline.clone(),
            kernel: image.kernel.as_ref().map(|r| r.url().to_string()),
            initrd: image.initrd.as_ref().map(|r| r.url().to_string()),
        }
    }
}

/// Imprime as imagens resolvidas, em ordem de boot
pub fn emit(images: &[LinuxImage], format: Format, verbose: bool) -> Result<()> {
    match format {
        Format::Text => {
            if images.is_empty() {
                utils::print_warning("Nenhuma entrada de boot encontrada");
                return Ok(());
            }
            for (i, image) in images.iter().enumerate() {
                utils::print_image(i + 1, image);
                if verbose {
                    println!("{}", image);
                }
            }
            utils::print_success(&format!("{} imagem(ns) resolvida(s)", images.len()));
        }
        Format::Toml => {
            let report = Report {
                images: images.iter().map(ImageReport::from).collect(),
            };
            let out = toml::to_string(&report).context("Failed to serialize report")?;
            print!("{}", out);
        }
    }
    Ok(())
}
