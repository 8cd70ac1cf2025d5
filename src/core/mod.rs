//! Módulo core - Resolvedor de configurações syslinux/isolinux
//!
//! Fluxo: probe → url + fetch → parser (recursivo em `include`) → initrd → order

pub mod config;
pub mod error;
pub mod fetch;
pub mod image;
pub mod initrd;
pub mod order;
pub mod parser;
pub mod probe;
pub mod syslinux;
pub mod url;
pub mod utils;

pub use error::{FetchError, Result, SyslinuxError, UrlError};
pub use fetch::{FileScheme, MemoryScheme, Resource, Scheme, Schemes};
pub use image::LinuxImage;
pub use syslinux::{parse_config, parse_local_config, parse_local_config_with};
pub use url::Url;
