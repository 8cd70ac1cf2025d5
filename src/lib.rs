//! Bellows - Resolvedor de configurações de boot do Redstone OS
//!
//! O fole que alimenta a forja: lê configs syslinux/isolinux (disco local ou
//! rede) e entrega ao orquestrador de boot a lista ordenada de imagens Linux.
//!
//! # Uso
//! ```no_run
//! use bellows::core::{Schemes, Url, parse_config};
//!
//! let wd = Url::parse("file:///mnt/iso/isolinux").unwrap();
//! let images = parse_config(Some(&wd), "isolinux.cfg", &Schemes::local()).unwrap();
//! for image in &images {
//!     println!("{}", image);
//! }
//! ```

pub mod core;
