//! Top-level entry points.

use std::path::Path;

use tracing::debug;

use super::error::{Result, SyslinuxError};
use super::fetch::Schemes;
use super::image::LinuxImage;
use super::parser::Parser;
use super::probe::{probe_candidates, split_candidate};
use super::url::Url;

/// Parse the syslinux config at `reference` and return its images in boot order.
///
/// `wd` is the default scheme, host and path for relative references in the
/// top-level file, e.g. kernel, include and initrd paths. `schemes` fetches
/// every file named.
pub fn parse_config(
    wd: Option<&Url>,
    reference: &str,
    schemes: &Schemes,
) -> Result<Vec<LinuxImage>> {
    let mut parser = Parser::new(wd.cloned(), schemes);
    parser.load(reference)?;
    parser.finish()
}

/// Treat `root` as a mount point and parse the first isolinux/syslinux
/// config found under it.
pub fn parse_local_config(root: &Path) -> Result<Vec<LinuxImage>> {
    parse_local_config_with(root, &Schemes::local())
}

/// [`parse_local_config`] with a caller-supplied fetcher set.
///
/// A candidate that fails with "not found" is skipped; any other failure is
/// returned as is.
pub fn parse_local_config_with(root: &Path, schemes: &Schemes) -> Result<Vec<LinuxImage>> {
    for candidate in probe_candidates() {
        let (dir, name) = split_candidate(&candidate);

        // "When booting, the initial working directory for SYSLINUX /
        // ISOLINUX will be the directory containing the initial
        // configuration file."
        let wd = Url::file(&root.join(dir));

        match parse_config(Some(&wd), name, schemes) {
            Err(err) if err.is_not_found() => {
                debug!(candidate = %candidate, error = %err, "skipping config candidate");
            }
            result => return result,
        }
    }

    Err(SyslinuxError::NoValidConfig {
        root: root.to_path_buf(),
    })
}
