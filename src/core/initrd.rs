//! Initrd backfill from the kernel command line.
//!
//! An entry without an INITRD directive may still name its initrd as an
//! `initrd=` kernel parameter; the explicit directive always wins. When a
//! command line carries several `initrd=` parameters, the first is used.
//! The value resolves against the directory of the file that declared the
//! entry, the same base its `kernel` uses.

use super::config::directives;
use super::error::Result;
use super::fetch::Schemes;
use super::parser::{State, get_file};

/// Fetch the `initrd=` parameter of every entry that has no initrd yet.
///
/// Entries are visited in emission order. Any resolution or fetch failure
/// here is fatal.
pub fn backfill(state: &mut State, schemes: &Schemes) -> Result<()> {
    for label in &state.label_order {
        let Some(entry) = state.entries.get_mut(label) else {
            continue;
        };
        if entry.initrd.is_some() {
            continue;
        }
        if let Some(value) = initrd_param(&entry.cmdline) {
            let wd = state.entry_wd.get(label).and_then(Option::as_ref);
            entry.initrd = Some(get_file(schemes, value, wd)?);
        }
    }
    Ok(())
}

/// Value of the first `initrd=` parameter in `cmdline`.
pub fn initrd_param(cmdline: &str) -> Option<&str> {
    cmdline
        .split_whitespace()
        .filter_map(|opt| opt.split_once('='))
        .find(|(key, _)| *key == directives::INITRD_PARAM)
        .map(|(_, value)| value)
}
