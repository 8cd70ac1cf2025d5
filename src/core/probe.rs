//! Probe module - Candidate config locations on a mounted disk
//!
//! Search order from the syslinux wiki: directory-major, filename-minor.

use super::config;

/// Ordered list of config paths, relative to the disk root.
pub fn probe_candidates() -> Vec<String> {
    let mut files = Vec::with_capacity(config::probe::DIRS.len() * config::probe::CONFIGS.len());
    for dir in config::probe::DIRS {
        for conf in config::probe::CONFIGS {
            if dir.is_empty() {
                files.push(conf.to_string());
            } else {
                files.push(format!("{}/{}", dir, conf));
            }
        }
    }
    files
}

/// Split a candidate into its directory and filename parts.
///
/// The directory is empty for candidates at the disk root.
pub fn split_candidate(candidate: &str) -> (&str, &str) {
    match candidate.rfind('/') {
        Some(idx) => (&candidate[..idx], &candidate[idx + 1..]),
        None => ("", candidate),
    }
}
