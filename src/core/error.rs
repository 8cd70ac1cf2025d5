//! Error types for config resolution.
//!
//! Errors are categorized by how the resolver treats them:
//! - [`SyslinuxError::MalformedReference`]: always fatal
//! - [`FetchError::NotFound`]: fatal, except inside `include` and while
//!   probing local candidates
//! - [`FetchError::Transport`] / [`FetchError::UnsupportedScheme`]: always fatal

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the resolver.
pub type Result<T> = std::result::Result<T, SyslinuxError>;

// ============================================================================
// Top-Level Error
// ============================================================================

/// Errors that abort a config resolution.
#[derive(Debug, Error)]
pub enum SyslinuxError {
    /// A file reference could not be parsed as a URL.
    #[error("could not parse URL {reference:?}: {source}")]
    MalformedReference {
        reference: String,
        #[source]
        source: UrlError,
    },

    /// Fetching a config, kernel or initrd failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Every probed candidate on a local disk was missing.
    #[error("no valid syslinux config found on {}", root.display())]
    NoValidConfig { root: PathBuf },
}

impl SyslinuxError {
    /// Whether this error means "the resource is not there".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::NotFound { .. }))
    }
}

// ============================================================================
// Fetch Errors
// ============================================================================

/// Errors reported by a [`Scheme`](super::fetch::Scheme).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The resource does not exist.
    #[error("{url}: not found")]
    NotFound { url: String },

    /// The transport failed for a reason other than absence.
    #[error("{url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: io::Error,
    },

    /// No fetcher is registered for the URL's scheme.
    #[error("no fetcher registered for scheme {scheme:?}")]
    UnsupportedScheme { scheme: String },
}

impl FetchError {
    /// Classify an I/O error for `url`.
    pub fn from_io(url: impl Into<String>, err: io::Error) -> Self {
        let url = url.into();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { url },
            _ => Self::Transport { url, source: err },
        }
    }
}

// ============================================================================
// URL Errors
// ============================================================================

/// Reasons a reference is not a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("invalid control character in URL")]
    ControlCharacter,

    #[error("missing protocol scheme")]
    MissingScheme,

    #[error("first path segment in URL cannot contain colon")]
    ColonInFirstSegment,

    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),

    #[error("invalid port {0:?} after host")]
    InvalidPort(String),
}
