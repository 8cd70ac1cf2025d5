//! URL references and the working-directory resolver.
//!
//! Config files name kernels, initrds and includes either as full URLs
//! (`tftp://10.0.0.1/vmlinuz`) or as bare paths (`../vmlinuz`). A bare path
//! has no scheme, which a strict URL type cannot hold, so references are
//! parsed into the loose [`Url`] below and rebased with [`resolve`].
//!
//! Parses references in the format: `[scheme:][//[user@]host][path][?query][#fragment]`

use std::fmt;
use std::path::Path;

use super::config;
use super::error::{Result, SyslinuxError, UrlError};

/// Parsed URL reference. Every component may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Url {
    /// Lower-cased scheme, empty for relative references.
    pub scheme: String,
    /// Optional userinfo (without trailing '@').
    pub user: Option<String>,
    /// Host with optional port.
    pub host: String,
    /// Percent-decoded path.
    pub path: String,
    /// Optional query string (without leading '?').
    pub query: Option<String>,
    /// Optional fragment (without leading '#').
    pub fragment: Option<String>,
}

impl Url {
    /// Parse a URL reference.
    ///
    /// # Errors
    ///
    /// Returns a [`UrlError`] if:
    /// - The reference contains an ASCII control character
    /// - It starts with ':'
    /// - It is relative and its first path segment contains ':'
    /// - A percent escape is not followed by two hex digits
    /// - The port after the host is not numeric
    pub fn parse(raw: &str) -> std::result::Result<Self, UrlError> {
        if raw.bytes().any(|b| b < 0x20 || b == 0x7f) {
            return Err(UrlError::ControlCharacter);
        }

        let (rest, fragment) = match raw.split_once('#') {
            Some((rest, frag)) => (rest, Some(frag.to_string())),
            None => (raw, None),
        };

        let (scheme, rest) = split_scheme(rest)?;

        let (mut rest, query) = match rest.split_once('?') {
            Some((rest, q)) => (rest, Some(q.to_string())),
            None => (rest, None),
        };

        let mut url = Url {
            scheme: scheme.to_ascii_lowercase(),
            query,
            fragment,
            ..Default::default()
        };

        // Opaque form, e.g. `mailto:root`
        if !url.scheme.is_empty() && !rest.starts_with('/') {
            url.path = unescape(rest)?;
            return Ok(url);
        }

        if rest.starts_with("//") && (!url.scheme.is_empty() || !rest.starts_with("///")) {
            let authority_end = rest[2..].find('/').map_or(rest.len(), |idx| idx + 2);
            let authority = &rest[2..authority_end];
            rest = &rest[authority_end..];

            let (user, host) = match authority.rsplit_once('@') {
                Some((user, host)) => (Some(user.to_string()), host),
                None => (None, authority),
            };
            validate_port(host)?;
            url.user = user;
            url.host = unescape(host)?;
        } else if url.scheme.is_empty() {
            let first_segment = rest.split('/').next().unwrap_or_default();
            if first_segment.contains(':') {
                return Err(UrlError::ColonInFirstSegment);
            }
        }

        url.path = unescape(rest)?;
        Ok(url)
    }

    /// A `file` URL for a local path.
    pub fn file(path: &Path) -> Self {
        Url {
            scheme: config::schemes::FILE.to_string(),
            path: path.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    /// The URL of the directory containing this one.
    pub fn parent(&self) -> Self {
        Url {
            path: parent_path(&self.path),
            query: None,
            fragment: None,
            ..self.clone()
        }
    }

    /// Whether the reference names a scheme.
    pub fn is_absolute(&self) -> bool {
        !self.scheme.is_empty()
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }

        let has_authority = !self.host.is_empty() || self.user.is_some();
        if has_authority || (!self.scheme.is_empty() && self.path.starts_with('/')) {
            f.write_str("//")?;
            if let Some(ref user) = self.user {
                write!(f, "{}@", user)?;
            }
            f.write_str(&self.host)?;
            if has_authority && !self.path.is_empty() && !self.path.starts_with('/') {
                f.write_str("/")?;
            }
        }

        f.write_str(&escape_path(&self.path))?;

        if let Some(ref query) = self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(ref fragment) = self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

/// Turn `reference` into an absolute URL using `wd` as the working directory.
///
/// References that name a scheme are returned unchanged. Otherwise the
/// scheme comes from `wd`; if the reference names no host either, the host
/// comes from `wd` too and the path is joined onto `wd`'s path.
pub fn resolve(reference: &str, wd: Option<&Url>) -> Result<Url> {
    let mut url = Url::parse(reference).map_err(|source| SyslinuxError::MalformedReference {
        reference: reference.to_string(),
        source,
    })?;

    if let Some(wd) = wd.filter(|_| !url.is_absolute()) {
        url.scheme = wd.scheme.clone();

        // No host means this was just a path.
        if url.host.is_empty() {
            url.host = wd.host.clone();
            url.path = join_paths(&wd.path, &clean_path(&url.path));
        }
    }
    Ok(url)
}

/// Lexically clean a slash-separated path.
///
/// Collapses repeated separators, drops `.` elements and folds `..` into the
/// preceding element. `..` at the root stays at the root. An empty result is `.`.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if !rooted => parts.push(".."),
                _ => {}
            },
            s => parts.push(s),
        }
    }

    let joined = parts.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Join path elements, skipping empty ones, and clean the result.
pub fn join_paths(base: &str, rel: &str) -> String {
    match (base.is_empty(), rel.is_empty()) {
        (true, true) => String::new(),
        (true, false) => clean_path(rel),
        (false, true) => clean_path(base),
        (false, false) => clean_path(&format!("{}/{}", base, rel)),
    }
}

/// Directory portion of a path, cleaned.
pub fn parent_path(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => clean_path(&path[..=idx]),
        None => ".".to_string(),
    }
}

fn split_scheme(raw: &str) -> std::result::Result<(&str, &str), UrlError> {
    for (idx, c) in raw.char_indices() {
        match c {
            'a'..='z' | 'A'..='Z' => {}
            '0'..='9' | '+' | '-' | '.' if idx > 0 => {}
            ':' if idx == 0 => return Err(UrlError::MissingScheme),
            ':' => return Ok((&raw[..idx], &raw[idx + 1..])),
            _ => break,
        }
    }
    Ok(("", raw))
}

fn validate_port(host: &str) -> std::result::Result<(), UrlError> {
    // IPv6 literals carry colons inside the brackets
    let tail = match host.strip_prefix('[') {
        Some(v6) => v6.find(']').map_or("", |end| &v6[end + 1..]),
        None => host.rfind(':').map_or("", |idx| &host[idx..]),
    };

    match tail.strip_prefix(':') {
        Some(port) if !port.bytes().all(|b| b.is_ascii_digit()) => {
            Err(UrlError::InvalidPort(port.to_string()))
        }
        _ => Ok(()),
    }
}

fn unescape(s: &str) -> std::result::Result<String, UrlError> {
    if !s.contains('%') {
        return Ok(s.to_string());
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] != b'%' {
            out.push(bytes[idx]);
            idx += 1;
            continue;
        }

        let escape: String = s[idx..].chars().take(3).collect();
        let hex = s
            .get(idx + 1..idx + 3)
            .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| UrlError::InvalidEscape(escape.clone()))?;
        out.push(u8::from_str_radix(hex, 16).map_err(|_| UrlError::InvalidEscape(escape))?);
        idx += 3;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            c => out.push(c),
        }
    }
    out
}
