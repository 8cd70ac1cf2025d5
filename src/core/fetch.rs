//! Resource fetching keyed by URL scheme.
//!
//! Two kinds of access:
//! - `fetch`: eager, whole content (config text)
//! - `lazy_fetch`: a [`Resource`] handle for random-access reads (kernel, initrd)
//!
//! The resolver never reads a [`Resource`]; it only acquires it.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::config;
use super::error::FetchError;
use super::url::{Url, join_paths};

// ============================================================================
// LAZY HANDLES
// ============================================================================

/// Positional reads that do not disturb other readers.
pub trait ReadAt: Send + Sync + fmt::Debug {
    /// Read into `buf` starting at `offset`; `Ok(0)` means end of data.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;
}

/// Lazily fetched blob, owned by exactly one boot entry.
#[derive(Debug)]
pub struct Resource {
    url: Url,
    reader: Box<dyn ReadAt>,
}

impl Resource {
    pub fn new(url: Url, reader: impl ReadAt + 'static) -> Self {
        Self {
            url,
            reader: Box::new(reader),
        }
    }

    /// URL this handle was fetched from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        self.reader.read_at(buf, offset)
    }

    /// Read the whole blob from offset zero.
    pub fn read_to_end(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            let n = self.read_at(&mut chunk, out.len() as u64)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n]);
        }
    }
}

// ============================================================================
// SCHEME REGISTRY
// ============================================================================

/// Fetcher for a single URL scheme.
pub trait Scheme: Send + Sync {
    /// Read the full content at `url`.
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;

    /// Acquire a handle to `url` without reading it.
    fn lazy_fetch(&self, url: &Url) -> Result<Resource, FetchError>;
}

/// Fetchers keyed by scheme name.
pub struct Schemes {
    schemes: HashMap<String, Box<dyn Scheme>>,
}

impl Schemes {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            schemes: HashMap::new(),
        }
    }

    /// Registry serving only local files.
    pub fn local() -> Self {
        let mut schemes = Self::new();
        schemes.register(config::schemes::FILE, FileScheme);
        schemes
    }

    /// Register `scheme` under `name`, replacing any previous fetcher.
    pub fn register(&mut self, name: &str, scheme: impl Scheme + 'static) -> &mut Self {
        self.schemes
            .insert(name.to_ascii_lowercase(), Box::new(scheme));
        self
    }

    pub fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.lookup(url)?.fetch(url)
    }

    pub fn lazy_fetch(&self, url: &Url) -> Result<Resource, FetchError> {
        self.lookup(url)?.lazy_fetch(url)
    }

    fn lookup(&self, url: &Url) -> Result<&dyn Scheme, FetchError> {
        let name = if url.scheme.is_empty() {
            config::schemes::DEFAULT
        } else {
            url.scheme.as_str()
        };
        self.schemes
            .get(name)
            .map(|s| s.as_ref())
            .ok_or_else(|| FetchError::UnsupportedScheme {
                scheme: name.to_string(),
            })
    }
}

impl Default for Schemes {
    fn default() -> Self {
        Self::local()
    }
}

// ============================================================================
// FILE SCHEME
// ============================================================================

/// Local filesystem fetcher. The URL host, if any, prefixes the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileScheme;

impl FileScheme {
    fn path(url: &Url) -> PathBuf {
        PathBuf::from(join_paths(&url.host, &url.path))
    }
}

impl Scheme for FileScheme {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        std::fs::read(Self::path(url)).map_err(|e| FetchError::from_io(url.to_string(), e))
    }

    fn lazy_fetch(&self, url: &Url) -> Result<Resource, FetchError> {
        let path = Self::path(url);
        std::fs::metadata(&path).map_err(|e| FetchError::from_io(url.to_string(), e))?;
        Ok(Resource::new(url.clone(), LazyFile::new(path)))
    }
}

/// File opened on first read.
#[derive(Debug)]
pub struct LazyFile {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl LazyFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: Mutex::new(None),
        }
    }
}

impl ReadAt for LazyFile {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other(format!("{}: handle poisoned", self.path.display())))?;

        if guard.is_none() {
            *guard = Some(File::open(&self.path)?);
        }
        let file = guard
            .as_mut()
            .ok_or_else(|| io::Error::other(format!("{}: not open", self.path.display())))?;
        file.seek(SeekFrom::Start(offset))?;
        file.read(buf)
    }
}

// ============================================================================
// MEMORY SCHEME
// ============================================================================

/// In-memory fetcher keyed by (host, path).
///
/// Paths are cleaned before lookup. Entries marked broken fail with a
/// transport error instead of "not found".
#[derive(Debug, Clone, Default)]
pub struct MemoryScheme {
    files: HashMap<(String, String), Arc<Vec<u8>>>,
    broken: HashSet<(String, String)>,
}

impl MemoryScheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` at `host` + `path`.
    pub fn with_file(mut self, host: &str, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.files
            .insert(Self::key(host, path), Arc::new(content.into()));
        self
    }

    /// Fail every fetch of `host` + `path` with a transport error.
    pub fn with_broken(mut self, host: &str, path: &str) -> Self {
        self.broken.insert(Self::key(host, path));
        self
    }

    /// Paths under a host are rooted, matching how such URLs display.
    fn key(host: &str, path: &str) -> (String, String) {
        let base = if host.is_empty() { "" } else { "/" };
        (host.to_string(), join_paths(base, path))
    }

    fn get(&self, url: &Url) -> Result<Arc<Vec<u8>>, FetchError> {
        let key = Self::key(&url.host, &url.path);
        if self.broken.contains(&key) {
            return Err(FetchError::Transport {
                url: url.to_string(),
                source: io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"),
            });
        }
        self.files
            .get(&key)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })
    }
}

impl Scheme for MemoryScheme {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.get(url).map(|content| content.as_ref().clone())
    }

    fn lazy_fetch(&self, url: &Url) -> Result<Resource, FetchError> {
        let content = self.get(url)?;
        Ok(Resource::new(url.clone(), MemoryBlob(content)))
    }
}

/// Handle over in-memory content.
#[derive(Debug)]
pub struct MemoryBlob(Arc<Vec<u8>>);

impl ReadAt for MemoryBlob {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(self.0.len());
        let n = buf.len().min(self.0.len() - start);
        buf[..n].copy_from_slice(&self.0[start..start + n]);
        Ok(n)
    }
}
