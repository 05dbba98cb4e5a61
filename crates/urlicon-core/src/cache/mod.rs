//! On-disk favicon cache keyed by domain.
//!
//! Each host maps to `<cache_dir>/<domain-key>.ico` holding the raw bytes as
//! received. Entries are never refreshed or removed here; a present file means
//! the host is resolved.

mod key;

pub use key::DomainKey;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Extension of cached icon files.
pub const ICON_SUFFIX: &str = ".ico";

/// Filesystem failure while preparing the cache or storing an icon.
///
/// Unlike network problems this points at a misconfiguration (e.g. an
/// unwritable cache directory) and is reported to the caller.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("create cache directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("write cached icon {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Favicon cache rooted at one directory.
#[derive(Debug, Clone)]
pub struct IconCache {
    dir: PathBuf,
}

impl IconCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Key for `host`, or `None` when the host is empty or unusable.
    pub fn key_for(&self, host: &str) -> Option<DomainKey> {
        DomainKey::for_host(host)
    }

    /// `<cache_dir>/<key>.ico`.
    pub fn path_for(&self, key: &DomainKey) -> PathBuf {
        self.dir.join(format!("{}{}", key.as_str(), ICON_SUFFIX))
    }

    pub fn has(&self, key: &DomainKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Creates the cache directory if needed. Safe to call repeatedly and
    /// from concurrent callers.
    pub fn ensure_dir(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::CreateDir {
            path: self.dir.clone(),
            source,
        })
    }

    /// Writes `bytes` as the icon for `key`, replacing any existing entry.
    ///
    /// Bytes go to a temp file in the cache directory which is then renamed
    /// over the final path, so readers see either the old or the new icon.
    pub fn store(&self, key: &DomainKey, bytes: &[u8]) -> Result<PathBuf, CacheError> {
        self.ensure_dir()?;
        let path = self.path_for(key);
        let write_err = |source: io::Error| CacheError::Write {
            path: path.clone(),
            source,
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}", key.as_str()))
            .suffix(".part")
            .tempfile_in(&self.dir)
            .map_err(write_err)?;
        tmp.write_all(bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        tracing::debug!(key = %key, path = %path.display(), bytes = bytes.len(), "cached icon");
        Ok(path)
    }

    /// Reads a cached icon back.
    pub fn read(&self, key: &DomainKey) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(key))
    }
}
