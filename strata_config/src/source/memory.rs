//! In-memory source reader.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::RwLock;

use super::SourceReader;

/// Reader serving sources from an in-memory table keyed by absolute path.
///
/// Entries can be added or removed after the reader has been handed to an
/// accumulator (share it through an [`std::sync::Arc`]), which makes it
/// convenient for tests and for applications that embed their defaults.
///
/// # Examples
///
/// ```rust
/// use camino::Utf8Path;
/// use strata_config::{MemoryReader, SourceReader};
///
/// let reader = MemoryReader::new().with_source("/app/package.json", r#"{"name": "demo"}"#);
/// assert!(reader.exists(Utf8Path::new("/app/package.json")));
/// assert!(!reader.exists(Utf8Path::new("/app/missing.json")));
/// ```
#[derive(Debug, Default)]
pub struct MemoryReader {
    sources: RwLock<BTreeMap<Utf8PathBuf, String>>,
}

impl MemoryReader {
    /// Create an empty reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source and return the reader, for builder-style setup.
    #[must_use]
    pub fn with_source(self, path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Add or replace the source at `path`.
    pub fn insert(&self, path: impl Into<Utf8PathBuf>, text: impl Into<String>) {
        self.sources.write().insert(path.into(), text.into());
    }

    /// Remove the source at `path`, returning its previous text.
    pub fn remove(&self, path: impl AsRef<Utf8Path>) -> Option<String> {
        self.sources.write().remove(path.as_ref())
    }
}

impl SourceReader for MemoryReader {
    fn exists(&self, path: &Utf8Path) -> bool {
        self.sources.read().contains_key(path)
    }

    fn read_text(&self, path: &Utf8Path) -> std::io::Result<String> {
        self.sources.read().get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no in-memory source registered for '{path}'"),
            )
        })
    }
}
