//! Memoisation of file loads keyed by resolved path.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value};

/// Outcome of loading a file, as remembered by the cache.
#[derive(Clone, Debug, PartialEq)]
pub enum CacheEntry {
    /// The file existed and decoded to this mapping.
    Loaded(Map<String, Value>),
    /// The file did not exist; it contributes an empty mapping.
    Missing,
}

impl CacheEntry {
    /// Returns the mapping this entry contributes to a merge.
    #[must_use]
    pub fn to_mapping(&self) -> Map<String, Value> {
        match self {
            Self::Loaded(map) => map.clone(),
            Self::Missing => Map::new(),
        }
    }

    /// Returns `true` when the file was absent.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Append-only cache of file loads.
///
/// Entries are never invalidated: once a path has been loaded, later changes
/// to the file on disk are not observed for the lifetime of the accumulator.
/// Decode and read failures are not recorded.
#[derive(Clone, Debug, Default)]
pub struct FileCache {
    entries: HashMap<Utf8PathBuf, CacheEntry>,
}

impl FileCache {
    /// Look up the entry for a resolved path.
    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<&CacheEntry> {
        self.entries.get(path)
    }

    /// Returns `true` if `path` has been loaded before.
    #[must_use]
    pub fn contains(&self, path: &Utf8Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of cached paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over cached paths and their entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Utf8Path, &CacheEntry)> {
        self.entries.iter().map(|(path, entry)| (path.as_path(), entry))
    }

    pub(crate) fn insert(&mut self, path: Utf8PathBuf, entry: CacheEntry) {
        self.entries.insert(path, entry);
    }
}
