//! File loading, decoding and caching behind the accumulator.

use camino::Utf8Path;
use serde_json::{Map, Value};

use super::cache::{CacheEntry, FileCache};
use crate::decode::{DecodeError, Format, FormatDecoder, into_mapping};
use crate::source::{SourceReader, resolve};
use crate::{StrataError, StrataResult};

/// File name of the package descriptor, relative to the application root.
pub const PACKAGE_DESCRIPTOR: &str = "package.json";
/// Default key holding the descriptor's `name`.
pub const APP_NAME_KEY: &str = "APP_NAME";
/// Default key holding the descriptor's `version`.
pub const APP_VERSION_KEY: &str = "APP_VERSION";
/// Default key holding the application root.
pub const APP_ROOT_KEY: &str = "APP_ROOT";

pub(super) struct FileStore {
    pub(super) cache: FileCache,
    pub(super) reader: Box<dyn SourceReader>,
    pub(super) decoder: Box<dyn FormatDecoder>,
}

impl FileStore {
    pub(super) fn decode(&self, text: &str, format: Format) -> Result<Map<String, Value>, DecodeError> {
        let value = self.decoder.decode(text, format)?;
        into_mapping(value)
    }

    /// Load the file at an already resolved `path`, consulting the cache
    /// first. Only successful loads are cached.
    pub(super) fn load(&mut self, path: &Utf8Path) -> StrataResult<Map<String, Value>> {
        if let Some(entry) = self.cache.get(path) {
            tracing::trace!(%path, missing = entry.is_missing(), "config cache hit");
            return Ok(entry.to_mapping());
        }
        if !self.reader.exists(path) {
            tracing::debug!(%path, "config file not found; contributing nothing");
            self.cache.insert(path.to_path_buf(), CacheEntry::Missing);
            return Ok(Map::new());
        }
        let text = self
            .reader
            .read_text(path)
            .map_err(|err| StrataError::io(path, err))?;
        let format = Format::from_path(path);
        let map = self
            .decode(&text, format)
            .map_err(|err| StrataError::file(path, err))?;
        tracing::debug!(%path, %format, keys = map.len(), "loaded config file");
        self.cache
            .insert(path.to_path_buf(), CacheEntry::Loaded(map.clone()));
        Ok(map)
    }

    pub(super) fn package(&mut self, app_root: &Utf8Path) -> StrataResult<Map<String, Value>> {
        self.load(&resolve(app_root, Utf8Path::new(PACKAGE_DESCRIPTOR)))
    }

    pub(super) fn defaults(&mut self, app_root: &Utf8Path) -> StrataResult<Map<String, Value>> {
        let mut package = self.package(app_root)?;
        let mut defaults = Map::new();
        defaults.insert(
            APP_NAME_KEY.to_owned(),
            package.remove("name").unwrap_or(Value::Null),
        );
        defaults.insert(
            APP_VERSION_KEY.to_owned(),
            package.remove("version").unwrap_or(Value::Null),
        );
        defaults.insert(
            APP_ROOT_KEY.to_owned(),
            Value::String(app_root.as_str().to_owned()),
        );
        tracing::debug!(%app_root, "computed default configuration");
        Ok(defaults)
    }
}
