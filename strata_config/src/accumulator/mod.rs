//! The configuration accumulator.
//!
//! A [`ConfigAccumulator`] owns one snapshot mapping and folds sources into
//! it in the order they are added. Files are memoised by resolved path and
//! the package-derived defaults are computed at most once, the first time
//! the snapshot is read or written.

mod builder;
mod cache;
mod snapshot;
mod store;

pub use builder::ConfigAccumulatorBuilder;
pub use cache::{CacheEntry, FileCache};
pub use snapshot::SnapshotState;
pub use store::{APP_NAME_KEY, APP_ROOT_KEY, APP_VERSION_KEY, PACKAGE_DESCRIPTOR};

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use self::snapshot::Snapshot;
use self::store::FileStore;
use crate::decode::{Format, FormatDecoder};
use crate::layer::AppliedSource;
use crate::merge::merge_mapping;
use crate::script::ScriptRunner;
use crate::source::{SourceReader, resolve};
use crate::{StrataError, StrataResult, StrataResultExt, from_snapshot};

/// Accumulates configuration from files, strings, mappings and patch
/// scripts into a single deep-merged snapshot.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use strata_config::{ConfigAccumulator, MemoryReader};
///
/// # fn main() -> strata_config::StrataResult<()> {
/// let reader = MemoryReader::new()
///     .with_source("/app/package.json", r#"{"name": "demo", "version": "1.2.0"}"#)
///     .with_source("/app/config/base.yaml", "server:\n  port: 80\n  host: example\n");
/// let mut config = ConfigAccumulator::builder()
///     .app_root("/app")
///     .reader(reader)
///     .build()?;
/// config
///     .add_file("config/base.yaml")?
///     .add_string(r#"{ server: { port: 8080 } }"#)?
///     .add_script("server.tls = true")?;
///
/// assert_eq!(
///     config.to_value()?,
///     json!({
///         "APP_NAME": "demo",
///         "APP_VERSION": "1.2.0",
///         "APP_ROOT": "/app",
///         "server": {"port": 8080, "host": "example", "tls": true}
///     })
/// );
/// # Ok(())
/// # }
/// ```
pub struct ConfigAccumulator {
    app_root: Utf8PathBuf,
    snapshot: Snapshot,
    store: FileStore,
    script_runner: Box<dyn ScriptRunner>,
    applied: Vec<AppliedSource>,
}

impl fmt::Debug for ConfigAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigAccumulator")
            .field("app_root", &self.app_root)
            .field("snapshot", &self.snapshot.get())
            .field("file_cache", &self.store.cache)
            .field("applied", &self.applied)
            .finish_non_exhaustive()
    }
}

impl ConfigAccumulator {
    /// Create an accumulator rooted at `app_root` that reads from the
    /// filesystem, decodes with [`StandardDecoder`](crate::StandardDecoder) and runs
    /// [`PatchScript`](crate::PatchScript) scripts.
    ///
    /// A relative root is resolved against the working directory, so
    /// `APP_ROOT` and cache keys are always absolute.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::AppRoot`] when `app_root` is relative and the
    /// working directory cannot be read.
    pub fn new(app_root: impl Into<Utf8PathBuf>) -> StrataResult<Self> {
        Self::builder().app_root(app_root).build()
    }

    /// Create a filesystem-backed accumulator rooted at the discovered
    /// application root.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::AppRoot`] when the working directory cannot be
    /// determined.
    pub fn discover() -> StrataResult<Self> {
        Self::builder().build()
    }

    /// Start configuring an accumulator with custom collaborators.
    #[must_use]
    pub fn builder() -> ConfigAccumulatorBuilder {
        ConfigAccumulatorBuilder::default()
    }

    fn from_parts(
        app_root: Utf8PathBuf,
        reader: Box<dyn SourceReader>,
        decoder: Box<dyn FormatDecoder>,
        script_runner: Box<dyn ScriptRunner>,
    ) -> Self {
        Self {
            app_root,
            snapshot: Snapshot::default(),
            store: FileStore {
                cache: FileCache::default(),
                reader,
                decoder,
            },
            script_runner,
            applied: Vec::new(),
        }
    }

    /// Returns the root that relative file references resolve against.
    #[must_use]
    pub fn app_root(&self) -> &Utf8Path {
        &self.app_root
    }

    /// Reports whether the snapshot has been materialised.
    #[must_use]
    pub const fn state(&self) -> SnapshotState {
        self.snapshot.state()
    }

    /// Returns the snapshot if it has been materialised, without computing
    /// defaults.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&Map<String, Value>> {
        self.snapshot.get()
    }

    /// Returns the current snapshot, computing the defaults first if nothing
    /// has been accumulated yet.
    ///
    /// # Errors
    ///
    /// Fails only while computing defaults, when the package descriptor
    /// exists but cannot be read or decoded.
    pub fn materialize(&mut self) -> StrataResult<&Map<String, Value>> {
        self.current().map(|map| &*map)
    }

    /// Consume the accumulator and return the owned snapshot.
    ///
    /// # Errors
    ///
    /// See [`ConfigAccumulator::materialize`].
    pub fn into_snapshot(mut self) -> StrataResult<Map<String, Value>> {
        self.current()?;
        Ok(self.snapshot.into_inner().unwrap_or_default())
    }

    /// Returns a copy of the snapshot as a [`Value::Object`].
    ///
    /// # Errors
    ///
    /// See [`ConfigAccumulator::materialize`].
    pub fn to_value(&mut self) -> StrataResult<Value> {
        self.materialize().map(|map| Value::Object(map.clone()))
    }

    /// Deserialise a copy of the snapshot into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Extract`] when the snapshot does not match `T`,
    /// or any error from [`ConfigAccumulator::materialize`].
    pub fn extract<T: DeserializeOwned>(&mut self) -> StrataResult<T> {
        let snapshot = self.materialize()?.clone();
        from_snapshot(snapshot)
    }

    /// Deep merge `incoming` into the snapshot.
    ///
    /// # Errors
    ///
    /// See [`ConfigAccumulator::materialize`].
    pub fn add_config(&mut self, incoming: Map<String, Value>) -> StrataResult<&mut Self> {
        self.merge_in(incoming, AppliedSource::config())
    }

    /// Decode `text` with the permissive JSON5 grammar and deep merge it.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Inline`] when the text is malformed; the
    /// snapshot is left untouched.
    pub fn add_string(&mut self, text: &str) -> StrataResult<&mut Self> {
        self.add_string_as(text, Format::Unspecified)
    }

    /// Decode `text` as `format` and deep merge it.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Inline`] when the text is malformed; the
    /// snapshot is left untouched.
    pub fn add_string_as(&mut self, text: &str, format: Format) -> StrataResult<&mut Self> {
        let incoming = self.store.decode(text, format).map_err(StrataError::inline)?;
        self.merge_in(incoming, AppliedSource::string())
    }

    /// Load the file at `path` (relative to the application root) and deep
    /// merge it. A missing file contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::File`] when the file cannot be decoded and
    /// [`StrataError::Io`] when it exists but cannot be read. Neither outcome
    /// is cached.
    pub fn add_file(&mut self, path: impl AsRef<Utf8Path>) -> StrataResult<&mut Self> {
        let resolved = resolve(&self.app_root, path.as_ref());
        let incoming = self.store.load(&resolved)?;
        self.merge_in(incoming, AppliedSource::file(resolved))
    }

    /// Run a patch script against the live snapshot.
    ///
    /// Assignments replace fields directly instead of merging.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Script`] when the script fails. Statements that
    /// ran before a runtime failure stay applied.
    pub fn add_script(&mut self, script: &str) -> StrataResult<&mut Self> {
        let Self {
            app_root,
            snapshot,
            store,
            script_runner,
            applied,
        } = &mut *self;
        let current = snapshot.get_or_try_init(|| store.defaults(app_root.as_path()))?;
        script_runner.run(script, current).into_strata()?;
        applied.push(AppliedSource::script());
        Ok(self)
    }

    /// Load and decode the file at `path` without merging it, using and
    /// filling the cache exactly like [`ConfigAccumulator::add_file`].
    ///
    /// # Errors
    ///
    /// See [`ConfigAccumulator::add_file`].
    pub fn load_file(&mut self, path: impl AsRef<Utf8Path>) -> StrataResult<Map<String, Value>> {
        let resolved = resolve(&self.app_root, path.as_ref());
        self.store.load(&resolved)
    }

    /// Returns the decoded package descriptor, or an empty mapping when the
    /// application root has none.
    ///
    /// # Errors
    ///
    /// Fails when the descriptor exists but cannot be read or decoded.
    pub fn package(&mut self) -> StrataResult<Map<String, Value>> {
        self.store.package(&self.app_root)
    }

    /// Compute the default mapping: `APP_NAME`, `APP_VERSION` and `APP_ROOT`.
    ///
    /// This never touches the snapshot.
    ///
    /// # Errors
    ///
    /// See [`ConfigAccumulator::package`].
    pub fn defaults(&mut self) -> StrataResult<Map<String, Value>> {
        self.store.defaults(&self.app_root)
    }

    /// Read-only view of the file cache.
    #[must_use]
    pub const fn file_cache(&self) -> &FileCache {
        &self.store.cache
    }

    /// Sources applied so far, in order.
    #[must_use]
    pub fn applied(&self) -> &[AppliedSource] {
        &self.applied
    }

    fn current(&mut self) -> StrataResult<&mut Map<String, Value>> {
        let Self {
            app_root,
            snapshot,
            store,
            ..
        } = self;
        snapshot.get_or_try_init(|| store.defaults(app_root.as_path()))
    }

    fn merge_in(
        &mut self,
        incoming: Map<String, Value>,
        source: AppliedSource,
    ) -> StrataResult<&mut Self> {
        let current = self.current()?;
        tracing::trace!(keys = incoming.len(), ?source, "merging config source");
        merge_mapping(current, incoming);
        self.applied.push(source);
        Ok(self)
    }
}

#[cfg(test)]
mod tests;
