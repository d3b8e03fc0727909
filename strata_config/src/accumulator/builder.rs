//! Builder for [`ConfigAccumulator`] with pluggable collaborators.

use std::fmt;

use camino::Utf8PathBuf;

use super::ConfigAccumulator;
use crate::StrataResult;
use crate::decode::{FormatDecoder, StandardDecoder};
use crate::discovery::{absolute_root, discover_app_root};
use crate::script::{PatchScript, ScriptRunner};
use crate::source::{FsReader, SourceReader};

/// Builder for [`ConfigAccumulator`].
///
/// Every collaborator has a default: the filesystem reader, the standard
/// decoder and the patch-script runner. Without an explicit root the
/// application root is discovered when [`build`](Self::build) runs.
///
/// # Examples
///
/// ```rust
/// use strata_config::{ConfigAccumulator, MemoryReader, SnapshotState};
///
/// # fn main() -> strata_config::StrataResult<()> {
/// let config = ConfigAccumulator::builder()
///     .app_root("/srv/app")
///     .reader(MemoryReader::new())
///     .build()?;
/// assert_eq!(config.app_root(), "/srv/app");
/// assert_eq!(config.state(), SnapshotState::Uninitialized);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigAccumulatorBuilder {
    app_root: Option<Utf8PathBuf>,
    reader: Option<Box<dyn SourceReader>>,
    decoder: Option<Box<dyn FormatDecoder>>,
    script_runner: Option<Box<dyn ScriptRunner>>,
}

impl fmt::Debug for ConfigAccumulatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigAccumulatorBuilder")
            .field("app_root", &self.app_root)
            .field("custom_reader", &self.reader.is_some())
            .field("custom_decoder", &self.decoder.is_some())
            .field("custom_script_runner", &self.script_runner.is_some())
            .finish()
    }
}

impl ConfigAccumulatorBuilder {
    /// Sets the root that relative file references resolve against. A
    /// relative root is anchored to the working directory by
    /// [`build`](Self::build).
    #[must_use]
    pub fn app_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.app_root = Some(root.into());
        self
    }

    /// Replaces the filesystem reader.
    #[must_use]
    pub fn reader(mut self, reader: impl SourceReader + 'static) -> Self {
        self.reader = Some(Box::new(reader));
        self
    }

    /// Replaces the text decoder.
    #[must_use]
    pub fn decoder(mut self, decoder: impl FormatDecoder + 'static) -> Self {
        self.decoder = Some(Box::new(decoder));
        self
    }

    /// Replaces the patch-script runner.
    #[must_use]
    pub fn script_runner(mut self, runner: impl ScriptRunner + 'static) -> Self {
        self.script_runner = Some(Box::new(runner));
        self
    }

    /// Finalises the builder.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::AppRoot`] when the working directory is
    /// needed and cannot be read: to discover a root when none was set, or
    /// to anchor a relative one.
    pub fn build(self) -> StrataResult<ConfigAccumulator> {
        let app_root = match self.app_root {
            Some(root) => absolute_root(&root)?,
            None => discover_app_root()?,
        };
        tracing::debug!(%app_root, "configured accumulator");
        Ok(ConfigAccumulator::from_parts(
            app_root,
            self.reader.unwrap_or_else(|| Box::new(FsReader)),
            self.decoder.unwrap_or_else(|| Box::new(StandardDecoder)),
            self.script_runner.unwrap_or_else(|| Box::new(PatchScript)),
        ))
    }
}
