//! Provenance records for applied configuration sources.

use camino::{Utf8Path, Utf8PathBuf};

/// Kind of source that contributed to the snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum SourceProvenance {
    /// An in-memory mapping passed to `add_config`.
    Config,
    /// Inline text passed to `add_string`.
    String,
    /// A file loaded through `add_file`, including missing files.
    File,
    /// A patch script run through `add_script`.
    Script,
}

/// Record of one successful `add_*` call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppliedSource {
    provenance: SourceProvenance,
    path: Option<Utf8PathBuf>,
}

impl AppliedSource {
    /// Record an in-memory mapping.
    #[must_use]
    pub const fn config() -> Self {
        Self {
            provenance: SourceProvenance::Config,
            path: None,
        }
    }

    /// Record an inline string.
    #[must_use]
    pub const fn string() -> Self {
        Self {
            provenance: SourceProvenance::String,
            path: None,
        }
    }

    /// Record a file at its resolved path.
    #[must_use]
    pub const fn file(path: Utf8PathBuf) -> Self {
        Self {
            provenance: SourceProvenance::File,
            path: Some(path),
        }
    }

    /// Record a patch script.
    #[must_use]
    pub const fn script() -> Self {
        Self {
            provenance: SourceProvenance::Script,
            path: None,
        }
    }

    /// Returns the provenance of the source.
    #[must_use]
    pub const fn provenance(&self) -> SourceProvenance {
        self.provenance
    }

    /// Returns the resolved path if this source was a file.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }
}
