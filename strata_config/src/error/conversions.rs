//! Constructors that attach source context to lower-level failures.

use std::sync::Arc;

use camino::Utf8Path;

use super::StrataError;
use crate::decode::DecodeError;

impl StrataError {
    /// Wrap a decode failure for the file at `path`.
    #[must_use]
    pub fn file(path: &Utf8Path, source: DecodeError) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Wrap a read failure for the file at `path`.
    #[must_use]
    pub fn io(path: &Utf8Path, source: std::io::Error) -> Arc<Self> {
        Arc::new(Self::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Wrap a decode failure for an inline configuration string.
    #[must_use]
    pub fn inline(source: DecodeError) -> Arc<Self> {
        Arc::new(Self::Inline(source))
    }
}
