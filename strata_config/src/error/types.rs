//! Primary error enum for configuration accumulation flows.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::decode::DecodeError;
use crate::script::ScriptError;

/// Errors that can occur while accumulating configuration.
///
/// A missing configuration file is not an error: it contributes an empty
/// mapping. Every other failure aborts the triggering `add_*` call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// A configuration file exists but its contents could not be decoded.
    #[error("Error loading config {path}: {source}")]
    File {
        /// Resolved absolute path of the offending file.
        path: Utf8PathBuf,
        /// Decoder failure describing the malformed content.
        #[source]
        source: DecodeError,
    },

    /// An inline configuration string could not be decoded.
    #[error("Error loading config string: {0}")]
    Inline(#[source] DecodeError),

    /// A configuration file exists but could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Resolved absolute path of the unreadable file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A patch script failed to parse or apply.
    #[error("Config script failed: {0}")]
    Script(#[from] ScriptError),

    /// The snapshot could not be deserialised into the requested type.
    #[error("Failed to extract configuration: {0}")]
    Extract(#[from] serde_json::Error),

    /// The application root could not be determined.
    #[error("Failed to determine application root: {0}")]
    AppRoot(#[source] std::io::Error),
}

impl StrataError {
    /// Returns the resolved file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::File { path, .. } | Self::Io { path, .. } => Some(path),
            Self::Inline(_) | Self::Script(_) | Self::Extract(_) | Self::AppRoot(_) => None,
        }
    }
}
