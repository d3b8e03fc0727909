//! Error types for `strata`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use strata_config::StrataError;
use thiserror::Error;

/// Errors surfaced by the `strata` command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Accumulating a source failed.
    #[error(transparent)]
    Config(#[from] Arc<StrataError>),

    /// The snapshot could not be serialised.
    #[error("failed to serialise snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the snapshot failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Destination that could not be written.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The log subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
