//! Decoder failures.

use thiserror::Error;

/// Failure to turn configuration text into a structured mapping.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The text is not valid JSON5 (or JSON).
    #[error("{0}")]
    Json5(#[from] json5::Error),

    /// The text is not valid YAML.
    #[error("{0}")]
    Yaml(#[from] serde_saphyr::Error),

    /// The text is not valid TOML.
    #[cfg(feature = "toml")]
    #[error("{0}")]
    Toml(#[from] toml::de::Error),

    /// The document decoded, but its top level is not a mapping.
    #[error("expected a mapping at the top level, found {found}")]
    NotAMapping {
        /// Kind of value found at the top level.
        found: &'static str,
    },
}
