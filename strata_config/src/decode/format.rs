//! Source format hints and extension dispatch.

use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use thiserror::Error;

/// Format hint used to pick a decoder.
///
/// `Json`, `Json5` and `Unspecified` all use the JSON5 grammar, which is a
/// superset of JSON.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Format {
    /// `.json` sources.
    Json,
    /// `.json5` sources.
    Json5,
    /// `.yaml` and `.yml` sources.
    Yaml,
    /// `.toml` sources. Decoded as JSON5 when the `toml` feature is off.
    Toml,
    /// No hint; decoded as JSON5.
    #[default]
    Unspecified,
}

impl Format {
    /// Select a format from a file extension, with or without the leading dot.
    ///
    /// Matching ignores ASCII case. Unknown extensions map to
    /// [`Format::Unspecified`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strata_config::Format;
    ///
    /// assert_eq!(Format::from_extension(".yml"), Format::Yaml);
    /// assert_eq!(Format::from_extension("JSON5"), Format::Json5);
    /// assert_eq!(Format::from_extension("ini"), Format::Unspecified);
    /// ```
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        let normalised = ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase();
        match normalised.as_str() {
            "json" => Self::Json,
            "json5" => Self::Json5,
            "yaml" | "yml" => Self::Yaml,
            "toml" if cfg!(feature = "toml") => Self::Toml,
            _ => Self::Unspecified,
        }
    }

    /// Select a format from the extension of `path`.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        path.extension().map_or(Self::Unspecified, Self::from_extension)
    }

    /// Returns the canonical lowercase name of this format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Json5 => "json5",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Unspecified => "default",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, Error, Eq, PartialEq)]
#[error("unknown configuration format '{0}'")]
pub struct ParseFormatError(String);

impl FromStr for Format {
    type Err = ParseFormatError;

    /// Parse a format name such as `yaml`, `.yml` or `default`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix('.').unwrap_or(s).to_ascii_lowercase();
        match name.as_str() {
            "" | "default" => Ok(Self::Unspecified),
            "json" => Ok(Self::Json),
            "json5" => Ok(Self::Json5),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(ParseFormatError(s.to_owned())),
        }
    }
}
