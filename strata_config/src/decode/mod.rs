//! Text decoding for configuration sources.
//!
//! Decoding is a pure function from text and a [`Format`] hint to a
//! structured [`serde_json::Value`]. YAML goes through `serde-saphyr`, TOML
//! through `toml` (when the `toml` feature is enabled), and everything else
//! through the permissive JSON5 grammar, which also accepts standard JSON.

mod error;
mod format;
#[cfg(feature = "toml")]
mod toml_text;
mod yaml;

pub use error::DecodeError;
pub use format::{Format, ParseFormatError};

use serde_json::{Map, Value};

/// Decodes raw configuration text into a structured value.
///
/// Implementations must be pure: the same text and format always produce the
/// same value or the same failure.
pub trait FormatDecoder: Send + Sync {
    /// Decode `text` according to `format`.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when `text` is malformed for the selected
    /// grammar.
    fn decode(&self, text: &str, format: Format) -> Result<Value, DecodeError>;
}

/// Decoder backed by `json5`, `serde-saphyr` and `toml`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardDecoder;

impl FormatDecoder for StandardDecoder {
    fn decode(&self, text: &str, format: Format) -> Result<Value, DecodeError> {
        match format {
            Format::Yaml => yaml::decode(text).map_err(DecodeError::from),
            #[cfg(feature = "toml")]
            Format::Toml => toml_text::decode(text).map_err(DecodeError::from),
            #[cfg(not(feature = "toml"))]
            Format::Toml => decode_json5(text),
            Format::Json | Format::Json5 | Format::Unspecified => decode_json5(text),
        }
    }
}

fn decode_json5(text: &str) -> Result<Value, DecodeError> {
    json5::from_str(text).map_err(DecodeError::from)
}

/// Convert a decoded document into a top-level mapping.
///
/// A `null` document (for example an empty YAML file) contributes nothing and
/// becomes an empty mapping.
///
/// # Errors
///
/// Returns [`DecodeError::NotAMapping`] when the document is a sequence or a
/// scalar.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use strata_config::decode::into_mapping;
///
/// assert!(into_mapping(json!(null)).expect("null is empty").is_empty());
/// assert!(into_mapping(json!([1, 2])).is_err());
/// ```
pub fn into_mapping(value: Value) -> Result<Map<String, Value>, DecodeError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(DecodeError::NotAMapping {
            found: kind_name(&other),
        }),
    }
}

const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}
