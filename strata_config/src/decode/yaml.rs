//! YAML decoding backed by `serde-saphyr`.

use serde_json::Value;
use serde_saphyr::Options;

/// Parse YAML into a JSON value using strict boolean semantics, so `yes` and
/// `on` stay strings.
///
/// Blank documents decode to `null`.
pub(super) fn decode(text: &str) -> Result<Value, serde_saphyr::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_saphyr::from_str_with_options(
        text,
        Options {
            strict_booleans: true,
            ..Options::default()
        },
    )
}
