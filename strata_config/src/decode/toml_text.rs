//! TOML decoding.

use serde_json::Value;

pub(super) fn decode(text: &str) -> Result<Value, toml::de::Error> {
    toml::from_str(text)
}
