//! Typed extraction of materialised snapshots.

use serde_json::{Map, Value};

use crate::{StrataResult, StrataResultExt};

/// Deserialise a snapshot mapping into `T`.
///
/// No coercion happens beyond what `serde` itself performs: a string `"8080"`
/// does not become a `u16`.
///
/// # Errors
///
/// Returns a [`crate::StrataError::Extract`] when deserialisation fails.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_json::{json, Value};
/// use strata_config::from_snapshot;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct App { port: u16 }
///
/// let Value::Object(map) = json!({"port": 8080}) else { unreachable!() };
/// let app: App = from_snapshot(map).expect("snapshot deserialises");
/// assert_eq!(app.port, 8080);
/// ```
pub fn from_snapshot<T: serde::de::DeserializeOwned>(snapshot: Map<String, Value>) -> StrataResult<T> {
    serde_json::from_value(Value::Object(snapshot)).into_strata()
}
