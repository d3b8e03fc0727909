//! Deep merge of structured configuration values.
//!
//! Mappings merge key-by-key; every other combination resolves to "incoming
//! wins". Sequences are replaced wholesale, never concatenated or merged by
//! index.

use serde_json::{Map, Value};

/// Overlay `incoming` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - mapping onto mapping merges recursively: keys only in `incoming` are
///   added, keys in both recurse, keys only in `target` are preserved;
/// - mapping onto a non-mapping replaces the target with the mapping;
/// - sequences and scalars replace `target` wholesale.
///
/// The merge is total and consumes `incoming`, so nothing in the result
/// aliases caller-owned data.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use strata_config::merge_value;
///
/// let mut acc = json!({"a": 1, "b": {"x": 1}});
/// merge_value(&mut acc, json!({"b": {"y": 2}, "c": 3}));
/// assert_eq!(acc, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
///
/// // Arrays replace existing values.
/// merge_value(&mut acc, json!({"b": [1, 2, 3]}));
/// assert_eq!(acc["b"], json!([1, 2, 3]));
/// ```
pub fn merge_value(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(target_map), Value::Object(map)) => merge_mapping(target_map, map),
        (target, incoming) => *target = incoming,
    }
}

/// Merge the mapping `incoming` into `target` key by key.
///
/// # Examples
///
/// ```rust
/// use serde_json::{json, Map, Value};
/// use strata_config::merge_mapping;
///
/// let mut target = Map::new();
/// target.insert("greeting".into(), json!("hi"));
/// let Value::Object(incoming) = json!({"audience": "world"}) else { unreachable!() };
/// merge_mapping(&mut target, incoming);
/// assert_eq!(Value::Object(target), json!({"greeting": "hi", "audience": "world"}));
/// ```
pub fn merge_mapping(target: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}
