//! Addressing and mutating snapshot fields by path.

use std::fmt;

use serde_json::{Map, Value};

/// One step below the root of a [`PatchPath`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Segment {
    /// A mapping key, written `.key` or `["key"]`.
    Key(String),
    /// A sequence index, written `[0]`. On mappings it addresses the key
    /// spelled with the same digits.
    Index(usize),
}

/// Path to a field of the snapshot, such as `server.hosts[0]`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PatchPath {
    root: String,
    segments: Vec<Segment>,
}

enum StepError {
    Missing,
    NotContainer(&'static str),
}

impl PatchPath {
    /// Build a path from its root key and the segments below it.
    #[must_use]
    pub const fn new(root: String, segments: Vec<Segment>) -> Self {
        Self { root, segments }
    }

    /// Returns the top-level key.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the segments below the root.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Set the addressed field. Top-level keys are created on demand; deeper
    /// fields require every intermediate container to exist.
    pub(super) fn assign(&self, context: &mut Map<String, Value>, value: Value) -> Result<(), String> {
        let Some((last, parents)) = self.segments.split_last() else {
            context.insert(self.root.clone(), value);
            return Ok(());
        };
        let parent = self.walk(context, parents)?;
        match (parent, last) {
            (Value::Object(map), Segment::Key(key)) => {
                map.insert(key.clone(), value);
                Ok(())
            }
            (Value::Object(map), Segment::Index(index)) => {
                map.insert(index.to_string(), value);
                Ok(())
            }
            (Value::Array(items), Segment::Index(index)) => {
                let len = items.len();
                match items.get_mut(*index) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None if *index == len => {
                        items.push(value);
                        Ok(())
                    }
                    None => Err(format!(
                        "index {index} is out of bounds for an array of length {len}"
                    )),
                }
            }
            (other, _) => Err(format!(
                "`{}` is {}, not a container",
                self.prefix(parents.len()),
                kind(other)
            )),
        }
    }

    /// Remove the addressed field. Removing an absent key or index is a
    /// no-op; missing intermediates are an error.
    pub(super) fn delete(&self, context: &mut Map<String, Value>) -> Result<(), String> {
        let Some((last, parents)) = self.segments.split_last() else {
            context.shift_remove(&self.root);
            return Ok(());
        };
        let parent = self.walk(context, parents)?;
        match (parent, last) {
            (Value::Object(map), Segment::Key(key)) => {
                map.shift_remove(key);
                Ok(())
            }
            (Value::Object(map), Segment::Index(index)) => {
                map.shift_remove(&index.to_string());
                Ok(())
            }
            (Value::Array(items), Segment::Index(index)) => {
                if *index < items.len() {
                    items.remove(*index);
                }
                Ok(())
            }
            (other, _) => Err(format!(
                "`{}` is {}, not a container",
                self.prefix(parents.len()),
                kind(other)
            )),
        }
    }

    fn walk<'v>(
        &self,
        context: &'v mut Map<String, Value>,
        parents: &[Segment],
    ) -> Result<&'v mut Value, String> {
        let mut current = context
            .get_mut(&self.root)
            .ok_or_else(|| format!("`{}` is not defined", self.root))?;
        for (depth, segment) in parents.iter().enumerate() {
            current = step(current, segment).map_err(|err| match err {
                StepError::Missing => format!("`{}` is not defined", self.prefix(depth + 1)),
                StepError::NotContainer(found) => {
                    format!("`{}` is {found}, not a container", self.prefix(depth))
                }
            })?;
        }
        Ok(current)
    }

    fn prefix(&self, depth: usize) -> String {
        let mut out = self.root.clone();
        for segment in self.segments.iter().take(depth) {
            push_segment(&mut out, segment);
        }
        out
    }
}

fn step<'v>(value: &'v mut Value, segment: &Segment) -> Result<&'v mut Value, StepError> {
    match (value, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get_mut(key).ok_or(StepError::Missing),
        (Value::Object(map), Segment::Index(index)) => {
            map.get_mut(&index.to_string()).ok_or(StepError::Missing)
        }
        (Value::Array(items), Segment::Index(index)) => {
            items.get_mut(*index).ok_or(StepError::Missing)
        }
        (other, _) => Err(StepError::NotContainer(kind(other))),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

pub(super) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

pub(super) fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}

fn is_ident(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_continue)
}

fn push_segment(out: &mut String, segment: &Segment) {
    match segment {
        Segment::Key(key) if is_ident(key) => {
            out.push('.');
            out.push_str(key);
        }
        Segment::Key(key) => {
            out.push('[');
            out.push_str(&Value::String(key.clone()).to_string());
            out.push(']');
        }
        Segment::Index(index) => {
            out.push('[');
            out.push_str(&index.to_string());
            out.push(']');
        }
    }
}

impl fmt::Display for PatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix(self.segments.len()))
    }
}
