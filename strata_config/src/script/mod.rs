//! Patch scripts: declarative mutation of the live snapshot.
//!
//! A patch script is a sequence of statements separated by newlines or `;`:
//!
//! ```text
//! # comments start with '#' or '//'
//! server.port = 8080
//! server.hosts[0] = "primary.internal"
//! features["beta-ui"] = { enabled: true, cohort: [1, 2] }
//! delete legacy.timeout
//! ```
//!
//! Values are JSON5 literals and may span several lines inside brackets or
//! strings. Assignments set the addressed field directly; they do not deep
//! merge. The whole script is parsed before any statement runs, so a syntax
//! error leaves the snapshot untouched. A runtime failure stops execution but
//! keeps the effects of earlier statements.

mod error;
mod parser;
mod path;

pub use error::ScriptError;
pub use path::{PatchPath, Segment};

use serde_json::{Map, Value};

/// Runs a script against the snapshot, mutating it in place.
pub trait ScriptRunner: Send + Sync {
    /// Execute `script` with `context` as its mutable environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ScriptError`] on syntax or runtime failure. Mutations made
    /// before a runtime failure are not rolled back.
    fn run(&self, script: &str, context: &mut Map<String, Value>) -> Result<(), ScriptError>;
}

/// One parsed patch statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// Set the field at `path` to `value`.
    Assign {
        /// Field to set.
        path: PatchPath,
        /// Replacement value.
        value: Value,
    },
    /// Remove the field at `path`.
    Delete {
        /// Field to remove.
        path: PatchPath,
    },
}

#[derive(Clone, Debug, PartialEq)]
struct Located {
    line: usize,
    statement: Statement,
}

/// A parsed patch script, ready to apply to any number of snapshots.
///
/// # Examples
///
/// ```rust
/// use serde_json::{json, Value};
/// use strata_config::Patch;
///
/// let patch = Patch::parse("x.y = 'z'").expect("valid script");
/// let Value::Object(mut snapshot) = json!({"x": {"y": "old", "w": 1}}) else { unreachable!() };
/// patch.apply(&mut snapshot).expect("patch applies");
/// assert_eq!(Value::Object(snapshot), json!({"x": {"y": "z", "w": 1}}));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch {
    statements: Vec<Located>,
}

impl Patch {
    /// Parse `script` into a patch.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Syntax`] for malformed statements or values.
    pub fn parse(script: &str) -> Result<Self, ScriptError> {
        let statements = parser::parse(script)?
            .into_iter()
            .map(|(line, statement)| Located { line, statement })
            .collect();
        Ok(Self { statements })
    }

    /// Iterate over the parsed statements in execution order.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter().map(|located| &located.statement)
    }

    /// Number of statements in the patch.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns `true` when the patch contains no statements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Apply every statement to `context` in order.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Runtime`] for the first statement that cannot
    /// be applied. Earlier statements remain applied.
    pub fn apply(&self, context: &mut Map<String, Value>) -> Result<(), ScriptError> {
        for Located { line, statement } in &self.statements {
            let outcome = match statement {
                Statement::Assign { path, value } => path.assign(context, value.clone()),
                Statement::Delete { path } => path.delete(context),
            };
            outcome.map_err(|message| ScriptError::Runtime {
                line: *line,
                path: statement_path(statement).to_string(),
                message,
            })?;
        }
        Ok(())
    }
}

const fn statement_path(statement: &Statement) -> &PatchPath {
    match statement {
        Statement::Assign { path, .. } | Statement::Delete { path } => path,
    }
}

/// Default [`ScriptRunner`] that parses and applies patch scripts.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatchScript;

impl ScriptRunner for PatchScript {
    fn run(&self, script: &str, context: &mut Map<String, Value>) -> Result<(), ScriptError> {
        let patch = Patch::parse(script)?;
        tracing::debug!(statements = patch.len(), "applying patch script");
        patch.apply(context)
    }
}
