//! Patch script failures.

use thiserror::Error;

/// Failure while parsing or applying a patch script.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ScriptError {
    /// The script could not be parsed; nothing was applied.
    #[error("syntax error on line {line}: {message}")]
    Syntax {
        /// One-based line of the offending statement.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A statement could not be applied to the snapshot.
    #[error("line {line}: cannot update `{path}`: {message}")]
    Runtime {
        /// One-based line of the failing statement.
        line: usize,
        /// Path the statement addressed.
        path: String,
        /// Description of the problem.
        message: String,
    },
}
