//! Extensions for mapping errors to `StrataResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(StrataError::…(e)))`
//! patterns when converting external error types into the crate's
//! `StrataResult<T>` alias (`Result<T, Arc<StrataError>>`).
//!
//! # Examples
//!
//! ```
//! use strata_config::{StrataResult, StrataResultExt};
//!
//! fn serialise() -> StrataResult<serde_json::Value> {
//!     // serde_json::Error implements Into<StrataError>
//!     serde_json::to_value(42).into_strata()
//! }
//! # assert!(serialise().is_ok());
//! ```

use crate::{StrataError, StrataResult};
use std::sync::Arc;

/// Generic extension for mapping any `Result<T, E>` with `E: Into<StrataError>`
/// into a `StrataResult<T>`.
pub trait StrataResultExt<T, E> {
    /// Convert `Result<T, E>` into `StrataResult<T>` using `Into<StrataError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<StrataError>`.
    fn into_strata(self) -> StrataResult<T>;
}

impl<T, E> StrataResultExt<T, E> for Result<T, E>
where
    E: Into<StrataError>,
{
    fn into_strata(self) -> StrataResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
