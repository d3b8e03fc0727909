//! Core crate for the Strata layered configuration accumulator.
//!
//! A [`ConfigAccumulator`] builds one configuration snapshot from an ordered
//! series of sources: in-memory mappings, inline strings, files on disk and
//! patch scripts. Mappings deep merge key by key and later sources win every
//! other conflict. The first time the snapshot is touched it is seeded with
//! defaults derived from the application's `package.json`:
//!
//! - `APP_NAME`: the descriptor's `name`, or `null`;
//! - `APP_VERSION`: the descriptor's `version`, or `null`;
//! - `APP_ROOT`: the application root.
//!
//! Files are read through a [`SourceReader`] and decoded by a
//! [`FormatDecoder`] chosen by extension: `.yaml`/`.yml` as YAML, `.toml` as
//! TOML, anything else as JSON5. A missing file contributes nothing. Each
//! resolved path is read and decoded at most once per accumulator.
//!
//! ```rust,no_run
//! use strata_config::ConfigAccumulator;
//!
//! # fn main() -> strata_config::StrataResult<()> {
//! let mut config = ConfigAccumulator::discover()?;
//! config
//!     .add_file("config/default.json")?
//!     .add_file("config/local.yaml")?
//!     .add_script("server.port = 9000")?;
//! let port = config.materialize()?.get("server").cloned();
//! # let _ = port;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

mod accumulator;
mod convert;
pub mod decode;
mod discovery;
mod error;
mod layer;
mod merge;
mod result_ext;
pub mod script;
mod source;

pub use accumulator::{
    APP_NAME_KEY, APP_ROOT_KEY, APP_VERSION_KEY, CacheEntry, ConfigAccumulator,
    ConfigAccumulatorBuilder, FileCache, PACKAGE_DESCRIPTOR, SnapshotState,
};
pub use convert::from_snapshot;
pub use decode::{DecodeError, Format, FormatDecoder, ParseFormatError, StandardDecoder};
pub use discovery::{APP_ROOT_ENV, discover_app_root, find_package_root};
pub use error::StrataError;
pub use layer::{AppliedSource, SourceProvenance};
pub use merge::{merge_mapping, merge_value};
pub use result_ext::StrataResultExt;
pub use script::{Patch, PatchScript, ScriptError, ScriptRunner};
pub use source::{FsReader, MemoryReader, SourceReader, canonicalise, resolve};

/// Result type used throughout the crate.
///
/// Errors are shared behind an [`Arc`] so callers can clone and stash them
/// without requiring the underlying sources to be `Clone`.
pub type StrataResult<T> = Result<T, Arc<StrataError>>;
