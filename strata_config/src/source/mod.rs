//! Access to configuration sources on disk or in memory.
//!
//! The accumulator only needs two things from a source: whether it exists and
//! its text. [`SourceReader`] captures that boundary so tests and embedding
//! applications can substitute in-memory sources for the filesystem.

mod memory;
mod path;
mod reader;

pub use memory::MemoryReader;
pub use path::{canonicalise, resolve};
pub(crate) use path::normalise;
pub use reader::{FsReader, SourceReader};
