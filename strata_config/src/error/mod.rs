//! Error types produced by the configuration accumulator.

mod conversions;
mod types;

pub use types::StrataError;
