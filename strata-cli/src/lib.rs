//! Library interface for the `strata` command.
//!
//! The binary parses [`cli::Args`], installs logging and hands the arguments
//! to [`accumulate`], which applies every source in order and returns the
//! final snapshot.

pub mod cli;
pub mod error;
pub mod logging;
pub mod output;

use serde_json::Value;
use strata_config::ConfigAccumulator;

use crate::cli::{Args, SourceSpec};
use crate::error::CliError;

/// Build an accumulator for `args` and apply its sources in order.
///
/// # Errors
///
/// Returns [`CliError::Config`] for the first source that fails; later
/// sources are not applied.
pub fn accumulate(args: &Args) -> Result<Value, CliError> {
    let mut config = match &args.root {
        Some(root) => ConfigAccumulator::new(root.clone())?,
        None => ConfigAccumulator::discover()?,
    };
    tracing::info!(root = %config.app_root(), sources = args.sources.len(), "accumulating configuration");
    for source in &args.sources {
        apply(&mut config, source)?;
    }
    Ok(config.to_value()?)
}

fn apply(config: &mut ConfigAccumulator, source: &SourceSpec) -> Result<(), CliError> {
    match source {
        SourceSpec::File(path) => config.add_file(path)?,
        SourceSpec::Text { format, text } => config.add_string_as(text, *format)?,
        SourceSpec::Script(script) => config.add_script(script)?,
    };
    Ok(())
}

/// Accumulate the configured sources and write the snapshot to its
/// destination.
///
/// # Errors
///
/// Propagates accumulation, serialisation and output failures.
pub fn run(args: &Args) -> Result<(), CliError> {
    let snapshot = accumulate(args)?;
    let content = output::render(&snapshot, args.is_compact)?;
    match &args.output {
        Some(path) => output::write_file(path, &content),
        None => output::write_stdout(&content),
    }
}
