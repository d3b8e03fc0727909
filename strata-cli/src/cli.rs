//! Command-line interface definitions for `strata`.

use std::str::FromStr;

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use strata_config::Format;
use thiserror::Error;

/// Parsed CLI arguments for `strata`.
#[derive(Debug, Parser)]
#[command(name = "strata")]
#[command(about = "Accumulate configuration sources and print the merged snapshot")]
#[command(version)]
pub struct Args {
    /// Application root for relative paths and `package.json` defaults.
    /// Discovered from `APP_ROOT_PATH` or the working directory when absent.
    #[arg(long, value_name = "dir")]
    pub root: Option<Utf8PathBuf>,
    /// Increase log verbosity (repeat for more detail).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Write the snapshot to this file instead of standard output.
    #[arg(short, long, value_name = "path")]
    pub output: Option<Utf8PathBuf>,
    /// Emit single-line JSON instead of pretty-printed output.
    #[arg(long = "compact")]
    pub is_compact: bool,
    /// Sources applied in order: `file:PATH` or a bare path, `json:TEXT`,
    /// `json5:TEXT`, `yaml:TEXT`, `toml:TEXT` or `script:TEXT`.
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<SourceSpec>,
}

/// One configuration source named on the command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SourceSpec {
    /// A file resolved against the application root.
    File(Utf8PathBuf),
    /// Inline text decoded with the given format.
    Text {
        /// Decoder selection.
        format: Format,
        /// Raw configuration text.
        text: String,
    },
    /// A patch script run against the snapshot.
    Script(String),
}

/// Error raised for an empty source argument.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("source must not be empty")]
pub struct EmptySource;

impl FromStr for SourceSpec {
    type Err = EmptySource;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Err(EmptySource);
        }
        let Some((prefix, body)) = raw.split_once(':') else {
            return Ok(Self::File(Utf8PathBuf::from(raw)));
        };
        let format = match prefix {
            "file" => return Ok(Self::File(Utf8PathBuf::from(body))),
            "script" => return Ok(Self::Script(body.to_owned())),
            "json" => Format::Json,
            "json5" => Format::Json5,
            "yaml" | "yml" => Format::Yaml,
            "toml" => Format::Toml,
            // Anything else, including Windows drive letters, is a path.
            _ => return Ok(Self::File(Utf8PathBuf::from(raw))),
        };
        Ok(Self::Text {
            format,
            text: body.to_owned(),
        })
    }
}
