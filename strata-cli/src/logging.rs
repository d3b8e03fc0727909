//! Log subscriber installation for the `strata` binary.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::CliError;

/// Maps the number of `-v` flags to a default filter directive.
#[must_use]
pub const fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flags when it is set.
///
/// # Errors
///
/// Returns [`CliError::Logging`] when the filter is invalid or a global
/// subscriber is already installed.
pub fn init(verbosity: u8) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level_for(verbosity)))
        .map_err(|err| CliError::Logging(err.to_string()))?;
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::level_for;

    #[rstest]
    #[case(0, "warn")]
    #[case(1, "info")]
    #[case(2, "debug")]
    #[case(7, "trace")]
    fn verbosity_raises_the_level(#[case] verbosity: u8, #[case] expected: &str) {
        assert_eq!(level_for(verbosity), expected);
    }
}
