//! CLI entrypoint for `strata`.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use strata_cli::cli::Args;
use strata_cli::{logging, run};

fn main() -> ExitCode {
    let args = Args::parse();
    let outcome = logging::init(args.verbose).and_then(|()| run(&args));
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "configuration failed");
            let _ignored = writeln!(std::io::stderr().lock(), "strata: {err}");
            ExitCode::FAILURE
        }
    }
}
