//! Binary entrypoint for the `sitescope` CLI.

use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Env, Target};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    init_logging(&args);

    // Recording is handled in commands::dispatch via SITESCOPE_RECORD=<dir>.
    match sitescope::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` sets the baseline (default `info`); `-v`/`-q` override it.
fn init_logging(args: &[String]) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    let cli = sitescope::cli::Cli::try_parse_from(args).ok();
    if let Some(level) = cli.and_then(|cli| cli.log_level()) {
        builder.filter_level(level);
    }
    builder.target(Target::Stderr).init();
}
