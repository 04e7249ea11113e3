//! Core library entry for the `sitescope` CLI.
//!
//! Infers the structure of a website: fingerprints the platform it runs on,
//! builds a hierarchical sitemap tree from crawled or listed URLs, and
//! flattens design-token documents for display and prompting.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod platform;
pub mod ports;
pub mod sitemap;
pub mod store;
pub mod tokens;

pub use error::{Error, Result};

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// Logging must already be initialised; see [`cli::Cli::log_level`].
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
/// Help and version requests print to stdout and succeed.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["sitescope", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_token_file() {
        let result = run(["sitescope", "tokens", "flatten", "/not/here.json"]);
        assert!(result.unwrap_err().contains("failed to read"));
    }
}
