//! Commis: framework recipe task-runner with local/Docker Compose dispatch.
//!
//! This is the main entry point for the `commis` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes. Wrapped tool failures propagate the tool's own exit
//! code unchanged.

mod cli;
mod commands;
pub mod dictionary;
pub mod docker;
pub mod env;
pub mod error;
pub mod exec;
pub mod exit_codes;
pub mod recipe;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
