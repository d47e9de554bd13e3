//! Process executor for resolved invocations.
//!
//! Blocking, no timeout, stdio inherited: the wrapped tool's own output is
//! streamed through verbatim. A long-running command (queue worker, log
//! tail) blocks until externally interrupted.

use crate::docker::Invocation;
use crate::error::{CommisError, Result};
use std::process::Command;

/// Run an invocation and propagate its exit status.
///
/// A non-zero child exit becomes [`CommisError::CommandFailed`] carrying the
/// child's code, which the entry point turns into our own exit code
/// unchanged. No retries, no interpretation of the failure.
pub fn run(invocation: &Invocation) -> Result<()> {
    let Some((program, args)) = invocation.argv.split_first() else {
        return Err(CommisError::UserError("refusing to run an empty command".to_string()));
    };

    let status = Command::new(program).args(args).status().map_err(|e| {
        CommisError::UserError(format!(
            "failed to execute '{}': {}\n\
             Fix: ensure the command is installed and in PATH.",
            program, e
        ))
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(CommisError::CommandFailed {
            command: invocation.command_line(),
            // Killed-by-signal has no code; report the conventional 1.
            code: status.code().unwrap_or(1),
        })
    }
}
