//! Error types for the commis CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Only manifest parsing is fatal inside configuration resolution; missing env
//! files, a missing docker binary, or a stopped service all degrade to
//! defaults and never surface here.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for commis operations.
#[derive(Error, Debug)]
pub enum CommisError {
    /// User provided invalid arguments or referenced an unknown recipe/task.
    #[error("{0}")]
    UserError(String),

    /// The project manifest exists but is not valid JSON.
    ///
    /// This is deliberately fatal: a broken manifest must not silently fall
    /// back to the default dotenv path.
    #[error("failed to parse manifest '{path}': {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// File I/O failure with context (dictionary reads/writes).
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The wrapped command exited non-zero.
    ///
    /// The child's exit code becomes our own exit code, unchanged; commis
    /// does not retry and does not interpret the failure.
    #[error("command `{command}` exited with code {code}")]
    CommandFailed { command: String, code: i32 },
}

impl CommisError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommisError::UserError(_) => exit_codes::USER_ERROR,
            CommisError::ManifestParse { .. } => exit_codes::CONFIG_FAILURE,
            CommisError::Io { .. } => exit_codes::USER_ERROR,
            CommisError::CommandFailed { code, .. } => *code,
        }
    }
}

/// Result type alias for commis operations.
pub type Result<T> = std::result::Result<T, CommisError>;
