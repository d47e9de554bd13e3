//! Exit code constants for the commis CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown recipe/task, I/O)
//! - 2: Configuration failure (malformed project manifest)
//!
//! Wrapped commands that exit non-zero propagate their own exit code
//! unchanged; those codes are not listed here.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unknown recipe or task, file I/O failure.
pub const USER_ERROR: i32 = 1;

/// Configuration failure: the project manifest exists but cannot be parsed.
pub const CONFIG_FAILURE: i32 = 2;
