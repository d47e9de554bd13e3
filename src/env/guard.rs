//! RAII scoped override for process environment variables.

use std::env;

/// RAII guard that temporarily overrides one environment variable.
///
/// The previous value is captured at construction and written back when the
/// guard is dropped, so restoration happens even on early-return and error
/// paths. Nested guards for the same key restore to the immediately
/// enclosing value, not the original, which keeps call chains composable
/// (e.g. an xdebug toggle briefly overriding `DOCKER_SERVICE`).
#[derive(Debug)]
pub struct EnvOverride {
    key: String,
    previous: Option<String>,
    restored: bool,
}

impl EnvOverride {
    /// Set `key` to `value`, remembering whatever it held before.
    pub fn set(key: &str, value: &str) -> Self {
        let previous = env::var(key).ok();
        super::set_process_var(key, value);
        Self {
            key: key.to_string(),
            previous,
            restored: false,
        }
    }

    /// Restore the previous value now instead of waiting for drop.
    pub fn restore(mut self) {
        self.restore_inner();
    }

    fn restore_inner(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        match &self.previous {
            Some(value) => super::set_process_var(&self.key, value),
            None => super::remove_process_var(&self.key),
        }
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        self.restore_inner();
    }
}
