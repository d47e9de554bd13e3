//! Compose service liveness probe.

use std::process::Command;

/// Answers "is compose service S currently running under compose file F?".
///
/// Behind a trait so the dispatcher can be tested without a docker daemon.
pub trait ServiceProbe {
    fn is_running(&self, compose_file: &str, service: &str) -> bool;
}

/// Probe backed by `docker compose ps -q <service>`.
///
/// Liveness is re-queried on every call; nothing is cached, so the staleness
/// window is a single probe invocation.
#[derive(Debug, Default)]
pub struct ComposeProbe;

impl ServiceProbe for ComposeProbe {
    fn is_running(&self, compose_file: &str, service: &str) -> bool {
        let output = Command::new("docker")
            .args(["compose", "-f", compose_file, "ps", "-q", service])
            .output();

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stdout = stdout.trim();
                !stdout.is_empty() && stdout != "0"
            }
            // Docker missing or broken: report not running. The dispatcher
            // then emits a `run --rm` invocation and the eventual exec
            // failure is surfaced by the executor, not here.
            Err(_) => false,
        }
    }
}
