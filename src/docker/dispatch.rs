//! The "dockerize" core: local-vs-container dispatch and argv assembly.
//!
//! Per invocation the dispatcher walks a small state machine:
//! flag off → local (terminal, no docker tooling touched); flag on →
//! resolve service/compose file → probe liveness → `exec` or `run --rm` →
//! assemble argv. Commands are assembled as argv vectors (no shell
//! wrapping), so shell metacharacters in arguments are never reinterpreted.

use crate::docker::probe::ServiceProbe;
use crate::env::EnvResolver;
use crate::error::{CommisError, Result};

/// Compose service used when neither the caller nor the environment names one.
pub const DEFAULT_SERVICE: &str = "workspace";

/// Compose file used when `DOCKER_COMPOSE_FILE` is unset.
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

/// A caller's intended command before local/container resolution.
///
/// Consumed exactly once by [`Dispatcher::dispatch`].
#[derive(Debug, Clone)]
pub struct CommandIntent {
    /// Raw shell-syntax command string (split with shell-words rules).
    pub command: String,
    /// Target compose service; falls back to `DOCKER_SERVICE`, then
    /// [`DEFAULT_SERVICE`].
    pub service: Option<String>,
    /// Working directory inside the container.
    pub workdir: Option<String>,
    /// Whether the containerized command gets a TTY. Defaults to true;
    /// suppression (`-T`) is always an explicit caller decision.
    pub tty: bool,
}

impl CommandIntent {
    pub fn new<S: Into<String>>(command: S) -> Self {
        Self {
            command: command.into(),
            service: None,
            workdir: None,
            tty: true,
        }
    }

    pub fn with_service<S: Into<String>>(mut self, service: S) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_workdir<S: Into<String>>(mut self, workdir: S) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    pub fn without_tty(mut self) -> Self {
        self.tty = false;
        self
    }
}

/// The resolved invocation handed to the process executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Final argument vector, program first.
    pub argv: Vec<String>,
    /// Whether the command was wrapped into a compose invocation.
    pub containerized: bool,
}

impl Invocation {
    /// Shell-quoted single-line rendering, for display and dry runs.
    pub fn command_line(&self) -> String {
        shell_words::join(&self.argv)
    }
}

/// Decides local-vs-container execution and builds the final argv.
pub struct Dispatcher<'a, P: ServiceProbe> {
    env: &'a mut EnvResolver,
    probe: &'a P,
    /// Host project root, the needle for workdir path rewriting.
    project_root: String,
}

impl<'a, P: ServiceProbe> Dispatcher<'a, P> {
    pub fn new<S: Into<String>>(env: &'a mut EnvResolver, probe: &'a P, project_root: S) -> Self {
        Self {
            env,
            probe,
            project_root: project_root.into(),
        }
    }

    /// Resolve a command intent into a runnable invocation.
    ///
    /// Never fails because docker is unavailable: with `CASTOR_DOCKER` off
    /// the command passes through untouched, and with it on a dead service
    /// just produces a `run --rm` invocation whose failure (if any) belongs
    /// to the executor. The only error paths here are manifest parse
    /// failures from the resolver and unparseable command strings.
    pub fn dispatch(&mut self, intent: CommandIntent) -> Result<Invocation> {
        // Flag check comes before any docker tooling so that disabled setups
        // have zero docker dependency.
        let flag = self.env.resolve("CASTOR_DOCKER")?;
        if !matches!(flag.as_deref(), Some("1") | Some("true")) {
            return Ok(Invocation {
                argv: split_command(&intent.command)?,
                containerized: false,
            });
        }

        let service = match intent.service {
            Some(service) => service,
            None => self.env.resolve_or("DOCKER_SERVICE", DEFAULT_SERVICE)?,
        };
        let compose_file = self
            .env
            .resolve_or("DOCKER_COMPOSE_FILE", DEFAULT_COMPOSE_FILE)?;

        let mut command = intent.command;
        let mut workdir = intent.workdir;
        if workdir.is_none()
            && let Some(container_root) = self.env.resolve("DOCKER_PROJECT_ROOT")?
        {
            // Best-effort textual rewrite, not a path-namespace translation:
            // every occurrence of the host root in the command string becomes
            // the container root, even inside unrelated tokens (a password
            // containing the host path would be rewritten too).
            command = command.replace(&self.project_root, &container_root);
            workdir = Some(container_root);
        }

        let exec_mode = if self.probe.is_running(&compose_file, &service) {
            // Attach to the long-lived container: faster, reuses its
            // process/filesystem state.
            ExecMode::Exec
        } else {
            // No persistent service (e.g. one-shot CI): throwaway container.
            ExecMode::RunRm
        };

        // Token order is significant for compose CLI parsing:
        // docker compose -f <file> <mode> [-T] [--workdir <dir>] <service> <cmd...>
        let mut argv: Vec<String> = vec![
            "docker".to_string(),
            "compose".to_string(),
            "-f".to_string(),
            compose_file,
        ];
        match exec_mode {
            ExecMode::Exec => argv.push("exec".to_string()),
            ExecMode::RunRm => {
                argv.push("run".to_string());
                argv.push("--rm".to_string());
            }
        }
        if !intent.tty {
            argv.push("-T".to_string());
        }
        if let Some(dir) = workdir {
            argv.push("--workdir".to_string());
            argv.push(dir);
        }
        argv.push(service);
        argv.extend(split_command(&command)?);

        Ok(Invocation {
            argv,
            containerized: true,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecMode {
    Exec,
    RunRm,
}

/// Split a shell-syntax command string into an argv vector.
fn split_command(command: &str) -> Result<Vec<String>> {
    let argv = shell_words::split(command).map_err(|e| {
        CommisError::UserError(format!(
            "failed to parse command '{}': {}\n\
             Fix: check for unmatched quotes or invalid escape sequences.",
            command, e
        ))
    })?;
    if argv.is_empty() {
        return Err(CommisError::UserError(format!(
            "command is empty after parsing: '{}'",
            command
        )));
    }
    Ok(argv)
}
