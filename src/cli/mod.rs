//! CLI argument parsing for commis.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Commis: framework recipe task-runner with local/Docker Compose dispatch.
///
/// Tasks come from per-framework recipes (symfony, laravel, wordpress, ...)
/// and either run locally or get proxied into a Docker Compose service when
/// `CASTOR_DOCKER` is enabled.
#[derive(Parser, Debug)]
#[command(name = "commis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for commis.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available recipes and their tasks.
    List(ListArgs),

    /// Run a recipe task.
    ///
    /// The task runs locally unless `CASTOR_DOCKER` is "1" or "true", in
    /// which case it is wrapped into a compose exec/run invocation.
    Run(RunArgs),

    /// Personal spell-check dictionary maintenance.
    Dict(DictCommand),
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show only this recipe's tasks.
    pub recipe: Option<String>,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Task reference as <recipe>:<task> (e.g. symfony:cache-clear).
    pub task: String,

    /// Extra arguments appended to the task command (after `--`).
    #[arg(last = true)]
    pub args: Vec<String>,

    /// Override the target compose service for this invocation.
    #[arg(long)]
    pub service: Option<String>,

    /// Disable TTY allocation for the containerized command (compose -T).
    #[arg(long)]
    pub no_tty: bool,

    /// Load only this env file instead of the derived dotenv candidates.
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Environment name for dotenv candidate selection (e.g. "test").
    #[arg(long)]
    pub env_name: Option<String>,

    /// Print the resolved invocation without executing it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Dictionary subcommands.
#[derive(Parser, Debug)]
pub struct DictCommand {
    #[command(subcommand)]
    pub action: DictAction,
}

/// Available dictionary actions.
#[derive(Subcommand, Debug)]
pub enum DictAction {
    /// Add a word to the personal dictionary (kept sorted, de-duplicated).
    Add(DictAddArgs),

    /// List the words in the personal dictionary.
    List(DictFileArgs),
}

/// Arguments for `dict add`.
#[derive(Parser, Debug)]
pub struct DictAddArgs {
    /// Word to add (stored lowercase).
    pub word: String,

    /// Dictionary file path.
    #[arg(long, default_value = ".aspell.en.pws")]
    pub file: PathBuf,
}

/// Arguments for dictionary commands that only need the file path.
#[derive(Parser, Debug)]
pub struct DictFileArgs {
    /// Dictionary file path.
    #[arg(long, default_value = ".aspell.en.pws")]
    pub file: PathBuf,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_list() {
        let cli = Cli::try_parse_from(["commis", "list"]).unwrap();
        if let Command::List(args) = cli.command {
            assert_eq!(args.recipe, None);
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn parse_list_with_recipe() {
        let cli = Cli::try_parse_from(["commis", "list", "symfony"]).unwrap();
        if let Command::List(args) = cli.command {
            assert_eq!(args.recipe, Some("symfony".to_string()));
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn parse_run_minimal() {
        let cli = Cli::try_parse_from(["commis", "run", "symfony:cache-clear"]).unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.task, "symfony:cache-clear");
            assert!(args.args.is_empty());
            assert_eq!(args.service, None);
            assert!(!args.no_tty);
            assert!(!args.dry_run);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_run_full() {
        let cli = Cli::try_parse_from([
            "commis",
            "run",
            "symfony:cs-fix",
            "--service",
            "php",
            "--no-tty",
            "--dry-run",
            "--",
            "src/Foo.php",
            "src/Bar.php",
        ])
        .unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.task, "symfony:cs-fix");
            assert_eq!(args.args, vec!["src/Foo.php", "src/Bar.php"]);
            assert_eq!(args.service, Some("php".to_string()));
            assert!(args.no_tty);
            assert!(args.dry_run);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_run_with_env_options() {
        let cli = Cli::try_parse_from([
            "commis",
            "run",
            "laravel:migrate",
            "--env-file",
            ".env.ci",
            "--env-name",
            "test",
        ])
        .unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.env_file, Some(PathBuf::from(".env.ci")));
            assert_eq!(args.env_name, Some("test".to_string()));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_dict_add() {
        let cli = Cli::try_parse_from(["commis", "dict", "add", "dockerize"]).unwrap();
        if let Command::Dict(dict_cmd) = cli.command {
            if let DictAction::Add(args) = dict_cmd.action {
                assert_eq!(args.word, "dockerize");
                assert_eq!(args.file, PathBuf::from(".aspell.en.pws"));
            } else {
                panic!("Expected Add action");
            }
        } else {
            panic!("Expected Dict command");
        }
    }

    #[test]
    fn parse_dict_list_with_file() {
        let cli =
            Cli::try_parse_from(["commis", "dict", "list", "--file", "words.pws"]).unwrap();
        if let Command::Dict(dict_cmd) = cli.command {
            if let DictAction::List(args) = dict_cmd.action {
                assert_eq!(args.file, PathBuf::from("words.pws"));
            } else {
                panic!("Expected List action");
            }
        } else {
            panic!("Expected Dict command");
        }
    }
}
