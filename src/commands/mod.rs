//! Command implementations for commis.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. All dependencies (resolver, registry, probe) are
//! constructed here and threaded through explicitly.

use crate::cli::{Command, DictAction, DictAddArgs, DictCommand, DictFileArgs, ListArgs, RunArgs};
use crate::dictionary::Dictionary;
use crate::docker::{ComposeProbe, Dispatcher};
use crate::env::EnvResolver;
use crate::error::{CommisError, Result};
use crate::exec;
use crate::recipe::catalog;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::List(args) => cmd_list(args),
        Command::Run(args) => cmd_run(args),
        Command::Dict(dict_cmd) => dispatch_dict(dict_cmd),
    }
}

/// Dispatch dictionary subcommands.
fn dispatch_dict(dict_cmd: DictCommand) -> Result<()> {
    match dict_cmd.action {
        DictAction::Add(args) => cmd_dict_add(args),
        DictAction::List(args) => cmd_dict_list(args),
    }
}

fn cmd_list(args: ListArgs) -> Result<()> {
    let registry = catalog::registry();

    match args.recipe {
        Some(name) => {
            let recipe = registry.get(&name).ok_or_else(|| {
                CommisError::UserError(format!(
                    "unknown recipe '{}'. Available recipes: {}",
                    name,
                    registry.names().join(", ")
                ))
            })?;
            println!("{} — {}", recipe.name, recipe.description);
            for task in recipe.tasks() {
                println!("  {}:{:<16} {}", recipe.name, task.name, task.description);
            }
        }
        None => {
            for recipe in registry.recipes() {
                println!("{} — {}", recipe.name, recipe.description);
                for task in recipe.tasks() {
                    println!("  {}:{:<16} {}", recipe.name, task.name, task.description);
                }
                println!();
            }
        }
    }
    Ok(())
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        CommisError::UserError(format!("failed to get current working directory: {}", e))
    })?;

    let mut env = EnvResolver::new(&cwd);
    env.ensure_loaded(args.env_file.as_deref(), args.env_name.as_deref())?;

    let registry = catalog::registry();
    let (_recipe, task) = registry.find_task(&args.task)?;
    let mut intent = task.intent(&mut env, &args.args)?;

    if let Some(service) = args.service {
        intent.service = Some(service);
    }
    if args.no_tty {
        intent.tty = false;
    }

    let probe = ComposeProbe;
    let project_root = cwd.to_string_lossy().into_owned();
    let mut dispatcher = Dispatcher::new(&mut env, &probe, project_root);
    let invocation = dispatcher.dispatch(intent)?;

    if args.dry_run {
        println!("{}", invocation.command_line());
        return Ok(());
    }

    exec::run(&invocation)
}

fn cmd_dict_add(args: DictAddArgs) -> Result<()> {
    let mut dictionary = Dictionary::load(&args.file)?;
    if dictionary.add(&args.word) {
        dictionary.save(&args.file)?;
        println!("Added '{}' to {}", args.word.to_lowercase(), args.file.display());
    } else {
        println!("'{}' is already in {}", args.word.to_lowercase(), args.file.display());
    }
    Ok(())
}

fn cmd_dict_list(args: DictFileArgs) -> Result<()> {
    let dictionary = Dictionary::load(&args.file)?;
    for word in dictionary.words() {
        println!("{}", word);
    }
    Ok(())
}
