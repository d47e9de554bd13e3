//! Recipe and task registry.
//!
//! A recipe is a named bundle of tasks for one framework. Tasks carry a
//! builder closure that turns resolved configuration into a
//! [`CommandIntent`]; the docker dispatcher then decides where the command
//! actually runs. The registry is an explicitly constructed instance owned
//! by the entry point, never a process-wide singleton.

pub mod catalog;

use crate::docker::CommandIntent;
use crate::env::EnvResolver;
use crate::error::{CommisError, Result};
use std::collections::BTreeMap;
use std::fmt;

type TaskBuilder = Box<dyn Fn(&mut EnvResolver, &[String]) -> Result<CommandIntent>>;

/// A single runnable task within a recipe.
pub struct Task {
    pub name: String,
    pub description: String,
    builder: TaskBuilder,
}

impl Task {
    pub fn new<F>(name: &str, description: &str, builder: F) -> Self
    where
        F: Fn(&mut EnvResolver, &[String]) -> Result<CommandIntent> + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            builder: Box::new(builder),
        }
    }

    /// Build the command intent for this task.
    ///
    /// `args` are extra CLI arguments appended verbatim by most tasks.
    pub fn intent(&self, env: &mut EnvResolver, args: &[String]) -> Result<CommandIntent> {
        (self.builder)(env, args)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A named bundle of tasks for one target framework.
#[derive(Debug)]
pub struct Recipe {
    pub name: String,
    pub description: String,
    tasks: BTreeMap<String, Task>,
}

impl Recipe {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            tasks: BTreeMap::new(),
        }
    }

    /// Add a task, builder-style.
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.insert(task.name.clone(), task);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// Tasks in name order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }
}

/// Name-keyed collection of recipes with discovery and lookup.
#[derive(Debug, Default)]
pub struct RecipeRegistry {
    recipes: BTreeMap<String, Recipe>,
}

impl RecipeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, recipe: Recipe) {
        self.recipes.insert(recipe.name.clone(), recipe);
    }

    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    /// Registered recipe names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.recipes.keys().map(String::as_str).collect()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    /// Look up a `<recipe>:<task>` reference.
    pub fn find_task(&self, reference: &str) -> Result<(&Recipe, &Task)> {
        let Some((recipe_name, task_name)) = reference.split_once(':') else {
            return Err(CommisError::UserError(format!(
                "invalid task reference '{}': expected <recipe>:<task> (e.g. symfony:cache-clear)",
                reference
            )));
        };

        let recipe = self.get(recipe_name).ok_or_else(|| {
            CommisError::UserError(format!(
                "unknown recipe '{}'. Available recipes: {}",
                recipe_name,
                self.names().join(", ")
            ))
        })?;

        let task = recipe.get(task_name).ok_or_else(|| {
            CommisError::UserError(format!(
                "unknown task '{}' in recipe '{}'. Available tasks: {}",
                task_name,
                recipe_name,
                recipe
                    .tasks()
                    .map(|t| t.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        Ok((recipe, task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_registry() -> RecipeRegistry {
        let mut registry = RecipeRegistry::new();
        registry.register(
            Recipe::new("demo", "Demo recipe").task(Task::new(
                "hello",
                "Say hello",
                |_env, _args| Ok(CommandIntent::new("echo hello")),
            )),
        );
        registry
    }

    #[test]
    fn find_task_resolves_reference() {
        let registry = sample_registry();
        let (recipe, task) = registry.find_task("demo:hello").unwrap();
        assert_eq!(recipe.name, "demo");
        assert_eq!(task.name, "hello");
    }

    #[test]
    fn find_task_rejects_missing_separator() {
        let registry = sample_registry();
        let err = registry.find_task("demohello").unwrap_err();
        assert!(err.to_string().contains("expected <recipe>:<task>"));
    }

    #[test]
    fn find_task_lists_available_recipes() {
        let registry = sample_registry();
        let err = registry.find_task("nope:hello").unwrap_err();
        assert!(err.to_string().contains("unknown recipe 'nope'"));
        assert!(err.to_string().contains("demo"));
    }

    #[test]
    fn find_task_lists_available_tasks() {
        let registry = sample_registry();
        let err = registry.find_task("demo:nope").unwrap_err();
        assert!(err.to_string().contains("unknown task 'nope'"));
        assert!(err.to_string().contains("hello"));
    }

    #[test]
    fn task_builder_receives_resolver() {
        let temp_dir = TempDir::new().unwrap();
        let mut env = EnvResolver::new(temp_dir.path());

        let task = Task::new("probe", "Uses the resolver", |env, _args| {
            let shell = env.resolve_or("COMMIS_REGISTRY_TEST_SHELL", "sh")?;
            Ok(CommandIntent::new(format!("{shell} -v")))
        });

        let intent = task.intent(&mut env, &[]).unwrap();
        assert_eq!(intent.command, "sh -v");
    }

    #[test]
    fn registry_names_are_sorted() {
        let mut registry = RecipeRegistry::new();
        registry.register(Recipe::new("zulu", ""));
        registry.register(Recipe::new("alpha", ""));
        assert_eq!(registry.names(), vec!["alpha", "zulu"]);
    }
}
