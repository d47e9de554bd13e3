//! Built-in framework recipes.
//!
//! Task bodies here are deliberately thin: fixed command strings
//! parameterized only through environment keys (`PHP_BIN`, `COMPOSER_BIN`,
//! `DB_*`, tool-specific `*_BIN`). No framework semantics live in commis;
//! the interesting work happens in the docker dispatcher these intents flow
//! into.

use crate::docker::CommandIntent;
use crate::env::EnvResolver;
use crate::error::Result;
use crate::recipe::{Recipe, RecipeRegistry, Task};

/// Build the registry of all built-in recipes.
pub fn registry() -> RecipeRegistry {
    let mut registry = RecipeRegistry::new();
    registry.register(symfony());
    registry.register(laravel());
    registry.register(wordpress());
    registry.register(magento2());
    registry.register(shopware());
    registry.register(orocommerce());
    registry.register(typo3());
    registry.register(codeigniter());
    registry
}

// ---------------------------------------------------------------------------
// Shared command builders
// ---------------------------------------------------------------------------

fn php_bin(env: &mut EnvResolver) -> Result<String> {
    env.resolve_or("PHP_BIN", "php")
}

fn composer_bin(env: &mut EnvResolver) -> Result<String> {
    env.resolve_or("COMPOSER_BIN", "composer")
}

/// Append extra CLI arguments verbatim, shell-quoted.
fn with_args(command: String, args: &[String]) -> String {
    if args.is_empty() {
        command
    } else {
        format!("{} {}", command, shell_words::join(args))
    }
}

fn composer_install(env: &mut EnvResolver, args: &[String]) -> Result<CommandIntent> {
    let composer = composer_bin(env)?;
    Ok(CommandIntent::new(with_args(
        format!("{composer} install"),
        args,
    )))
}

/// `php bin/console <args>` style invocation (Symfony-family consoles).
fn console(env: &mut EnvResolver, console_args: &str, args: &[String]) -> Result<CommandIntent> {
    let php = php_bin(env)?;
    Ok(CommandIntent::new(with_args(
        format!("{php} bin/console {console_args}"),
        args,
    )))
}

fn phpunit(env: &mut EnvResolver, args: &[String]) -> Result<CommandIntent> {
    let php = php_bin(env)?;
    let phpunit = env.resolve_or("PHPUNIT_BIN", "vendor/bin/phpunit")?;
    Ok(CommandIntent::new(with_args(
        format!("{php} {phpunit}"),
        args,
    )))
}

/// PHP-CS-Fixer with the file list appended verbatim.
fn cs_fix(env: &mut EnvResolver, args: &[String]) -> Result<CommandIntent> {
    let fixer = env.resolve_or("PHP_CS_FIXER_BIN", "vendor/bin/php-cs-fixer")?;
    Ok(CommandIntent::new(with_args(format!("{fixer} fix"), args)))
}

/// Create the project database via the mysql client.
///
/// The SQL is a single argv token thanks to shell-words quoting, so
/// backticks and spaces in it survive dispatch untouched.
fn db_create(env: &mut EnvResolver, _args: &[String]) -> Result<CommandIntent> {
    let host = env.resolve_or("DB_HOST", "127.0.0.1")?;
    let user = env.resolve_or("DB_USER", "root")?;
    let password = env.resolve("DB_PASSWORD")?;
    let name = env.resolve_or("DB_NAME", "app")?;
    let charset = env.resolve_or("DB_CHARSET", "utf8mb4")?;
    let collation = env.resolve_or("DB_COLLATION", "utf8mb4_unicode_ci")?;

    let sql = format!(
        "CREATE DATABASE `{name}` CHARACTER SET {charset} COLLATE {collation}"
    );
    let mut command = format!("mysql -h{host} -u{user}");
    if let Some(password) = password {
        command.push_str(&format!(" -p{password}"));
    }
    command.push_str(&format!(" -e {}", shell_words::quote(&sql)));
    Ok(CommandIntent::new(command))
}

fn db_create_task() -> Task {
    Task::new("db-create", "Create the project database", db_create)
}

fn cs_fix_task() -> Task {
    Task::new("cs-fix", "Fix coding style with PHP-CS-Fixer", cs_fix)
}

fn install_task() -> Task {
    Task::new("install", "Install composer dependencies", composer_install)
}

fn test_task() -> Task {
    Task::new("test", "Run the PHPUnit test suite", phpunit)
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

fn symfony() -> Recipe {
    Recipe::new("symfony", "Symfony application tasks")
        .task(install_task())
        .task(Task::new("cache-clear", "Clear the application cache", |env, args| {
            console(env, "cache:clear", args)
        }))
        .task(Task::new("migrate", "Run Doctrine migrations", |env, args| {
            console(env, "doctrine:migrations:migrate --no-interaction", args)
        }))
        .task(test_task())
        .task(cs_fix_task())
        .task(db_create_task())
}

fn laravel() -> Recipe {
    Recipe::new("laravel", "Laravel application tasks")
        .task(install_task())
        .task(Task::new("migrate", "Run database migrations", |env, args| {
            let php = php_bin(env)?;
            Ok(CommandIntent::new(with_args(
                format!("{php} artisan migrate --force"),
                args,
            )))
        }))
        .task(Task::new("cache-clear", "Clear all framework caches", |env, args| {
            let php = php_bin(env)?;
            Ok(CommandIntent::new(with_args(
                format!("{php} artisan optimize:clear"),
                args,
            )))
        }))
        .task(Task::new("test", "Run the test suite", |env, args| {
            let php = php_bin(env)?;
            Ok(CommandIntent::new(with_args(
                format!("{php} artisan test"),
                args,
            )))
        }))
        .task(cs_fix_task())
        .task(db_create_task())
}

fn wordpress() -> Recipe {
    Recipe::new("wordpress", "WordPress site tasks")
        .task(install_task())
        .task(Task::new("cache-flush", "Flush the object cache", |env, args| {
            let wp = env.resolve_or("WP_CLI_BIN", "wp")?;
            Ok(CommandIntent::new(with_args(
                format!("{wp} cache flush"),
                args,
            )))
        }))
        .task(Task::new("core-update", "Update WordPress core", |env, args| {
            let wp = env.resolve_or("WP_CLI_BIN", "wp")?;
            Ok(CommandIntent::new(with_args(
                format!("{wp} core update"),
                args,
            )))
        }))
        .task(db_create_task())
}

fn magento2() -> Recipe {
    Recipe::new("magento2", "Magento 2 shop tasks")
        .task(install_task())
        .task(Task::new("setup-upgrade", "Run setup upgrade", |env, args| {
            let php = php_bin(env)?;
            Ok(CommandIntent::new(with_args(
                format!("{php} bin/magento setup:upgrade"),
                args,
            )))
        }))
        .task(Task::new("cache-clean", "Clean the Magento cache", |env, args| {
            let php = php_bin(env)?;
            Ok(CommandIntent::new(with_args(
                format!("{php} bin/magento cache:clean"),
                args,
            )))
        }))
        .task(test_task())
        .task(db_create_task())
}

fn shopware() -> Recipe {
    Recipe::new("shopware", "Shopware 6 shop tasks")
        .task(install_task())
        .task(Task::new("cache-clear", "Clear the application cache", |env, args| {
            console(env, "cache:clear", args)
        }))
        .task(Task::new("migrate", "Run all pending migrations", |env, args| {
            console(env, "database:migrate --all", args)
        }))
        .task(db_create_task())
}

fn orocommerce() -> Recipe {
    Recipe::new("orocommerce", "OroCommerce application tasks")
        .task(install_task())
        .task(Task::new("cache-clear", "Clear the application cache", |env, args| {
            console(env, "cache:clear", args)
        }))
        .task(Task::new("migrate", "Load Oro migrations", |env, args| {
            console(env, "oro:migration:load --force", args)
        }))
        .task(db_create_task())
}

fn typo3() -> Recipe {
    Recipe::new("typo3", "TYPO3 site tasks")
        .task(install_task())
        .task(Task::new("cache-flush", "Flush all TYPO3 caches", |env, args| {
            let php = php_bin(env)?;
            let typo3 = env.resolve_or("TYPO3_BIN", "vendor/bin/typo3")?;
            Ok(CommandIntent::new(with_args(
                format!("{php} {typo3} cache:flush"),
                args,
            )))
        }))
        .task(db_create_task())
}

fn codeigniter() -> Recipe {
    Recipe::new("codeigniter", "CodeIgniter 4 application tasks")
        .task(install_task())
        .task(Task::new("migrate", "Run database migrations", |env, args| {
            let php = php_bin(env)?;
            Ok(CommandIntent::new(with_args(
                format!("{php} spark migrate"),
                args,
            )))
        }))
        .task(test_task())
        .task(db_create_task())
}
