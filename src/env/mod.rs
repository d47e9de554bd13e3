//! Environment resolution for commis.
//!
//! Configuration values are resolved with a fixed precedence: scoped
//! override → loaded environment files → process environment → default.
//! Dotenv files are loaded at most once per resolver; after the first
//! resolution pass only the live process environment is consulted.
//!
//! The resolver is an explicitly constructed instance owned by the entry
//! point and threaded through call sites. The "load once per process"
//! contract lives in an instance field, so every test gets a fresh resolver.

mod guard;

pub use guard::EnvOverride;

use crate::error::{CommisError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Dotenv base filename used when the manifest does not specify one.
pub const DEFAULT_DOTENV_BASE: &str = ".env";

/// Project manifest consulted for `extra.runtime.dotenv_path`.
pub const MANIFEST_FILE: &str = "composer.json";

/// Resolves configuration keys against dotenv files and the process
/// environment.
#[derive(Debug)]
pub struct EnvResolver {
    /// Project root where the manifest and env files live.
    root: PathBuf,

    /// Sticky flag: once set, no further file I/O happens for this resolver.
    loaded: bool,

    /// Manifest-derived dotenv base filename, cached per root path.
    dotenv_base_cache: HashMap<PathBuf, String>,
}

impl EnvResolver {
    /// Create a resolver rooted at the given project directory.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            loaded: false,
            dotenv_base_cache: HashMap::new(),
        }
    }

    /// The project root this resolver was constructed with.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key, returning `None` when it is unset or empty.
    pub fn resolve(&mut self, key: &str) -> Result<Option<String>> {
        self.resolve_with(key, None, None)
    }

    /// Resolve a key, falling back to `default` when unset or empty.
    pub fn resolve_or(&mut self, key: &str, default: &str) -> Result<String> {
        Ok(self
            .resolve(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Resolve a key with an explicit env file or environment name.
    ///
    /// Both arguments only matter on the very first call: once the resolver
    /// has loaded, they are ignored and lookups go straight to the process
    /// environment.
    pub fn resolve_with(
        &mut self,
        key: &str,
        explicit_path: Option<&Path>,
        environment: Option<&str>,
    ) -> Result<Option<String>> {
        self.ensure_loaded(explicit_path, environment)?;
        Ok(lookup(key))
    }

    /// Trigger the one-time env file load without resolving a key.
    ///
    /// Useful for callers that want CLI-provided `--env-file`/`--env-name`
    /// to win the first (and only) load.
    pub fn ensure_loaded(
        &mut self,
        explicit_path: Option<&Path>,
        environment: Option<&str>,
    ) -> Result<()> {
        if !self.loaded {
            self.load(explicit_path, environment)?;
            self.loaded = true;
        }
        Ok(())
    }

    /// Load env files for the first resolution pass.
    fn load(&mut self, explicit_path: Option<&Path>, environment: Option<&str>) -> Result<()> {
        if let Some(path) = explicit_path {
            if path.exists() {
                let _ = dotenvy::from_path_override(path);
            }
            return Ok(());
        }

        let base = self.dotenv_base()?;
        // Candidates are ordered most specific first; loading in reverse
        // lets later (more specific) files override earlier ones.
        for path in candidate_files(&self.root, &base, environment).iter().rev() {
            if path.exists() {
                let _ = dotenvy::from_path_override(path);
            }
        }
        Ok(())
    }

    /// Dotenv base filename from the project manifest, cached per root.
    fn dotenv_base(&mut self) -> Result<String> {
        if let Some(cached) = self.dotenv_base_cache.get(&self.root) {
            return Ok(cached.clone());
        }
        let base = manifest_dotenv_base(&self.root)?;
        self.dotenv_base_cache
            .insert(self.root.clone(), base.clone());
        Ok(base)
    }
}

/// Candidate env file paths, most specific first.
///
/// With an environment name: `<base>.<env>`, `<base>`, `<base>.example`.
/// Without: `<base>.local`, `<base>`, `<base>.example`.
fn candidate_files(root: &Path, base: &str, environment: Option<&str>) -> Vec<PathBuf> {
    let most_specific = match environment {
        Some(env_name) if !env_name.is_empty() => format!("{base}.{env_name}"),
        _ => format!("{base}.local"),
    };
    vec![
        root.join(most_specific),
        root.join(base),
        root.join(format!("{base}.example")),
    ]
}

/// The slice of the project manifest we care about. Unknown fields are
/// ignored for forward compatibility; missing sections default to empty.
#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    extra: ManifestExtra,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestExtra {
    #[serde(default)]
    runtime: ManifestRuntime,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestRuntime {
    #[serde(default)]
    dotenv_path: Option<String>,
}

/// Read `extra.runtime.dotenv_path` from the manifest at `root`.
///
/// A missing or unreadable manifest falls back to `.env`. A manifest that
/// exists but is not valid JSON is a hard error: guessing a dotenv path for
/// a broken manifest would mask the breakage.
fn manifest_dotenv_base(root: &Path) -> Result<String> {
    let path = root.join(MANIFEST_FILE);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(_) => return Ok(DEFAULT_DOTENV_BASE.to_string()),
    };

    let manifest: Manifest =
        serde_json::from_str(&raw).map_err(|e| CommisError::ManifestParse {
            path,
            message: e.to_string(),
        })?;

    Ok(manifest
        .extra
        .runtime
        .dotenv_path
        .unwrap_or_else(|| DEFAULT_DOTENV_BASE.to_string()))
}

/// Process environment lookup where an empty value counts as unset.
///
/// This mirrors shell-style `${VAR:-default}` checks: callers that set a key
/// to the empty string get the default, same as not setting it at all.
fn lookup(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

/// Set a process environment variable.
///
/// commis is single-threaded and blocking, so the no-concurrent-access
/// requirement of `set_var` holds for the whole process lifetime.
pub(crate) fn set_process_var(key: &str, value: &str) {
    unsafe { env::set_var(key, value) };
}

/// Remove a process environment variable. Same threading contract as
/// [`set_process_var`].
pub(crate) fn remove_process_var(key: &str) {
    unsafe { env::remove_var(key) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    #[serial]
    fn resolve_returns_default_when_unset_and_when_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut resolver = EnvResolver::new(temp_dir.path());

        remove_process_var("COMMIS_ENV_TEST_UNSET");
        assert_eq!(
            resolver.resolve_or("COMMIS_ENV_TEST_UNSET", "fallback").unwrap(),
            "fallback"
        );

        // Empty string is treated as unset for defaulting purposes.
        let _guard = EnvOverride::set("COMMIS_ENV_TEST_EMPTY", "");
        assert_eq!(
            resolver.resolve_or("COMMIS_ENV_TEST_EMPTY", "fallback").unwrap(),
            "fallback"
        );

        let _guard = EnvOverride::set("COMMIS_ENV_TEST_SET", "value");
        assert_eq!(
            resolver.resolve_or("COMMIS_ENV_TEST_SET", "fallback").unwrap(),
            "value"
        );
    }

    #[test]
    #[serial]
    fn loads_env_file_from_root() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), ".env", "COMMIS_ENV_TEST_FILE=from_file\n");
        remove_process_var("COMMIS_ENV_TEST_FILE");

        let mut resolver = EnvResolver::new(temp_dir.path());
        assert_eq!(
            resolver.resolve("COMMIS_ENV_TEST_FILE").unwrap().as_deref(),
            Some("from_file")
        );

        remove_process_var("COMMIS_ENV_TEST_FILE");
    }

    #[test]
    #[serial]
    fn more_specific_file_overrides_base() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), ".env", "COMMIS_ENV_TEST_PREC=base\n");
        write_file(temp_dir.path(), ".env.local", "COMMIS_ENV_TEST_PREC=local\n");
        remove_process_var("COMMIS_ENV_TEST_PREC");

        let mut resolver = EnvResolver::new(temp_dir.path());
        assert_eq!(
            resolver.resolve("COMMIS_ENV_TEST_PREC").unwrap().as_deref(),
            Some("local")
        );

        remove_process_var("COMMIS_ENV_TEST_PREC");
    }

    #[test]
    #[serial]
    fn environment_name_selects_candidate_file() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), ".env", "COMMIS_ENV_TEST_NAME=base\n");
        write_file(temp_dir.path(), ".env.test", "COMMIS_ENV_TEST_NAME=test\n");
        remove_process_var("COMMIS_ENV_TEST_NAME");

        let mut resolver = EnvResolver::new(temp_dir.path());
        assert_eq!(
            resolver
                .resolve_with("COMMIS_ENV_TEST_NAME", None, Some("test"))
                .unwrap()
                .as_deref(),
            Some("test")
        );

        remove_process_var("COMMIS_ENV_TEST_NAME");
    }

    #[test]
    #[serial]
    fn example_file_is_weakest_candidate() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), ".env.example", "COMMIS_ENV_TEST_EX=example\n");
        remove_process_var("COMMIS_ENV_TEST_EX");

        let mut resolver = EnvResolver::new(temp_dir.path());
        assert_eq!(
            resolver.resolve("COMMIS_ENV_TEST_EX").unwrap().as_deref(),
            Some("example")
        );

        remove_process_var("COMMIS_ENV_TEST_EX");
    }

    #[test]
    #[serial]
    fn loaded_flag_sticks_across_calls() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.env");
        let second = temp_dir.path().join("second.env");
        std::fs::write(&first, "COMMIS_ENV_TEST_FIRST=one\n").unwrap();
        std::fs::write(&second, "COMMIS_ENV_TEST_SECOND=two\n").unwrap();
        remove_process_var("COMMIS_ENV_TEST_FIRST");
        remove_process_var("COMMIS_ENV_TEST_SECOND");

        let mut resolver = EnvResolver::new(temp_dir.path());
        assert_eq!(
            resolver
                .resolve_with("COMMIS_ENV_TEST_FIRST", Some(&first), None)
                .unwrap()
                .as_deref(),
            Some("one")
        );

        // The second explicit path must be ignored: the first load wins for
        // the life of the resolver.
        assert_eq!(
            resolver
                .resolve_with("COMMIS_ENV_TEST_SECOND", Some(&second), None)
                .unwrap(),
            None
        );

        remove_process_var("COMMIS_ENV_TEST_FIRST");
    }

    #[test]
    #[serial]
    fn missing_env_files_are_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut resolver = EnvResolver::new(temp_dir.path());
        assert_eq!(resolver.resolve("COMMIS_ENV_TEST_NONE").unwrap(), None);
    }

    #[test]
    #[serial]
    fn manifest_dotenv_path_renames_base() {
        let temp_dir = TempDir::new().unwrap();
        write_file(
            temp_dir.path(),
            MANIFEST_FILE,
            r#"{"extra": {"runtime": {"dotenv_path": ".env.dist"}}}"#,
        );
        write_file(temp_dir.path(), ".env.dist", "COMMIS_ENV_TEST_DIST=dist\n");
        write_file(temp_dir.path(), ".env", "COMMIS_ENV_TEST_DIST=plain\n");
        remove_process_var("COMMIS_ENV_TEST_DIST");

        let mut resolver = EnvResolver::new(temp_dir.path());
        assert_eq!(
            resolver.resolve("COMMIS_ENV_TEST_DIST").unwrap().as_deref(),
            Some("dist")
        );

        remove_process_var("COMMIS_ENV_TEST_DIST");
    }

    #[test]
    #[serial]
    fn manifest_without_dotenv_field_uses_default() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), MANIFEST_FILE, r#"{"name": "acme/app"}"#);
        write_file(temp_dir.path(), ".env", "COMMIS_ENV_TEST_DEF=ok\n");
        remove_process_var("COMMIS_ENV_TEST_DEF");

        let mut resolver = EnvResolver::new(temp_dir.path());
        assert_eq!(
            resolver.resolve("COMMIS_ENV_TEST_DEF").unwrap().as_deref(),
            Some("ok")
        );

        remove_process_var("COMMIS_ENV_TEST_DEF");
    }

    #[test]
    #[serial]
    fn malformed_manifest_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), MANIFEST_FILE, "{not json");

        let mut resolver = EnvResolver::new(temp_dir.path());
        let err = resolver.resolve("ANY_KEY").unwrap_err();
        assert!(matches!(err, CommisError::ManifestParse { .. }));
        assert!(err.to_string().contains("composer.json"));
    }

    #[test]
    fn candidate_order_is_most_specific_first() {
        let root = Path::new("/project");

        let with_env = candidate_files(root, ".env", Some("staging"));
        assert_eq!(with_env[0], root.join(".env.staging"));
        assert_eq!(with_env[1], root.join(".env"));
        assert_eq!(with_env[2], root.join(".env.example"));

        let without = candidate_files(root, ".env", None);
        assert_eq!(without[0], root.join(".env.local"));
        assert_eq!(without[1], root.join(".env"));
        assert_eq!(without[2], root.join(".env.example"));
    }
}
