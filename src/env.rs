//! Process environment access.
//!
//! Credentials, endpoints and proxy settings are read through [`Environment`]
//! rather than `std::env` directly. Production code uses [`ProcessEnv`], which
//! re-reads the live environment on every lookup, so mutating the environment
//! between two calls is observable. Tests use [`MapEnv`] snapshots.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

/// Read-only view of environment variables.
pub trait Environment: Send + Sync {
    /// Raw lookup. Returns `None` when the variable is unset.
    fn get(&self, name: &str) -> Option<String>;

    /// Lookup that treats an empty value the same as an unset one.
    fn non_empty(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty())
    }
}

/// The live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed snapshot of variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    pub fn remove(&mut self, name: &str) {
        self.vars.remove(name);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Load `<repo_root>/.env` into the process environment if it exists.
///
/// Variables already set in the environment are left untouched.
pub fn load_dotenv(repo_root: &Path) {
    let path = repo_root.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => debug!("Ignoring {}: {}", path.display(), e),
    }
}
