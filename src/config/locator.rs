//! Configuration file discovery.
//!
//! A search starts in one directory and walks toward the filesystem root,
//! checking [`search_places`] in order inside each directory. The walk stops
//! after visiting the optional stop directory, so a bounded search never
//! looks above it.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::ConfigError;

use super::defaults::NAMESPACE;

/// A configuration file that was found and parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    pub filepath: PathBuf,
    pub config: Value,
}

/// Which search produced a [`Discovery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigTier {
    Repository,
    Project,
    Global,
}

/// Directories that drive the three-tier lookup.
#[derive(Debug, Clone)]
pub struct SearchContext {
    /// Top-level directory of the enclosing git repository.
    pub repo_root: Option<PathBuf>,
    pub cwd: PathBuf,
    /// Usually `~/.gitai`.
    pub global_dir: PathBuf,
}

impl SearchContext {
    /// Build a context for the current process.
    pub fn from_process(repo_root: Option<PathBuf>) -> std::io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self {
            repo_root,
            cwd,
            global_dir: global_config_dir(),
        })
    }
}

/// `~/.gitai`, or `./.gitai` when no home directory can be determined.
pub fn global_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(format!(".{NAMESPACE}"))
}

/// Candidate file names, checked in this order inside each directory.
pub fn search_places() -> Vec<String> {
    vec![
        format!(".{NAMESPACE}/config.yaml"),
        format!(".{NAMESPACE}/config.yml"),
        "config.yaml".to_string(),
        "config.yml".to_string(),
        "config.json".to_string(),
        format!(".{NAMESPACE}rc.yaml"),
        format!(".{NAMESPACE}rc.yml"),
        format!(".{NAMESPACE}rc.json"),
    ]
}

/// Search from `start` upward, never above `stop_dir` when one is given.
///
/// Files that are empty (or parse to `null`) are skipped. A file that exists
/// but cannot be parsed is an error.
pub fn search(start: &Path, stop_dir: Option<&Path>) -> Result<Option<Discovery>, ConfigError> {
    let places = search_places();

    for dir in start.ancestors() {
        for place in &places {
            let candidate = dir.join(place);
            if !candidate.is_file() {
                continue;
            }
            if let Some(config) = load_file(&candidate)? {
                let filepath = std::path::absolute(&candidate).unwrap_or(candidate);
                return Ok(Some(Discovery { filepath, config }));
            }
            debug!("Skipping empty config file {}", candidate.display());
        }

        if stop_dir.is_some_and(|stop| dir == stop) {
            break;
        }
    }

    Ok(None)
}

/// Run the three tiers in precedence order and return the first hit.
///
/// 1. the repository root, bounded at itself;
/// 2. the working directory, unbounded;
/// 3. the global directory, bounded at itself.
pub fn locate(ctx: &SearchContext) -> Result<Option<(ConfigTier, Discovery)>, ConfigError> {
    if let Some(root) = &ctx.repo_root
        && let Some(found) = search(root, Some(root))?
    {
        debug!("Found config in git repo root: {}", found.filepath.display());
        return Ok(Some((ConfigTier::Repository, found)));
    }

    if let Some(found) = search(&ctx.cwd, None)? {
        debug!("Found config in project directory: {}", found.filepath.display());
        return Ok(Some((ConfigTier::Project, found)));
    }

    if let Some(found) = search(&ctx.global_dir, Some(&ctx.global_dir))? {
        debug!("Found config in global directory: {}", found.filepath.display());
        return Ok(Some((ConfigTier::Global, found)));
    }

    Ok(None)
}

fn load_file(path: &Path) -> Result<Option<Value>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(None);
    }

    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let value: Value = if is_json {
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    Ok(if value.is_null() { None } else { Some(value) })
}
