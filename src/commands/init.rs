//! `gitai init`: create a project `.gitai/` directory.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::defaults::{ENV_EXAMPLE, NAMESPACE, TEMPLATE_FILES};
use crate::error::CommandError;

const ENV_EXAMPLE_FILE: &str = ".env-example";

/// Flags for `gitai init`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    pub force: bool,
    pub from_global: bool,
    pub from_default: bool,
}

/// Where the new `.gitai/` was copied from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitSource {
    Global(PathBuf),
    BuiltIn,
}

/// Everything `init` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub target: PathBuf,
    pub source: InitSource,
    /// Previous `.gitai/`, renamed aside under `--force`.
    pub backup: Option<PathBuf>,
    /// `None` when an existing `.env-example` was left in place.
    pub env_example: Option<PathBuf>,
    pub has_git: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    AlreadyExists(PathBuf),
    Created(InitReport),
}

/// Create `<cwd>/.gitai` from `global_dir` or the built-in templates.
pub fn run(cwd: &Path, global_dir: &Path, opts: InitOptions) -> Result<InitOutcome, CommandError> {
    let target = cwd.join(format!(".{NAMESPACE}"));

    let backup = if target.exists() {
        if !opts.force {
            println!(".gitai already exists. Use --force to overwrite.");
            return Ok(InitOutcome::AlreadyExists(target));
        }
        let bak = move_aside(&target)?;
        println!("Backup created: {}", relative(cwd, &bak).display());
        Some(bak)
    } else {
        None
    };

    let source = if opts.from_global || (!opts.from_default && global_dir.is_dir()) {
        InitSource::Global(global_dir.to_path_buf())
    } else {
        InitSource::BuiltIn
    };

    match &source {
        InitSource::Global(dir) => {
            println!("Creating gitai configuration from {} ...", dir.display());
            copy_dir(dir, &target)?;
        }
        InitSource::BuiltIn => {
            println!("Creating gitai configuration from built-in templates ...");
            write_templates(&target)?;
        }
    }
    println!(
        "gitai configuration created successfully in {}",
        relative(cwd, &target).display()
    );

    let env_example = write_env_example(cwd, opts.force)?;

    let has_git = cwd.join(".git").exists();
    if !has_git {
        println!("No .git directory found. gitai requires a git repository to function properly.");
        println!("Please run \"git init\" to initialize a git repository first.");
    }

    Ok(InitOutcome::Created(InitReport {
        target,
        source,
        backup,
        env_example,
        has_git,
    }))
}

/// Seed `global_dir` from the built-in templates when it does not exist yet.
///
/// Returns whether anything was written.
pub fn bootstrap_global(global_dir: &Path) -> Result<bool, CommandError> {
    if global_dir.exists() {
        return Ok(false);
    }
    debug!("Creating global configuration in {}", global_dir.display());
    write_templates(global_dir)?;
    Ok(true)
}

/// Write the built-in template files under `dir`.
pub fn write_templates(dir: &Path) -> Result<(), CommandError> {
    for (name, content) in TEMPLATE_FILES {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        std::fs::write(&path, content).map_err(|source| CommandError::Io { path, source })?;
    }
    Ok(())
}

fn write_env_example(cwd: &Path, force: bool) -> Result<Option<PathBuf>, CommandError> {
    let path = cwd.join(ENV_EXAMPLE_FILE);

    if path.exists() {
        if !force {
            println!("{} already exists, skipping.", ENV_EXAMPLE_FILE);
            return Ok(None);
        }
        let bak = move_aside(&path)?;
        println!("Backup created: {}", relative(cwd, &bak).display());
    }

    std::fs::write(&path, ENV_EXAMPLE).map_err(|source| CommandError::Io {
        path: path.clone(),
        source,
    })?;
    println!("Created {} file in current directory.", ENV_EXAMPLE_FILE);
    Ok(Some(path))
}

/// Rename `path` to `<path>.bak-<millis>`.
fn move_aside(path: &Path) -> Result<PathBuf, CommandError> {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".bak-{}", Utc::now().timestamp_millis()));
    let bak = PathBuf::from(name);

    std::fs::rename(path, &bak).map_err(|source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bak)
}

fn copy_dir(src: &Path, dst: &Path) -> Result<(), CommandError> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| CommandError::Io {
            path: e.path().unwrap_or(src).to_path_buf(),
            source: e.into(),
        })?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let out = dst.join(rel);

        if entry.file_type().is_dir() {
            create_dir_all(&out)?;
        } else {
            std::fs::copy(entry.path(), &out).map_err(|source| CommandError::Io {
                path: out.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

fn create_dir_all(dir: &Path) -> Result<(), CommandError> {
    std::fs::create_dir_all(dir).map_err(|source| CommandError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn relative<'a>(base: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}
