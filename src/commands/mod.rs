//! Command handlers for `commit`, `pr`, `show-config` and `init`.

pub mod commit;
pub mod init;
pub mod pr;
pub mod show_config;

use std::io::Write;
use std::path::Path;

use dialoguer::{Confirm, Select};
use tempfile::NamedTempFile;

use crate::error::CommandError;

/// Interactive prompts used by the commit flow.
pub trait Interaction {
    /// Pick one of `items`. `None` when the user backs out.
    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>, CommandError>;

    /// Yes/no question defaulting to yes.
    fn confirm(&self, prompt: &str) -> Result<bool, CommandError>;
}

/// Terminal prompts backed by `dialoguer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal;

impl Interaction for Terminal {
    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>, CommandError> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()
            .map_err(|e| CommandError::Interaction(e.to_string()))
    }

    fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()
            .map_err(|e| CommandError::Interaction(e.to_string()))
    }
}

/// Write `content` to `path` through a temp file in the same directory.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<(), CommandError> {
    let io_err = |source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or(Path::new("."));

    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    file.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
