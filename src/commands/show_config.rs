//! `gitai show-config`: print the winning config file and its raw content.

use std::path::Path;

use serde_json::Value;

use crate::config::{SearchContext, load_raw_config};
use crate::error::CommandError;

const NOT_FOUND: &str = "(not found)";

/// Print the config path, and unless `path_only`, the unmerged content.
pub fn run(ctx: &SearchContext, path_only: bool) -> Result<(), CommandError> {
    let (path, raw) = load_raw_config(ctx)?;
    print!("{}", render(path.as_deref(), &raw, path_only)?);
    Ok(())
}

pub fn render(path: Option<&Path>, raw: &Value, path_only: bool) -> Result<String, CommandError> {
    let path = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| NOT_FOUND.to_string());

    if path_only {
        return Ok(format!("{}\n", path));
    }

    Ok(format!(
        "Config path: {}\n{}\n{}",
        path,
        "-".repeat(32),
        serde_yaml::to_string(raw)?
    ))
}
