//! Layered configuration: discovery, merge, and prompt templates.

pub mod defaults;
pub mod locator;
pub mod merge;
pub mod template;
pub mod types;

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ConfigError;

pub use locator::{ConfigTier, Discovery, SearchContext, global_config_dir, locate, search};
pub use merge::{deep_merge, merge};
pub use template::fill_system_prompts;
pub use types::{
    AppConfig, CommitConfig, GitaiCommand, LlmConfig, PrConfig, ProviderConfig,
    ResolvedLlmConfig,
};

/// A resolved configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// Winning file, if any.
    pub source: Option<PathBuf>,
    pub tier: Option<ConfigTier>,
    /// Directory that relative prompt templates are resolved against.
    pub base_dir: PathBuf,
}

/// Fail unless a git repository was detected.
pub fn require_repo_root(ctx: &SearchContext) -> Result<&PathBuf, ConfigError> {
    ctx.repo_root.as_ref().ok_or(ConfigError::NoRepository)
}

/// Build the [`AppConfig`] for this run.
///
/// Requires a git repository. Merges the first discovered file (if any) onto
/// the built-in default, then fills in the system prompts.
pub fn load_config(ctx: &SearchContext) -> Result<LoadedConfig, ConfigError> {
    require_repo_root(ctx)?;

    let default = defaults::default_config_value();
    let discovered = locate(ctx)?;

    let (config, source, tier, base_dir) = match discovered {
        Some((tier, found)) => {
            let config = merge(&default, Some(&found.config))?;
            let base_dir = found
                .filepath
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| ctx.cwd.clone());
            (config, Some(found.filepath), Some(tier), base_dir)
        }
        None => {
            warn!("No configuration found. Using default configuration.");
            (merge(&default, None)?, None, None, ctx.cwd.clone())
        }
    };

    let mut config = config;
    fill_system_prompts(&mut config, &base_dir);
    debug!("Final config: {:?}", config);

    Ok(LoadedConfig {
        config,
        source,
        tier,
        base_dir,
    })
}

/// The raw, unmerged winning config and its path, for `show-config`.
pub fn load_raw_config(ctx: &SearchContext) -> Result<(Option<PathBuf>, Value), ConfigError> {
    Ok(match locate(ctx)? {
        Some((_, found)) => (Some(found.filepath), found.config),
        None => (None, Value::Object(Default::default())),
    })
}
