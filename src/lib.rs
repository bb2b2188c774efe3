//! gitai - AI-assisted commit messages and pull-request drafts.
//!
//! # Overview
//!
//! gitai resolves a layered configuration (repository, project directory,
//! global `~/.gitai`, built-in defaults), picks the LLM provider configured for
//! each command, fills in credentials and endpoints from the environment, and
//! turns model replies into commit suggestions or a PR draft.

pub mod commands;
pub mod config;
pub mod env;
pub mod error;
pub mod git;
pub mod llm;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, LoadedConfig, ResolvedLlmConfig, SearchContext, load_config};
pub use env::{Environment, MapEnv, ProcessEnv};
pub use error::{CommandError, ConfigError, GitError, LlmError};
pub use llm::{Completion, CommitSuggestion, LlmClient, PrDraft, resolve_llm_config};
