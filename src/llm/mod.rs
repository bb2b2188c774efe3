//! LLM provider resolution, dispatch and reply parsing.

pub mod client;
pub mod json;
pub mod prompt;
pub mod provider;
pub mod resolve;

use tracing::debug;

use crate::config::AppConfig;
use crate::env::Environment;

pub use client::{Completion, LlmClient, check_preconditions, is_loopback_url, proxy_from_env};
pub use json::{CommitSuggestion, PrDraft, extract_commit_messages, extract_pr_draft};
pub use prompt::{PrPromptInput, build_commit_prompt, build_pr_prompt};
pub use provider::{Provider, ProviderRequest};
pub use resolve::{resolve_llm_config, select_provider_config};

/// Ask the model for commit suggestions.
///
/// `None` means no reply was obtained; an empty list means the reply was
/// unusable.
pub async fn generate_commit_messages(
    llm: &dyn Completion,
    config: &AppConfig,
    env: &dyn Environment,
    command: &str,
    prompt: &str,
    k: usize,
) -> Option<Vec<CommitSuggestion>> {
    let resolved = resolve_llm_config(config, Some(command), env);
    debug!("Resolved LLM config: {}", serde_json::to_string(&resolved).unwrap_or_default());

    let reply = llm.call(prompt, &resolved).await?;
    debug!("LLM raw response: {}", reply);
    Some(extract_commit_messages(&reply, k))
}

/// Ask the model for a PR title and body.
pub async fn generate_pr_draft(
    llm: &dyn Completion,
    config: &AppConfig,
    env: &dyn Environment,
    command: &str,
    prompt: &str,
) -> Option<PrDraft> {
    let resolved = resolve_llm_config(config, Some(command), env);
    debug!("Resolved LLM config: {}", serde_json::to_string(&resolved).unwrap_or_default());

    let reply = llm.call(prompt, &resolved).await?;
    extract_pr_draft(&reply)
}
