//! Configuration data model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// LLM-backed commands that may carry their own provider override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitaiCommand {
    Commit,
    Pr,
}

impl GitaiCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            GitaiCommand::Commit => "commit",
            GitaiCommand::Pr => "pr",
        }
    }
}

impl fmt::Display for GitaiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One provider entry, either `llm.default` or `llm.commands.<name>`.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Literal key; prefer `api_key_env_var`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env_var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url_env_var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &redacted(&self.api_key))
            .field("api_key_env_var", &self.api_key_env_var)
            .field("base_url", &self.base_url)
            .field("base_url_env_var", &self.base_url_env_var)
            .field("ollama_base_url", &self.ollama_base_url)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Stand-in for a secret in debug output.
fn redacted(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "<redacted>")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub default: ProviderConfig,
    #[serde(default)]
    pub commands: BTreeMap<String, ProviderConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitConfig {
    #[serde(default)]
    pub suggestions: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
    /// Filled in by the template loader after merging.
    #[serde(
        default,
        rename = "systemPrompt",
        skip_serializing_if = "Option::is_none"
    )]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_file_tree: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_unstaged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lines_per_file: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_on_conflict: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
    #[serde(
        default,
        rename = "systemPrompt",
        skip_serializing_if = "Option::is_none"
    )]
    pub system_prompt: Option<String>,
}

/// The resolved configuration for one process run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub commit: CommitConfig,
    #[serde(default)]
    pub pr: PrConfig,
}

impl AppConfig {
    /// Commit system prompt. Empty only before the template loader has run.
    pub fn commit_system_prompt(&self) -> &str {
        self.commit.system_prompt.as_deref().unwrap_or_default()
    }

    pub fn pr_system_prompt(&self) -> &str {
        self.pr.system_prompt.as_deref().unwrap_or_default()
    }
}

/// Provider settings after environment fallbacks, used for exactly one call.
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLlmConfig {
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f64,
}

impl fmt::Debug for ResolvedLlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedLlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .finish()
    }
}
