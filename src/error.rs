//! Error types for gitai modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from configuration discovery and merging.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No git repository found. Please run this command from a git repository.")]
    NoRepository,

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(#[source] serde_json::Error),
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    Open(#[source] git2::Error),

    #[error("Target branch '{0}' does not exist")]
    BranchNotFound(String),

    #[error("Failed to find merge base with '{0}': {1}")]
    MergeBase(String, #[source] git2::Error),

    #[error("Failed to collect diff: {0}")]
    Diff(#[source] git2::Error),

    #[error("Failed to read repository state: {0}")]
    Read(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    Commit(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    Signature(#[source] git2::Error),
}

/// Errors from a single provider exchange.
///
/// These never escape [`crate::llm::LlmClient::call`]; they are logged there and
/// the call reports absence instead.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Base URL for LLM provider \"{0}\" is not configured.")]
    MissingBaseUrl(String),

    #[error("API Key for LLM provider \"{0}\" is not configured.")]
    MissingApiKey(String),

    #[error("Invalid proxy URL '{url}': {source}")]
    Proxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    #[error("LLM API request to {provider} failed with status {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("LLM response from {provider} did not contain expected data structure: {body}")]
    UnexpectedShape { provider: String, body: String },
}

/// Errors surfaced by command handlers.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render configuration as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Prompt could not be rendered in the current environment: {0}")]
    Interaction(String),
}
