//! Built-in configuration values.

use serde_json::{Value, json};

/// Tool namespace used for directory and rc-file names.
pub const NAMESPACE: &str = "gitai";

/// Generic credential variable consulted after provider-specific ones.
pub const GENERIC_API_KEY_ENV_VAR: &str = "GIT_AI_API_KEY";

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_BASE_BRANCH: &str = "main";

pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const FALLBACK_COMMIT_PROMPT: &str = "Generate a commit message based on the diff.";
pub const FALLBACK_PR_PROMPT: &str = "Generate a PR description based on the changes.";

/// The configuration every discovered file is merged onto.
pub fn default_config_value() -> Value {
    json!({
        "llm": {
            "default": {
                "provider": DEFAULT_PROVIDER,
                "model": DEFAULT_MODEL,
                "temperature": DEFAULT_TEMPERATURE,
            },
            "commands": {},
        },
        "commit": {
            "suggestions": 3,
            "prompt_template": ".gitai/prompts/commit_prompt.txt",
        },
        "pr": {
            "base_branch": DEFAULT_BASE_BRANCH,
            "include_file_tree": true,
            "include_unstaged": false,
            "max_lines_per_file": 300,
            "warn_on_conflict": true,
            "prompt_template": ".gitai/prompts/pr_prompt.txt",
        },
    })
}

/// Files written by `gitai init --from-default`, relative to `.gitai/`.
pub const TEMPLATE_FILES: &[(&str, &str)] = &[
    ("config.yaml", include_str!("../../templates/default/config.yaml")),
    (
        "prompts/commit_prompt.txt",
        include_str!("../../templates/default/prompts/commit_prompt.txt"),
    ),
    (
        "prompts/pr_prompt.txt",
        include_str!("../../templates/default/prompts/pr_prompt.txt"),
    ),
];

/// Contents of the `.env-example` written next to `.gitai/`.
pub const ENV_EXAMPLE: &str = include_str!("../../templates/env-example");
