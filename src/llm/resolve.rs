//! Per-command provider, credential and endpoint resolution.

use tracing::debug;

use crate::config::defaults::{
    DEFAULT_MODEL, DEFAULT_PROVIDER, DEFAULT_TEMPERATURE, GEMINI_DEFAULT_BASE_URL,
    GENERIC_API_KEY_ENV_VAR, OLLAMA_DEFAULT_BASE_URL, OPENAI_DEFAULT_BASE_URL,
};
use crate::config::{AppConfig, ProviderConfig, ResolvedLlmConfig};
use crate::env::Environment;

/// Resolve the provider settings for `command`.
///
/// Reads `env` at call time; call again after the environment changes.
pub fn resolve_llm_config(
    config: &AppConfig,
    command: Option<&str>,
    env: &dyn Environment,
) -> ResolvedLlmConfig {
    let base = select_provider_config(config, command);
    debug!("Provider config for command {:?}: {:?}", command, base);

    let provider = non_empty(&base.provider).unwrap_or(DEFAULT_PROVIDER).to_string();
    let model = non_empty(&base.model).unwrap_or(DEFAULT_MODEL).to_string();
    let temperature = base.temperature.unwrap_or(DEFAULT_TEMPERATURE);

    let api_key = resolve_api_key(base, &provider, env);
    let base_url = resolve_base_url(base, &provider, env);

    ResolvedLlmConfig {
        provider,
        model,
        api_key,
        base_url,
        temperature,
    }
}

/// `llm.commands[command]` when present, else `llm.default`.
pub fn select_provider_config<'a>(
    config: &'a AppConfig,
    command: Option<&str>,
) -> &'a ProviderConfig {
    command
        .and_then(|name| config.llm.commands.get(name))
        .unwrap_or(&config.llm.default)
}

/// Env var a provider's key is guessed from, e.g. `OPENAI_API_KEY`.
pub fn guessed_api_key_var(provider: &str) -> String {
    format!("{}_API_KEY", provider.to_uppercase())
}

fn resolve_api_key(base: &ProviderConfig, provider: &str, env: &dyn Environment) -> Option<String> {
    if let Some(key) = non_empty(&base.api_key) {
        return Some(key.to_string());
    }

    if let Some(var) = non_empty(&base.api_key_env_var)
        && let Some(key) = env.non_empty(var)
    {
        debug!("Using API key from {}", var);
        return Some(key);
    }

    if provider == "ollama" {
        return None;
    }

    let guessed = guessed_api_key_var(provider);
    if let Some(key) = env.non_empty(&guessed) {
        debug!("Using API key from guessed variable {}", guessed);
        return Some(key);
    }

    env.non_empty(GENERIC_API_KEY_ENV_VAR)
}

fn resolve_base_url(base: &ProviderConfig, provider: &str, env: &dyn Environment) -> Option<String> {
    if let Some(url) = non_empty(&base.base_url) {
        return Some(url.to_string());
    }

    if let Some(var) = non_empty(&base.base_url_env_var)
        && let Some(url) = env.non_empty(var)
    {
        debug!("Using base URL from {}", var);
        return Some(url);
    }

    match provider {
        "ollama" => Some(
            non_empty(&base.ollama_base_url)
                .unwrap_or(OLLAMA_DEFAULT_BASE_URL)
                .to_string(),
        ),
        "openai" => Some(OPENAI_DEFAULT_BASE_URL.to_string()),
        "gemini" => Some(GEMINI_DEFAULT_BASE_URL.to_string()),
        _ => None,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
