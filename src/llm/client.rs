//! HTTP dispatch to LLM providers.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy, Url};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::ResolvedLlmConfig;
use crate::env::Environment;
use crate::error::LlmError;

use super::provider::Provider;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable to override the default timeout.
pub const TIMEOUT_ENV_VAR: &str = "GITAI_HTTP_TIMEOUT";

/// Proxy variables in preference order.
const PROXY_ENV_VARS: &[&str] = &[
    "HTTPS_PROXY",
    "https_proxy",
    "HTTP_PROXY",
    "http_proxy",
    "ALL_PROXY",
    "all_proxy",
];

/// "Prompt in, reply text out" seam used by the command layer.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Returns `None` when no reply could be obtained; the reason is logged.
    async fn call(&self, prompt: &str, cfg: &ResolvedLlmConfig) -> Option<String>;
}

/// Provider client backed by `reqwest`.
pub struct LlmClient {
    env: Arc<dyn Environment>,
}

impl LlmClient {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self { env }
    }

    /// Run one exchange, keeping the failure reason.
    pub async fn try_call(&self, prompt: &str, cfg: &ResolvedLlmConfig) -> Result<String, LlmError> {
        let base_url = check_preconditions(cfg)?;
        let provider = Provider::from_name(&cfg.provider);
        let request = provider.build_request(base_url, prompt, cfg);

        let http = build_http_client(self.env.as_ref())?;
        debug!(
            "Sending request to {} ({}) with model {}...",
            cfg.provider, provider, cfg.model
        );

        let mut builder = http.post(&request.url).json(&request.body);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(client_error)?;
        let status = response.status();
        let text = response.text().await.map_err(client_error)?;

        if !status.is_success() {
            return Err(LlmError::Status {
                provider: cfg.provider.clone(),
                status: status.as_u16(),
                body: text,
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|_| LlmError::UnexpectedShape {
            provider: cfg.provider.clone(),
            body: text.clone(),
        })?;
        debug!("Response data: {}", body);

        provider
            .extract_reply(&body)
            .ok_or_else(|| LlmError::UnexpectedShape {
                provider: cfg.provider.clone(),
                body: text,
            })
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn call(&self, prompt: &str, cfg: &ResolvedLlmConfig) -> Option<String> {
        match self.try_call(prompt, cfg).await {
            Ok(text) => Some(text),
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }
}

/// Check the base URL and API key before any network I/O.
///
/// Returns the base URL to use.
pub fn check_preconditions(cfg: &ResolvedLlmConfig) -> Result<&str, LlmError> {
    let base_url = cfg
        .base_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| LlmError::MissingBaseUrl(cfg.provider.clone()))?;

    let key_optional = cfg.provider == "ollama" || is_loopback_url(base_url);
    if cfg.api_key.is_none() && !key_optional {
        return Err(LlmError::MissingApiKey(cfg.provider.clone()));
    }

    Ok(base_url)
}

/// Whether `url` points at localhost or a loopback address.
pub fn is_loopback_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    match parsed.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}

/// First proxy URL set in the environment, HTTPS before HTTP before ALL.
pub fn proxy_from_env(env: &dyn Environment) -> Option<String> {
    PROXY_ENV_VARS.iter().find_map(|name| env.non_empty(name))
}

/// Request timeout from [`TIMEOUT_ENV_VAR`], or the default.
pub fn timeout_from_env(env: &dyn Environment) -> Duration {
    match env.get(TIMEOUT_ENV_VAR) {
        Some(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

fn build_http_client(env: &dyn Environment) -> Result<Client, LlmError> {
    let mut builder = Client::builder().no_proxy().timeout(timeout_from_env(env));

    if let Some(url) = proxy_from_env(env) {
        debug!("Using proxy {}", url);
        let proxy = Proxy::all(&url).map_err(|source| LlmError::Proxy {
            url: url.clone(),
            source,
        })?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(client_error)
}

/// Request URLs can carry the API key as a query parameter.
fn client_error(e: reqwest::Error) -> LlmError {
    LlmError::Client(e.without_url())
}
