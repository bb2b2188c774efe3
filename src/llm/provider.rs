//! Provider wire formats.
//!
//! Each [`Provider`] variant knows how to turn a prompt into a request and how
//! to pull the reply text back out of the response body. Field names are the
//! providers' literal JSON keys.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::config::ResolvedLlmConfig;

/// Supported provider API shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// `/chat/completions` compatible APIs; the fallback for unknown names.
    OpenAiCompatible,
    Gemini,
    Ollama,
}

impl Provider {
    pub fn from_name(name: &str) -> Self {
        match name {
            "gemini" => Provider::Gemini,
            "ollama" => Provider::Ollama,
            _ => Provider::OpenAiCompatible,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAiCompatible => "openai-compatible",
            Provider::Gemini => "gemini",
            Provider::Ollama => "ollama",
        }
    }

    /// Build the HTTP request for `prompt`.
    pub fn build_request(
        &self,
        base_url: &str,
        prompt: &str,
        cfg: &ResolvedLlmConfig,
    ) -> ProviderRequest {
        let base_url = base_url.trim_end_matches('/');
        match self {
            Provider::Gemini => {
                let mut url = format!("{}/v1beta/models/{}:generateContent", base_url, cfg.model);
                if let Some(key) = &cfg.api_key {
                    url.push_str("?key=");
                    url.push_str(key);
                }
                ProviderRequest {
                    url,
                    bearer: None,
                    body: to_value(&GeminiRequest {
                        contents: vec![GeminiContent {
                            parts: vec![GeminiPart { text: prompt }],
                        }],
                        generation_config: GenerationConfig {
                            temperature: cfg.temperature,
                        },
                    }),
                }
            }
            Provider::Ollama => ProviderRequest {
                url: format!("{}/api/chat", base_url),
                bearer: cfg.api_key.clone(),
                body: to_value(&ChatRequest {
                    model: &cfg.model,
                    messages: vec![ChatMessage {
                        role: "user",
                        content: prompt,
                    }],
                    temperature: cfg.temperature,
                    stream: false,
                    response_format: None,
                }),
            },
            Provider::OpenAiCompatible => ProviderRequest {
                url: format!("{}/chat/completions", base_url),
                bearer: cfg.api_key.clone(),
                body: to_value(&ChatRequest {
                    model: &cfg.model,
                    messages: vec![ChatMessage {
                        role: "user",
                        content: prompt,
                    }],
                    temperature: cfg.temperature,
                    stream: false,
                    response_format: Some(ResponseFormat {
                        kind: "json_object",
                    }),
                }),
            },
        }
    }

    /// Pull the reply text out of a parsed response body.
    pub fn extract_reply(&self, body: &Value) -> Option<String> {
        let text = match self {
            Provider::Gemini => body.pointer("/candidates/0/content/parts/0/text"),
            Provider::Ollama => body.pointer("/message/content"),
            Provider::OpenAiCompatible => body.pointer("/choices/0/message/content"),
        };
        text.and_then(Value::as_str).map(str::to_string)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to be POSTed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub url: String,
    pub bearer: Option<String>,
    pub body: Value,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

fn to_value<T: Serialize>(body: &T) -> Value {
    // These request structs only hold strings, numbers and bools.
    serde_json::to_value(body).unwrap_or(Value::Null)
}
