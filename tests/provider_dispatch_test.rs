//! Integration tests for provider dispatch against mocked HTTP endpoints.

use std::sync::Arc;

use gitai::config::defaults::default_config_value;
use gitai::config::{AppConfig, ProviderConfig, ResolvedLlmConfig, merge};
use gitai::env::MapEnv;
use gitai::llm::{
    Completion, LlmClient, check_preconditions, generate_commit_messages, generate_pr_draft,
};
use gitai::resolve_llm_config;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> LlmClient {
    LlmClient::new(Arc::new(MapEnv::new()))
}

fn resolved(provider: &str, key: Option<&str>, base_url: &str) -> ResolvedLlmConfig {
    ResolvedLlmConfig {
        provider: provider.to_string(),
        model: "test-model".to_string(),
        api_key: key.map(String::from),
        base_url: Some(base_url.to_string()),
        temperature: 0.2,
    }
}

#[tokio::test]
async fn test_openai_compatible_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [{"role": "user", "content": "hello"}],
            "stream": false,
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "hi there"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = resolved("deepseek", Some("sk-test"), &format!("{}/v1", server.uri()));
    assert_eq!(client().call("hello", &cfg).await.as_deref(), Some("hi there"));
}

#[tokio::test]
async fn test_gemini_dispatch_uses_query_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .and(query_param("key", "g-key"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "hello"}]}],
            "generationConfig": {"temperature": 0.2}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "from gemini"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = resolved("gemini", Some("g-key"), &server.uri());
    assert_eq!(client().call("hello", &cfg).await.as_deref(), Some("from gemini"));

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_ollama_dispatch_without_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"model": "test-model", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "from ollama"},
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = resolved("ollama", None, &server.uri());
    assert_eq!(client().call("hello", &cfg).await.as_deref(), Some("from ollama"));

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_non_success_status_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let cfg = resolved("openai", Some("bad"), &server.uri());
    assert_eq!(client().call("hello", &cfg).await, None);

    let err = client().try_call("hello", &cfg).await.unwrap_err();
    assert!(err.to_string().contains("401"));
    assert!(err.to_string().contains("invalid api key"));
}

#[tokio::test]
async fn test_wrong_response_shape_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"choices": [{"message": {"content": "x"}}]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    assert_eq!(client().call("p", &resolved("ollama", None, &server.uri())).await, None);
    assert_eq!(client().call("p", &resolved("openai", Some("k"), &server.uri())).await, None);
}

#[tokio::test]
async fn test_failed_precondition_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut cfg = resolved("openai", None, "https://api.example.invalid/v1");
    assert_eq!(client().call("hello", &cfg).await, None);

    cfg.base_url = None;
    cfg.api_key = Some("k".into());
    assert_eq!(client().call("hello", &cfg).await, None);
}

#[tokio::test]
async fn test_commit_suggestions_end_to_end() {
    let server = MockServer::start().await;
    let reply = "```json\n[{\"message\": \"feat: add login\"}, {\"message\": \"fix: handle [] input\"}, {\"message\": \"chore: tidy\"}]\n```";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": reply}}]
        })))
        .mount(&server)
        .await;

    let mut config = AppConfig::default();
    config.llm.commands.insert(
        "commit".into(),
        ProviderConfig {
            provider: Some("custom".into()),
            model: Some("m".into()),
            base_url: Some(server.uri()),
            api_key_env_var: Some("CUSTOM_LLM_KEY".into()),
            ..Default::default()
        },
    );
    let env = MapEnv::new().with("CUSTOM_LLM_KEY", "secret");

    let suggestions = generate_commit_messages(&client(), &config, &env, "commit", "prompt", 2)
        .await
        .expect("reply received");
    let messages: Vec<_> = suggestions.iter().map(|s| s.message.as_str()).collect();
    assert_eq!(messages, ["feat: add login", "fix: handle [] input"]);

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(
        requests[0].headers.get("authorization").and_then(|v| v.to_str().ok()),
        Some("Bearer secret")
    );
}

#[tokio::test]
async fn test_pr_draft_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"content": "Here you go: {\"title\": \"Add auth\", \"body\": \"Adds login flow.\"}"}
        })))
        .mount(&server)
        .await;

    let mut config = AppConfig::default();
    config.llm.default = ProviderConfig {
        provider: Some("ollama".into()),
        model: Some("llama3".into()),
        ollama_base_url: Some(server.uri()),
        ..Default::default()
    };

    let draft = generate_pr_draft(&client(), &config, &MapEnv::new(), "pr", "prompt")
        .await
        .expect("draft parsed");
    assert_eq!(draft.title, "Add auth");
    assert_eq!(draft.body, "Adds login flow.");
}

#[test]
fn test_ollama_scenario_from_config_file() {
    let file = serde_yaml::from_str(
        "llm:\n  default:\n    provider: ollama\n    model: llama3\n",
    )
    .unwrap();
    let config = merge(&default_config_value(), Some(&file)).unwrap();

    let resolved = resolve_llm_config(&config, Some("commit"), &MapEnv::new());
    assert_eq!(resolved.provider, "ollama");
    assert_eq!(resolved.model, "llama3");
    assert_eq!(resolved.base_url.as_deref(), Some("http://localhost:11434"));
    assert_eq!(resolved.api_key, None);
    assert!(check_preconditions(&resolved).is_ok());
}

#[test]
fn test_generic_key_scenario() {
    let file = serde_yaml::from_str("llm:\n  default:\n    provider: openai\n").unwrap();
    let config = merge(&default_config_value(), Some(&file)).unwrap();
    let env = MapEnv::new().with("GIT_AI_API_KEY", "x");

    let resolved = resolve_llm_config(&config, Some("commit"), &env);
    assert_eq!(resolved.api_key.as_deref(), Some("x"));
    assert!(check_preconditions(&resolved).is_ok());
}
