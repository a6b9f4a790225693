//! Integration tests for completion providers against a mock HTTP server
//!
//! Verifies the request shapes, response parsing, and error mapping of
//! both provider implementations, plus the error-substitution contract of
//! the chat turn flow.

use serde_json::json;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use async_trait::async_trait;
use parley::commands::chat::submit_turn;
use parley::config::{OllamaConfig, OpenAiConfig};
use parley::providers::{ChatTurn, CompletionClient, OllamaClient, OpenAiClient};
use parley::response_parser::ResponseParser;
use parley::session::{MemoryBlobStore, SessionStore};

fn openai_config(server: &MockServer, key_env: &str) -> OpenAiConfig {
    OpenAiConfig {
        api_base: server.uri(),
        model: "test-model".to_string(),
        api_key_env: key_env.to_string(),
    }
}

#[tokio::test]
async fn test_openai_send_message_success() {
    let server = MockServer::start().await;
    std::env::set_var("PARLEY_TEST_KEY_SUCCESS", "sk-test");

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "stream": false,
            "messages": [{"role": "user", "content": "Hello!"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello back"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(openai_config(&server, "PARLEY_TEST_KEY_SUCCESS")).unwrap();
    let reply = client
        .send_message(&[ChatTurn::user("Hello!")])
        .await
        .unwrap();
    assert_eq!(reply, "Hello back");
}

#[tokio::test]
async fn test_openai_http_error_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(openai_config(&server, "PARLEY_TEST_KEY_UNSET")).unwrap();
    let err = client
        .send_message(&[ChatTurn::user("Hello!")])
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("500"), "unexpected error: {}", message);
    assert!(message.contains("boom"), "unexpected error: {}", message);
}

#[tokio::test]
async fn test_openai_malformed_body_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(openai_config(&server, "PARLEY_TEST_KEY_UNSET")).unwrap();
    let err = client
        .send_message(&[ChatTurn::user("Hello!")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("parse"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_openai_empty_choices_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(openai_config(&server, "PARLEY_TEST_KEY_UNSET")).unwrap();
    let err = client
        .send_message(&[ChatTurn::user("Hello!")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no message"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_ollama_send_message_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "test-llama",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "yo"},
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = OllamaConfig {
        host: server.uri(),
        model: "test-llama".to_string(),
    };
    let client = OllamaClient::new(config).unwrap();
    let reply = client
        .send_message(&[ChatTurn::user("hey")])
        .await
        .unwrap();
    assert_eq!(reply, "yo");
}

#[tokio::test]
async fn test_ollama_http_error_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .expect(1)
        .mount(&server)
        .await;

    let config = OllamaConfig {
        host: server.uri(),
        model: "missing".to_string(),
    };
    let client = OllamaClient::new(config).unwrap();
    let err = client
        .send_message(&[ChatTurn::user("hey")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("404"), "unexpected error: {}", err);
}

/// Client that always fails, for exercising the error-substitution path.
#[derive(Debug)]
struct BrokenClient;

#[async_trait]
impl CompletionClient for BrokenClient {
    async fn send_message(&self, _turns: &[ChatTurn]) -> parley::error::Result<String> {
        Err(parley::error::ParleyError::Provider("connection refused".to_string()).into())
    }

    fn name(&self) -> &str {
        "broken"
    }
}

#[tokio::test]
async fn test_failed_turn_records_error_as_assistant_message() {
    let mut store = SessionStore::open(MemoryBlobStore::new());
    let parser = ResponseParser::new().unwrap();

    submit_turn(&mut store, &BrokenClient, &parser, "Hello?").await;

    let messages = &store.selected_session().unwrap().messages;
    assert_eq!(messages.len(), 2);
    assert!(messages[0].is_user);
    assert_eq!(messages[0].content, "Hello?");
    assert!(!messages[1].is_user);
    assert!(
        messages[1].content.starts_with("Error:"),
        "unexpected assistant content: {}",
        messages[1].content
    );
    assert!(messages[1].content.contains("connection refused"));
}

#[tokio::test]
async fn test_successful_turn_appends_user_then_assistant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "42"}}]
        })))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(openai_config(&server, "PARLEY_TEST_KEY_UNSET")).unwrap();
    let mut store = SessionStore::open(MemoryBlobStore::new());
    let parser = ResponseParser::new().unwrap();

    submit_turn(&mut store, &client, &parser, "Meaning of life?").await;

    let messages = &store.selected_session().unwrap().messages;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, "42");
    assert!(!messages[1].is_user);
}
