use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use tidbit_bot::core::requester::ContentRequester;
use tidbit_bot::core::TextGenerator;
use tidbit_bot::{GeminiClient, GenerationError};

const MODEL: &str = "gemini-2.0-flash";

fn client(server: &MockServer, timeout: Duration) -> GeminiClient {
    GeminiClient::new(&server.base_url(), "test-key", MODEL, timeout).unwrap()
}

#[tokio::test]
async fn test_generate_joins_parts() {
    let server = MockServer::start();
    let gen_mock = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL))
            .header("x-goog-api-key", "test-key")
            .json_body(json!({"contents": [{"parts": [{"text": "Say hi"}]}]}));
        then.status(200).json_body(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hi"}, {"text": "there!"}]},
                "finishReason": "STOP"
            }]
        }));
    });

    let text = client(&server, Duration::from_secs(5))
        .generate("Say hi")
        .await
        .unwrap();

    gen_mock.assert();
    assert_eq!(text, "Hi there!");
}

#[tokio::test]
async fn test_empty_candidates_is_empty_generation() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL));
        then.status(200).json_body(json!({"candidates": []}));
    });

    let result = client(&server, Duration::from_secs(5)).generate("x").await;
    assert_eq!(result, Err(GenerationError::Empty));
}

#[tokio::test]
async fn test_http_error_carries_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL));
        then.status(429)
            .json_body(json!({"error": {"code": 429, "message": "Resource has been exhausted"}}));
    });

    match client(&server, Duration::from_secs(5)).generate("x").await {
        Err(GenerationError::Failed(msg)) => {
            assert!(msg.contains("429"));
            assert!(msg.contains("exhausted"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_response_is_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL));
        then.status(200).body("not json");
    });

    let result = client(&server, Duration::from_secs(5)).generate("x").await;
    assert!(matches!(result, Err(GenerationError::Failed(_))));
}

#[tokio::test]
async fn test_slow_generation_times_out_in_requester() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v1beta/models/{}:generateContent", MODEL));
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(json!({"candidates": [{"content": {"parts": [{"text": "late"}]}}]}));
    });

    let requester = ContentRequester::new(
        client(&server, Duration::from_secs(30)),
        Duration::from_millis(200),
    );

    match requester.request("x").await {
        Err(GenerationError::Failed(msg)) => assert!(msg.contains("timed out")),
        other => panic!("expected timeout, got {:?}", other),
    }
}
