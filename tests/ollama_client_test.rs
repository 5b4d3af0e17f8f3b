// Integration tests for the Ollama HTTP client against a mock server

use codebreakers::errors::ChatError;
use codebreakers::providers::{InferenceBackend, OllamaClient};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_list_models() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "models": [
                    {"name": "llama2", "size": 3826793677u64},
                    {"name": "mistral", "digest": "61e88e884507"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OllamaClient::new(server.url(), None).unwrap();
    let models = client.list_models().await.unwrap();

    assert_eq!(models, vec!["llama2", "mistral"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_models_non_200() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/tags")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let client = OllamaClient::new(server.url(), None).unwrap();
    let err = client.list_models().await.unwrap_err();

    assert!(
        matches!(err, ChatError::Server { status: 500, ref body } if body == "internal error"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_list_models_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body("{\"not_models\": []}")
        .create_async()
        .await;

    let client = OllamaClient::new(server.url(), None).unwrap();
    let err = client.list_models().await.unwrap_err();

    assert!(matches!(err, ChatError::MalformedResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_generate_sends_stateless_non_streaming_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "model": "mistral",
            "stream": false,
            "prompt": "Hello",
            "context": []
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"model": "mistral", "response": "Hi there", "done": true}).to_string())
        .create_async()
        .await;

    let client = OllamaClient::new(server.url(), None).unwrap();
    let response = client.generate("mistral", "Hello").await.unwrap();

    assert_eq!(response, "Hi there");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_non_200_keeps_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(404)
        .with_body("{\"error\":\"model 'nope' not found\"}")
        .create_async()
        .await;

    let client = OllamaClient::new(server.url(), None).unwrap();
    let err = client.generate("nope", "Hello").await.unwrap_err();

    assert_eq!(err.to_string(), "Error: 404, {\"error\":\"model 'nope' not found\"}");
}

#[tokio::test]
async fn test_generate_missing_response_field() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(json!({"model": "mistral", "done": true}).to_string())
        .create_async()
        .await;

    let client = OllamaClient::new(server.url(), None).unwrap();
    let err = client.generate("mistral", "Hello").await.unwrap_err();

    assert!(matches!(err, ChatError::MalformedResponse(_)), "got {err:?}");
}
