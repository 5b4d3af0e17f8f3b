// Integration tests for the one-shot CLI actions

use codebreakers::chat::{ChatService, GenerateParams};
use codebreakers::cli::actions::{self, EXIT_FAILURE, EXIT_INVALID_INPUT, EXIT_OK};
use codebreakers::logging::ConversationLogger;
use codebreakers::providers::OllamaClient;
use mockito::{Server, ServerGuard};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

fn service_for(server: &ServerGuard, log_dir: &TempDir) -> ChatService {
    let client = OllamaClient::new(server.url(), None).unwrap();
    let logger = ConversationLogger::new(log_dir.path()).unwrap();
    ChatService::new(Arc::new(client), logger)
}

fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

#[tokio::test]
async fn test_models_prints_one_per_line() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body(json!({"models": [{"name": "llama2"}, {"name": "mistral"}]}).to_string())
        .create_async()
        .await;
    let log_dir = TempDir::new().unwrap();
    let service = service_for(&server, &log_dir);

    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
    let code = actions::list_models(&service, &mut out, &mut err)
        .await
        .unwrap();

    assert_eq!(code, EXIT_OK);
    assert_eq!(text(out), "llama2\nmistral\n");
    assert!(err.is_empty());
}

#[tokio::test]
async fn test_models_failure_reports_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/tags")
        .with_status(502)
        .create_async()
        .await;
    let log_dir = TempDir::new().unwrap();
    let service = service_for(&server, &log_dir);

    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
    let code = actions::list_models(&service, &mut out, &mut err)
        .await
        .unwrap();

    assert_eq!(code, EXIT_FAILURE);
    assert!(out.is_empty());
    let err = text(err);
    assert!(err.contains("Error fetching models."));
    assert!(err.contains("No models available."));
}

#[tokio::test]
async fn test_generate_prints_response() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(json!({"response": "Hi there"}).to_string())
        .create_async()
        .await;
    let log_dir = TempDir::new().unwrap();
    let service = service_for(&server, &log_dir);

    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
    let code = actions::generate(
        &service,
        &GenerateParams::new("mistral", "Hello"),
        &mut out,
        &mut err,
    )
    .await
    .unwrap();

    assert_eq!(code, EXIT_OK);
    assert_eq!(text(out), "Hi there\n");
    assert_eq!(service.history("mistral").unwrap().len(), 1);
}

#[tokio::test]
async fn test_generate_blank_prompt_warns() {
    let server = Server::new_async().await;
    let log_dir = TempDir::new().unwrap();
    let service = service_for(&server, &log_dir);

    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
    let code = actions::generate(
        &service,
        &GenerateParams::new("mistral", " \t\n"),
        &mut out,
        &mut err,
    )
    .await
    .unwrap();

    assert_eq!(code, EXIT_INVALID_INPUT);
    assert!(out.is_empty());
    assert!(text(err).contains("Please enter a prompt before generating a response."));
}

#[tokio::test]
async fn test_generate_server_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(400)
        .with_body("bad request")
        .create_async()
        .await;
    let log_dir = TempDir::new().unwrap();
    let service = service_for(&server, &log_dir);

    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
    let code = actions::generate(
        &service,
        &GenerateParams::new("mistral", "Hello"),
        &mut out,
        &mut err,
    )
    .await
    .unwrap();

    assert_eq!(code, EXIT_FAILURE);
    assert!(out.is_empty());
    assert!(text(err).contains("Error: 400, bad request"));
}

#[tokio::test]
async fn test_clear_declined_keeps_history() {
    let server = Server::new_async().await;
    let log_dir = TempDir::new().unwrap();
    let service = service_for(&server, &log_dir);
    service.logger().record("mistral", "Hello", "Hi").unwrap();

    let mut input = Cursor::new(b"n\n".to_vec());
    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
    let code =
        actions::clear_history(&service, "mistral", false, &mut input, &mut out, &mut err)
            .unwrap();

    assert_eq!(code, EXIT_INVALID_INPUT);
    assert!(text(out).contains("Clear conversation history for 'mistral'? [y/N]"));
    assert_eq!(service.history("mistral").unwrap().len(), 1);
}

#[tokio::test]
async fn test_clear_confirmed() {
    let server = Server::new_async().await;
    let log_dir = TempDir::new().unwrap();
    let service = service_for(&server, &log_dir);
    service.logger().record("mistral", "Hello", "Hi").unwrap();

    let mut input = Cursor::new(b"y\n".to_vec());
    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
    let code =
        actions::clear_history(&service, "mistral", false, &mut input, &mut out, &mut err)
            .unwrap();

    assert_eq!(code, EXIT_OK);
    assert!(text(out).contains("Conversation history cleared."));
    assert!(service.history("mistral").unwrap().is_empty());
}

#[tokio::test]
async fn test_history_listing() {
    let server = Server::new_async().await;
    let log_dir = TempDir::new().unwrap();
    let service = service_for(&server, &log_dir);

    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
    actions::show_history(&service, "mistral", &mut out, &mut err).unwrap();
    assert_eq!(text(out), "No history for mistral.\n");

    let entry = service.logger().record("mistral", "Hello", "Hi").unwrap();
    let (mut out, mut err): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
    let code = actions::show_history(&service, "mistral", &mut out, &mut err).unwrap();

    assert_eq!(code, EXIT_OK);
    assert_eq!(
        text(out),
        format!("[{}] Hello => Hi\n", entry.formatted_timestamp())
    );
}
