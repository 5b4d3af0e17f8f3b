// HTTP client for an Ollama-compatible inference server

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

use super::types::{GenerateRequest, GenerateResponse, TagsResponse};
use super::InferenceBackend;
use crate::errors::ChatError;

const TAGS_PATH: &str = "/api/tags";
const GENERATE_PATH: &str = "/api/generate";

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    /// Create a client for the server at `base_url` (e.g. "http://localhost:11434")
    ///
    /// With `timeout` unset the HTTP client's own default applies.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn unreachable(&self, url: String, source: reqwest::Error) -> ChatError {
        tracing::debug!("Request to {} failed: {}", url, source);
        ChatError::Unreachable { url, source }
    }

    /// Turn a non-200 reply into `ChatError::Server`, keeping the body for display
    async fn check_status(response: Response) -> Result<Response, ChatError> {
        let status = response.status();
        if status.as_u16() == 200 {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ChatError::Server {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn list_models(&self) -> Result<Vec<String>, ChatError> {
        let url = self.url(TAGS_PATH);
        tracing::debug!("Listing models from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unreachable(url.clone(), e))?;

        let response = Self::check_status(response).await?;

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| ChatError::MalformedResponse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|model| model.name).collect())
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ChatError> {
        let url = self.url(GENERATE_PATH);
        let request = GenerateRequest::new(model, prompt);
        tracing::debug!("Sending generate request for {} to {}", model, url);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.unreachable(url.clone(), e))?;

        let response = Self::check_status(response).await?;

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ChatError::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            "Received {} bytes from {}",
            generated.response.len(),
            model
        );

        Ok(generated.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OllamaClient::new("http://localhost:11434/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.url(TAGS_PATH), "http://localhost:11434/api/tags");
    }

    #[test]
    fn test_client_with_timeout() {
        let client = OllamaClient::new("http://127.0.0.1:11434", Some(Duration::from_secs(5)));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Port 9 (discard) is not expected to run an HTTP server
        let client =
            OllamaClient::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();

        let err = client.list_models().await.unwrap_err();
        assert!(matches!(err, ChatError::Unreachable { .. }), "got {err:?}");
    }
}
