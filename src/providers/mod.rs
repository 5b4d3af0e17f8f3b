// Inference server access
//
// The application talks to the model server only through `InferenceBackend`,
// so the chat layer can be exercised without a live server.

use async_trait::async_trait;

use crate::errors::ChatError;

pub mod ollama;
pub mod types;

pub use ollama::OllamaClient;
pub use types::{GenerateRequest, GenerateResponse, ModelTag, TagsResponse};

/// A locally hosted model server
///
/// Every call is a single request/response round trip. No retries, no streaming.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Names of the models the server can run
    async fn list_models(&self) -> Result<Vec<String>, ChatError>;

    /// Generate a completion for `prompt` with `model`, with no prior context
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ChatError>;

    /// Short label for log lines (e.g. "ollama")
    fn name(&self) -> &str;
}
