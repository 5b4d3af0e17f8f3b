// Wire types for the Ollama-compatible HTTP API

use serde::{Deserialize, Serialize};

/// Body of `GET /api/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    pub models: Vec<ModelTag>,
}

/// One installed model. Other fields the server sends (size, digest, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelTag {
    pub name: String,
}

/// Body of `POST /api/generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub stream: bool,
    pub prompt: &'a str,
    /// Always empty: every call is independent of earlier turns
    pub context: Vec<i64>,
}

impl<'a> GenerateRequest<'a> {
    /// A single, non-streaming, context-free request
    pub fn new(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            stream: false,
            prompt,
            context: Vec::new(),
        }
    }
}

/// Successful reply from `POST /api/generate`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}
