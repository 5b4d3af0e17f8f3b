// Code Breakers - prompt a local Ollama model and keep a per-model history
// Library exports

pub mod chat;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod providers;
pub mod server;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::chat::ChatService;
use crate::config::Config;
use crate::logging::ConversationLogger;
use crate::providers::OllamaClient;

/// Wire the Ollama client and the history logger described by `config`
pub fn build_service(config: &Config) -> Result<Arc<ChatService>> {
    let client = OllamaClient::new(config.server_url.clone(), config.request_timeout())?;
    let logger = ConversationLogger::new(config.log_dir.clone())
        .context("Failed to prepare the history directory")?;

    tracing::debug!(
        "Using server {} with history in {}",
        client.base_url(),
        logger.log_dir().display()
    );

    Ok(Arc::new(ChatService::new(Arc::new(client), logger)))
}
