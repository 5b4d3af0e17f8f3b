// List models, generate a response, clear a model's history

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::errors::ChatError;
use crate::logging::{ConversationLogger, HistoryError, LogEntry};
use crate::providers::InferenceBackend;

/// Arguments for one generate call
#[derive(Debug, Clone)]
pub struct GenerateParams {
    pub model: String,
    pub prompt: String,
}

impl GenerateParams {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// Result of a successful generate call
#[derive(Debug)]
pub struct Generation {
    pub response: String,
    /// Entry appended to the model's log, if the write succeeded
    pub entry: Option<LogEntry>,
    /// Why the exchange could not be logged. The response is still valid.
    pub log_error: Option<HistoryError>,
}

pub struct ChatService {
    backend: Arc<dyn InferenceBackend>,
    logger: ConversationLogger,
}

impl ChatService {
    pub fn new(backend: Arc<dyn InferenceBackend>, logger: ConversationLogger) -> Self {
        Self { backend, logger }
    }

    pub fn logger(&self) -> &ConversationLogger {
        &self.logger
    }

    /// Models available on the server, or why they could not be fetched
    pub async fn fetch_models(&self) -> Result<Vec<String>, ChatError> {
        self.backend.list_models().await
    }

    /// Models available on the server; empty when the server cannot be queried
    ///
    /// An empty list means "unavailable", not necessarily "nothing installed".
    /// Use [`ChatService::fetch_models`] to tell the two apart.
    pub async fn list_models(&self) -> Vec<String> {
        match self.fetch_models().await {
            Ok(models) => models,
            Err(e) => {
                error!("Listing models from {} failed: {}", self.backend.name(), e);
                Vec::new()
            }
        }
    }

    /// Generate a response and append the exchange to the model's log
    ///
    /// Blank prompts are rejected before the server is contacted. The prompt is
    /// sent and logged exactly as given.
    pub async fn generate(&self, params: &GenerateParams) -> Result<Generation, ChatError> {
        if params.prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        if params.model.trim().is_empty() {
            return Err(ChatError::MissingModel);
        }

        let response = self
            .backend
            .generate(&params.model, &params.prompt)
            .await
            .map_err(|e| {
                error!("Generation with {} failed: {}", params.model, e);
                e
            })?;

        let (entry, log_error) =
            match self
                .logger
                .record(&params.model, &params.prompt, &response)
            {
                Ok(entry) => (Some(entry), None),
                Err(e) => {
                    warn!("Response from {} was not logged: {}", params.model, e);
                    (None, Some(e))
                }
            };

        Ok(Generation {
            response,
            entry,
            log_error,
        })
    }

    /// Truncate the model's log. Irreversible.
    pub fn clear_history(&self, model: &str) -> Result<(), ChatError> {
        self.logger.clear(model)?;
        info!("Cleared conversation history for {}", model);
        Ok(())
    }

    /// Logged exchanges for the model, oldest first
    pub fn history(&self, model: &str) -> Result<Vec<LogEntry>, ChatError> {
        Ok(self.logger.entries(model)?)
    }
}
