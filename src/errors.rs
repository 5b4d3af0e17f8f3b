// Error taxonomy for user-triggered actions
//
// Every variant is terminal for the action that raised it and nothing here is
// fatal to the process.

use thiserror::Error;

use crate::logging::HistoryError;

/// Message shown for a blank prompt
pub const EMPTY_PROMPT_WARNING: &str = "Please enter a prompt before generating a response.";

/// Message shown when the model list cannot be fetched
pub const MODEL_LIST_ERROR: &str = "Error fetching models.";

/// Message shown when the model list is empty
pub const NO_MODELS_WARNING: &str = "No models available.";

/// Broad category of a [`ChatError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Server unreachable, non-200 status, or an unreadable reply
    Connectivity,
    /// Input rejected before any network call
    Validation,
    /// Log file could not be written, read, or truncated
    Resource,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{}", EMPTY_PROMPT_WARNING)]
    EmptyPrompt,

    #[error("Please select a model first.")]
    MissingModel,

    #[error("Could not reach the inference server at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error: {status}, {body}")]
    Server { status: u16, body: String },

    #[error("Unexpected reply from the inference server: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    History(#[from] HistoryError),
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::EmptyPrompt | ChatError::MissingModel => ErrorKind::Validation,
            ChatError::Unreachable { .. }
            | ChatError::Server { .. }
            | ChatError::MalformedResponse(_) => ErrorKind::Connectivity,
            ChatError::History(_) => ErrorKind::Resource,
        }
    }

    /// Validation problems are shown as warnings rather than errors
    pub fn is_warning(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}
