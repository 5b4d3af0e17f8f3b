// HTTP handlers for the web front-end

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::chat::{ChatService, GenerateParams};
use crate::errors::{ChatError, ErrorKind, MODEL_LIST_ERROR};
use crate::logging::LogEntry;

pub type AppState = Arc<ChatService>;

const INDEX_HTML: &str = include_str!("index.html");

const CONFIRM_CLEAR_WARNING: &str = "Tick \"Confirm Clear History\" to clear the history.";

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateReply {
    pub response: String,
    /// Set when the exchange could not be written to the history file
    pub log_warning: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearBody {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<LogEntry>,
}

/// Maps a [`ChatError`] onto a status code and a `warning`/`error` JSON body
pub struct ApiError(ChatError);

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        match self.0.kind() {
            ErrorKind::Validation => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "warning": message })),
            )
                .into_response(),
            ErrorKind::Connectivity => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": message }))).into_response()
            }
            ErrorKind::Resource => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
        }
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Always 200; a failed lookup yields an empty list plus an error message
pub async fn handle_list_models(State(service): State<AppState>) -> Json<ModelsResponse> {
    match service.fetch_models().await {
        Ok(models) => Json(ModelsResponse {
            models,
            error: None,
        }),
        Err(e) => {
            tracing::error!("Listing models failed: {}", e);
            Json(ModelsResponse {
                models: Vec::new(),
                error: Some(MODEL_LIST_ERROR.to_string()),
            })
        }
    }
}

pub async fn handle_generate(
    State(service): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateReply>, ApiError> {
    let params = GenerateParams::new(body.model, body.prompt);
    let generation = service.generate(&params).await?;

    Ok(Json(GenerateReply {
        response: generation.response,
        log_warning: generation
            .log_error
            .map(|e| format!("Response was not saved to history: {}", e)),
    }))
}

pub async fn handle_history(
    State(service): State<AppState>,
    Path(model): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let entries = service.history(&model)?;
    Ok(Json(HistoryResponse { entries }))
}

pub async fn handle_clear_history(
    State(service): State<AppState>,
    Path(model): Path<String>,
    body: Option<Json<ClearBody>>,
) -> Result<Response, ApiError> {
    let confirmed = body.map(|Json(body)| body.confirm).unwrap_or(false);
    if !confirmed {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "warning": CONFIRM_CLEAR_WARNING })),
        )
            .into_response());
    }

    service.clear_history(&model)?;
    Ok(Json(json!({ "cleared": true })).into_response())
}
