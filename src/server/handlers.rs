//! HTTP handlers.
//!
//! Thin plumbing over the core: resolve the adapter, run the operation,
//! normalize the outcome. Tool-level failures come back as structured
//! envelopes with HTTP 200; only request-level precondition violations
//! (unknown assistant, unsupported operation) map to error status codes.

use super::models::{
    AssistantsResponse, ChatRequest, CommitRequest, ErrorResponse, ExplainRequest, HealthResponse,
    ModifyRequest,
};
use crate::adapters::{AssistantAdapter, Operation, OperationError, OperationOptions};
use crate::config::GatewayConfig;
use crate::registry::{AssistantRegistry, RegistryError};
use crate::response::ResponseEnvelope;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

/// Shared application state: read-only after startup
pub struct AppState {
    pub registry: AssistantRegistry,
    pub config: GatewayConfig,
    pub started_at: Instant,
}

impl AppState {
    fn adapter_for(
        &self,
        requested: Option<&str>,
    ) -> Result<&Arc<dyn AssistantAdapter>, ApiError> {
        match requested {
            Some(identifier) => Ok(self.registry.resolve(identifier)?),
            None => Ok(self.registry.default_adapter()?),
        }
    }
}

/// Request-level failures surfaced as HTTP error responses
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
        };
        error!("Request failed: {}", message);
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AssistantNotFound { .. } => ApiError::NotFound(err.to_string()),
            RegistryError::NoDefaultConfigured => ApiError::Unavailable(err.to_string()),
        }
    }
}

impl From<OperationError> for ApiError {
    fn from(err: OperationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let available_assistants = state
        .registry
        .statuses()
        .await
        .into_iter()
        .filter(|status| status.available)
        .map(|status| status.identifier)
        .collect();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        available_assistants,
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// `GET /assistants`
pub async fn list_assistants(State(state): State<Arc<AppState>>) -> Json<AssistantsResponse> {
    Json(AssistantsResponse {
        assistants: state.registry.statuses().await,
    })
}

/// `POST /chat`
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let adapter = state.adapter_for(request.assistant.as_deref())?;
    let assistant = adapter.descriptor().identifier.clone();
    let request_id = Uuid::new_v4();
    info!(%request_id, assistant = %assistant, "chat request");

    let options = OperationOptions {
        model: request.model,
        workspace: request.workspace,
    };
    let outcome = adapter
        .chat(&request.message, request.context.as_deref(), &options)
        .await?;

    Ok(Json(ResponseEnvelope::from_outcome(
        request_id,
        &assistant,
        Operation::Chat,
        outcome,
    )))
}

/// `POST /code/explain`
pub async fn explain_code(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let adapter = state.adapter_for(request.assistant.as_deref())?;
    let assistant = adapter.descriptor().identifier.clone();
    let request_id = Uuid::new_v4();
    info!(%request_id, assistant = %assistant, "code explanation request");

    let options = OperationOptions {
        model: request.model,
        workspace: request.workspace,
    };
    let outcome = adapter
        .explain_code(&request.code, request.language.as_deref(), &options)
        .await?;

    Ok(Json(ResponseEnvelope::from_outcome(
        request_id,
        &assistant,
        Operation::ExplainCode,
        outcome,
    )))
}

/// `POST /code/modify`
pub async fn modify_code(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModifyRequest>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let adapter = state.adapter_for(request.assistant.as_deref())?;
    let assistant = adapter.descriptor().identifier.clone();
    let request_id = Uuid::new_v4();
    info!(%request_id, assistant = %assistant, "code modification request");

    let options = OperationOptions {
        model: request.model,
        workspace: request.workspace,
    };
    let outcome = adapter
        .modify_code(
            &request.code,
            &request.instruction,
            request.language.as_deref(),
            &options,
        )
        .await?;

    Ok(Json(ResponseEnvelope::from_outcome(
        request_id,
        &assistant,
        Operation::ModifyCode,
        outcome,
    )))
}

/// `POST /git/commit`
pub async fn generate_commit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CommitRequest>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let adapter = state.adapter_for(request.assistant.as_deref())?;
    let assistant = adapter.descriptor().identifier.clone();
    let request_id = Uuid::new_v4();
    info!(%request_id, assistant = %assistant, "commit message request");

    let options = OperationOptions {
        model: request.model,
        workspace: request.workspace,
    };
    let outcome = adapter
        .generate_commit_message(request.diff.as_deref(), &request.files, &options)
        .await?;

    Ok(Json(ResponseEnvelope::from_outcome(
        request_id,
        &assistant,
        Operation::GenerateCommitMessage,
        outcome,
    )))
}
