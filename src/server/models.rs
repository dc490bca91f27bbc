//! Request and response bodies for the REST surface.
//!
//! Operation endpoints all answer with the [`ResponseEnvelope`]; the types
//! here cover the inbound payloads and the two informational endpoints.
//!
//! [`ResponseEnvelope`]: crate::response::ResponseEnvelope

use crate::registry::AssistantStatus;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Body for `POST /chat`
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The message to send to the assistant
    pub message: String,
    /// Optional context from previous conversation
    pub context: Option<String>,
    /// Assistant identifier; the registry default when omitted
    pub assistant: Option<String>,
    /// Model to request from the underlying tool
    pub model: Option<String>,
    /// Working directory override for the invocation
    pub workspace: Option<PathBuf>,
}

/// Body for `POST /code/explain`
#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    /// The code to explain
    pub code: String,
    /// Programming language hint
    pub language: Option<String>,
    pub assistant: Option<String>,
    pub model: Option<String>,
    pub workspace: Option<PathBuf>,
}

/// Body for `POST /code/modify`
#[derive(Debug, Deserialize)]
pub struct ModifyRequest {
    /// The code to modify
    pub code: String,
    /// Instructions for the modification
    pub instruction: String,
    /// Programming language hint
    pub language: Option<String>,
    pub assistant: Option<String>,
    pub model: Option<String>,
    pub workspace: Option<PathBuf>,
}

/// Body for `POST /git/commit`
#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    /// Diff to describe; when omitted the staged changes of the workspace
    /// are used
    pub diff: Option<String>,
    /// Restrict the staged diff to these paths
    #[serde(default)]
    pub files: Vec<String>,
    pub assistant: Option<String>,
    pub model: Option<String>,
    pub workspace: Option<PathBuf>,
}

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub available_assistants: Vec<String>,
    pub uptime_secs: u64,
}

/// Body of `GET /assistants`
#[derive(Debug, Serialize)]
pub struct AssistantsResponse {
    pub assistants: Vec<AssistantStatus>,
}

/// JSON error body for request-level failures (unknown assistant,
/// unsupported operation)
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
