//! Response normalization
//!
//! Pure mapping from an adapter's [`OperationOutcome`] to the externally
//! visible envelope. Content and error fields are mutually exclusive (the
//! outcome guarantees it by construction) and elapsed time is always
//! present, success or not.

use crate::adapters::{ErrorKind, Operation, OperationOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The uniform result envelope returned for every operation
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    /// Correlation id for this request
    pub request_id: Uuid,
    /// Identifier of the assistant that handled the operation
    pub assistant: String,
    /// The operation that was performed
    pub operation: Operation,
    /// Whether the operation succeeded
    pub success: bool,
    /// Normalized content on success; null on failure
    pub content: Option<String>,
    /// Error classification on failure; null on success
    pub error_kind: Option<ErrorKind>,
    /// Error detail on failure; null on success
    pub error_detail: Option<String>,
    /// Wall-clock time the operation took, in milliseconds
    pub elapsed_ms: u64,
    /// When the envelope was produced
    pub timestamp: DateTime<Utc>,
}

impl ResponseEnvelope {
    /// Shape an outcome into the envelope
    pub fn from_outcome(
        request_id: Uuid,
        assistant: &str,
        operation: Operation,
        outcome: OperationOutcome,
    ) -> Self {
        let elapsed_ms = outcome.elapsed().as_millis() as u64;
        let (content, error_kind, error_detail) = match outcome.error() {
            Some(error) => (None, Some(error.kind), Some(error.detail.clone())),
            None => (outcome.content().map(str::to_string), None, None),
        };

        Self {
            request_id,
            assistant: assistant.to_string(),
            operation,
            success: outcome.is_success(),
            content,
            error_kind,
            error_detail,
            elapsed_ms,
            timestamp: Utc::now(),
        }
    }
}
