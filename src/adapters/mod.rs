//! # Assistant Adapter Abstraction
//!
//! The capability contract every AI-assistant adapter implements, plus the
//! normalized [`OperationOutcome`] that crosses the core boundary.
//!
//! ## Core Components
//!
//! - **[`AssistantAdapter`]**: The uniform operation set (`chat`,
//!   `explain_code`, `modify_code`, `generate_commit_message`,
//!   `is_available`) implemented per CLI tool
//! - **[`AdapterDescriptor`]**: Static metadata — identifier, display name,
//!   underlying command, supported operations
//! - **[`OperationOutcome`]**: Normalized success/failure result of one
//!   operation, independent of which adapter produced it
//! - **[`ErrorKind`]**: The outcome-level error taxonomy
//!
//! Unsupported operations fail with [`OperationError::Unsupported`] before
//! any process is spawned; that and assistant resolution are the only
//! failures that propagate past the core. Everything the tool itself does
//! wrong — non-zero exit, timeout, missing executable — is folded into a
//! failed outcome so callers always get a structured response.

use crate::invoker::{InvocationResult, InvokerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub mod copilot;

pub use copilot::CopilotAdapter;

/// The operations an adapter can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Chat,
    ExplainCode,
    ModifyCode,
    GenerateCommitMessage,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Chat => "chat",
            Operation::ExplainCode => "explain_code",
            Operation::ModifyCode => "modify_code",
            Operation::GenerateCommitMessage => "generate_commit_message",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static adapter metadata, created once at registration and read-only
/// thereafter
#[derive(Debug, Clone, Serialize)]
pub struct AdapterDescriptor {
    /// Opaque key uniquely naming the adapter in the registry
    pub identifier: String,
    /// Human-readable assistant name
    pub display_name: String,
    /// Underlying executable name
    pub command: String,
    /// Operations this adapter supports
    pub capabilities: Vec<Operation>,
}

impl AdapterDescriptor {
    pub fn supports(&self, operation: Operation) -> bool {
        self.capabilities.contains(&operation)
    }
}

/// Per-request knobs forwarded from the caller to the adapter
#[derive(Debug, Clone, Default)]
pub struct OperationOptions {
    /// Model to request from the underlying tool, when it takes one
    pub model: Option<String>,
    /// Working directory override for the invocation
    pub workspace: Option<PathBuf>,
}

/// Outcome-level error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedOperation,
    ExecutableNotFound,
    ToolExecutionFailed,
    ToolTimeout,
    InvalidPayload,
}

/// Error carried by a failed outcome
#[derive(Debug, Clone)]
pub struct OutcomeError {
    pub kind: ErrorKind,
    pub detail: String,
}

/// Normalized result of one operation.
///
/// Fields are private so the invariant holds by construction: a failed
/// outcome never carries content that could be mistaken for a real answer,
/// and a successful one never carries an error.
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    success: bool,
    content: Option<String>,
    error: Option<OutcomeError>,
    elapsed: Duration,
}

impl OperationOutcome {
    /// Successful outcome carrying the normalized content
    pub fn success(content: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: true,
            content: Some(content.into()),
            error: None,
            elapsed,
        }
    }

    /// Failed outcome carrying an error kind and detail
    pub fn failure(kind: ErrorKind, detail: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(OutcomeError {
                kind,
                detail: detail.into(),
            }),
            elapsed,
        }
    }

    /// Failed outcome for a request rejected before any process was spawned
    pub fn invalid_payload(detail: impl Into<String>) -> Self {
        Self::failure(ErrorKind::InvalidPayload, detail, Duration::ZERO)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn error(&self) -> Option<&OutcomeError> {
        self.error.as_ref()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Failures that propagate out of an adapter instead of becoming a failed
/// outcome: precondition violations on the request itself.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OperationError {
    #[error("assistant '{assistant}' does not support operation '{operation}'")]
    Unsupported {
        assistant: String,
        operation: Operation,
    },
}

/// Capability contract every assistant adapter implements.
///
/// Default method bodies reject the operation as unsupported without
/// spawning anything, so an adapter implements exactly the operations its
/// descriptor declares.
#[async_trait]
pub trait AssistantAdapter: Send + Sync {
    /// Static metadata for this adapter
    fn descriptor(&self) -> &AdapterDescriptor;

    /// Whether this adapter supports the given operation
    fn supports(&self, operation: Operation) -> bool {
        self.descriptor().supports(operation)
    }

    /// Send a free-form message to the assistant
    async fn chat(
        &self,
        message: &str,
        context: Option<&str>,
        options: &OperationOptions,
    ) -> Result<OperationOutcome, OperationError> {
        let _ = (message, context, options);
        Err(self.unsupported(Operation::Chat))
    }

    /// Ask the assistant to explain a piece of code
    async fn explain_code(
        &self,
        code: &str,
        language: Option<&str>,
        options: &OperationOptions,
    ) -> Result<OperationOutcome, OperationError> {
        let _ = (code, language, options);
        Err(self.unsupported(Operation::ExplainCode))
    }

    /// Ask the assistant to modify code according to an instruction
    async fn modify_code(
        &self,
        code: &str,
        instruction: &str,
        language: Option<&str>,
        options: &OperationOptions,
    ) -> Result<OperationOutcome, OperationError> {
        let _ = (code, instruction, language, options);
        Err(self.unsupported(Operation::ModifyCode))
    }

    /// Generate a commit message, from the given diff or from the staged
    /// changes in the workspace
    async fn generate_commit_message(
        &self,
        diff: Option<&str>,
        files: &[String],
        options: &OperationOptions,
    ) -> Result<OperationOutcome, OperationError> {
        let _ = (diff, files, options);
        Err(self.unsupported(Operation::GenerateCommitMessage))
    }

    /// Cheap liveness probe, bounded by a short fixed timeout.
    ///
    /// Never errors: any failure (tool missing, non-zero exit, timeout)
    /// reads as unavailable.
    async fn is_available(&self) -> bool;

    #[doc(hidden)]
    fn unsupported(&self, operation: Operation) -> OperationError {
        OperationError::Unsupported {
            assistant: self.descriptor().identifier.clone(),
            operation,
        }
    }
}

impl fmt::Debug for dyn AssistantAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantAdapter")
            .field("identifier", &self.descriptor().identifier)
            .finish()
    }
}

/// Fold a failed or timed-out [`InvocationResult`] into an outcome.
///
/// Callers handle the success path themselves (parsing is tool-specific);
/// the failure mapping is uniform across adapters.
pub(crate) fn outcome_from_failed_invocation(
    command: &str,
    result: &InvocationResult,
) -> OperationOutcome {
    if result.timed_out {
        return OperationOutcome::failure(
            ErrorKind::ToolTimeout,
            format!("'{}' timed out after {:?}", command, result.elapsed),
            result.elapsed,
        );
    }

    let detail = if result.stderr.trim().is_empty() {
        result.stdout.trim()
    } else {
        result.stderr.trim()
    };
    let detail = if detail.is_empty() {
        format!(
            "'{}' exited with status {:?}",
            command,
            result.exit_status
        )
    } else {
        detail.to_string()
    };

    OperationOutcome::failure(ErrorKind::ToolExecutionFailed, detail, result.elapsed)
}

/// Fold an [`InvokerError`] into an outcome
pub(crate) fn outcome_from_invoker_error(err: &InvokerError, elapsed: Duration) -> OperationOutcome {
    match err {
        InvokerError::ExecutableNotFound(_) => {
            OperationOutcome::failure(ErrorKind::ExecutableNotFound, err.to_string(), elapsed)
        }
        InvokerError::Io { .. } => {
            OperationOutcome::failure(ErrorKind::ToolExecutionFailed, err.to_string(), elapsed)
        }
    }
}
