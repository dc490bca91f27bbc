//! # cligate
//!
//! A unified REST gateway over heterogeneous AI-programming-assistant CLI
//! tools. Clients send HTTP requests for chat, code explanation, code
//! modification, and commit-message generation; the gateway translates each
//! into an invocation of the appropriate underlying CLI, captures its
//! output, and returns a normalized JSON envelope.
//!
//! ## Architecture Overview
//!
//! The system consists of a small core plus thin HTTP plumbing:
//!
//! - **[`invoker`]**: Child-process execution with stdin piping, full output
//!   capture, and per-invocation timeout enforcement
//! - **[`adapters`]**: The capability contract every assistant implements,
//!   the normalized operation outcome, and the Copilot reference adapter
//! - **[`registry`]**: Startup-populated, read-only mapping from assistant
//!   identifier to adapter instance
//! - **[`response`]**: Pure normalization of outcomes into the externally
//!   visible response envelope
//! - **[`server`]**: The axum REST surface calling into the core
//! - **[`config`]**: TOML-backed configuration with CLI overrides
//!
//! ## Key Properties
//!
//! - **Uniform contract**: every assistant exposes the same operation set;
//!   unsupported operations are rejected before any process is spawned
//! - **Structured failure**: non-zero exits, timeouts, and missing
//!   executables become failed outcomes, never unhandled errors — a caller
//!   always receives a response
//! - **No shared mutable state**: the registry is immutable after startup,
//!   so concurrent requests need no locking; each request owns its
//!   invocation from spawn to reap
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cligate::{AssistantAdapter, AssistantRegistry, CopilotAdapter, GatewayConfig};
//! use cligate::adapters::OperationOptions;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GatewayConfig::default();
//!
//!     let mut registry = AssistantRegistry::new();
//!     registry.register(Arc::new(CopilotAdapter::new(
//!         config.copilot.clone(),
//!         config.workspace.clone(),
//!     )));
//!     registry.set_default("copilot");
//!
//!     let adapter = registry.resolve("copilot")?;
//!     let outcome = adapter
//!         .chat("How do I revert a commit?", None, &OperationOptions::default())
//!         .await?;
//!     println!("success: {}", outcome.is_success());
//!     Ok(())
//! }
//! ```

/// Assistant adapter contract, operation outcomes, and concrete adapters.
///
/// Defines [`AssistantAdapter`] and the normalized [`OperationOutcome`]
/// that crosses the core boundary, plus the GitHub Copilot reference
/// adapter.
pub mod adapters;

/// Gateway configuration.
///
/// Built-in defaults overridden by an optional TOML file and CLI
/// arguments; read once at startup.
pub mod config;

/// Process invocation layer.
///
/// Spawns assistant CLIs as isolated child processes with stdin piping,
/// complete output capture, and kill-on-timeout semantics.
pub mod invoker;

/// Assistant registry.
///
/// Maps assistant identifiers to adapter instances; populated once at
/// startup and read-only afterward.
pub mod registry;

/// Response normalization.
///
/// Shapes heterogeneous adapter outcomes into one uniform envelope.
pub mod response;

/// REST surface.
///
/// The axum router, request/response models, and handlers that call into
/// the core.
pub mod server;

// Re-export the main types
pub use adapters::{
    AdapterDescriptor, AssistantAdapter, CopilotAdapter, ErrorKind, Operation, OperationError,
    OperationOptions, OperationOutcome,
};
pub use config::{ConfigError, CopilotConfig, GatewayConfig};
pub use invoker::{InvocationRequest, InvocationResult, InvokerError, ProcessInvoker};
pub use registry::{AssistantRegistry, AssistantStatus, RegistryError};
pub use response::ResponseEnvelope;
pub use server::AppState;
