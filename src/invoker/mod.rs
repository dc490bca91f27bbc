//! # Process Invocation Layer
//!
//! Runs external assistant CLIs as isolated child processes and captures
//! their complete output.
//!
//! ## Core Components
//!
//! - **[`ProcessInvoker`]**: Spawns a command via `tokio::process::Command`,
//!   feeds an optional stdin payload, and collects stdout/stderr in full
//! - **[`InvocationRequest`]**: Command specification with arguments, stdin
//!   payload, working directory, and a mandatory timeout
//! - **[`InvocationResult`]**: Invocation outcome with captured output, exit
//!   status, elapsed time, and a timed-out flag
//!
//! ## Timeout Semantics
//!
//! A timeout is part of the result, not an error: when the deadline passes
//! the child is killed and the caller receives whatever output was captured
//! up to that point with `timed_out = true` and the exit status unknown.
//! Only a missing or unstartable executable is reported as an
//! [`InvokerError`] — that is a precondition failure, distinct from the tool
//! itself failing at runtime.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cligate::invoker::{InvocationRequest, ProcessInvoker};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let invoker = ProcessInvoker::new();
//!
//!     let request = InvocationRequest::new(
//!         "echo",
//!         vec!["hello".to_string()],
//!         Duration::from_secs(5),
//!     );
//!
//!     let result = invoker.run(request).await?;
//!     println!("stdout: {}", result.stdout);
//!     println!("exit status: {:?}", result.exit_status);
//!
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod process;

pub use process::ProcessInvoker;

/// Command to invoke
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Program name or path to execute
    pub program: String,
    /// Command line arguments
    pub args: Vec<String>,
    /// Payload written to the child's standard input, after which the
    /// stream is closed
    pub stdin: Option<String>,
    /// Working directory for the invocation
    pub working_dir: Option<PathBuf>,
    /// Maximum execution time; always positive
    pub timeout: Duration,
}

impl InvocationRequest {
    /// Create a new request with program, args, and timeout.
    ///
    /// The timeout is mandatory: every invocation must have a deadline.
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        debug_assert!(!timeout.is_zero(), "invocation timeout must be positive");
        Self {
            program: program.into(),
            args,
            stdin: None,
            working_dir: None,
            timeout,
        }
    }

    /// Set the stdin payload
    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    /// Set the working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }
}

/// Result of one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResult {
    /// Exit status code; `None` when unknown (the process was killed on
    /// timeout, or terminated by a signal)
    pub exit_status: Option<i32>,
    /// Captured standard output (possibly partial if timed out)
    pub stdout: String,
    /// Captured standard error (possibly partial if timed out)
    pub stderr: String,
    /// Wall-clock duration of the invocation
    pub elapsed: Duration,
    /// True when the process was killed because the timeout expired
    pub timed_out: bool,
}

impl InvocationResult {
    /// Check if the invocation completed successfully (exit status 0)
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_status == Some(0)
    }
}

/// Errors preventing an invocation from running at all.
///
/// A non-zero exit status or a timeout is never an error here; both are
/// reported through [`InvocationResult`] and interpreted by the adapter.
#[derive(Debug, thiserror::Error)]
pub enum InvokerError {
    /// The executable is not on the search path or could not be started
    #[error("executable '{0}' not found or could not be started")]
    ExecutableNotFound(String),

    /// I/O failure while communicating with an already running child
    #[error("i/o failure while running '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
