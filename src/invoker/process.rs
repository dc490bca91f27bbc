//! Child-process execution with full output capture.
//!
//! Spawns commands via `tokio::process::Command` and enforces the
//! per-invocation timeout by killing the child.

use super::{InvocationRequest, InvocationResult, InvokerError};
use std::borrow::Cow;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, info, warn};
use which::which;

/// Runs external commands in isolated child processes.
///
/// Stateless; the per-call [`InvocationRequest`] carries everything an
/// invocation needs, so a single invoker can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    /// Create a new process invoker
    pub fn new() -> Self {
        Self
    }

    /// Execute a command and capture its complete output.
    ///
    /// # Errors
    ///
    /// Returns [`InvokerError::ExecutableNotFound`] when the program cannot
    /// be resolved or started, and [`InvokerError::Io`] for I/O failures
    /// against a running child. Non-zero exits and timeouts are *not*
    /// errors; they are reported through the returned [`InvocationResult`].
    pub async fn run(&self, request: InvocationRequest) -> Result<InvocationResult, InvokerError> {
        // Resolve before spawning so an absent tool fails the same way on
        // every platform, instead of surfacing as a platform-specific spawn
        // error.
        which(&request.program)
            .map_err(|_| InvokerError::ExecutableNotFound(request.program.clone()))?;

        info!(
            target: "cligate::invoker",
            "Invoking: {}",
            render_command(&request)
        );

        let mut command = Command::new(&request.program);
        command
            .args(&request.args)
            .stdin(if request.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(ref dir) = request.working_dir {
            command.current_dir(dir);
        }

        let start = Instant::now();

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InvokerError::ExecutableNotFound(request.program.clone())
            } else {
                InvokerError::Io {
                    program: request.program.clone(),
                    source: e,
                }
            }
        })?;

        // Drain both streams off to the side: a timeout still leaves us
        // with whatever the child managed to produce, and the readers must
        // already be running while the stdin payload is written or a large
        // payload can deadlock against a full output pipe.
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let stdout_task = tokio::spawn(read_to_end(stdout_pipe));
        let stderr_task = tokio::spawn(read_to_end(stderr_pipe));

        // Feeding stdin and waiting share the timeout: a child that never
        // reads its input must not stall the gateway past the deadline.
        let mut stdin_handle = child.stdin.take();
        let feed_and_wait = async {
            if let Some(payload) = request.stdin.as_deref() {
                if let Some(mut stdin) = stdin_handle.take() {
                    // A child that exits before reading its input closes
                    // the pipe; that is its prerogative, not our failure.
                    if let Err(e) = stdin.write_all(payload.as_bytes()).await {
                        warn!(
                            target: "cligate::invoker",
                            "Failed to write stdin payload to '{}': {}",
                            request.program, e
                        );
                    }
                    let _ = stdin.shutdown().await;
                }
            }
            child.wait().await
        };

        // Hoisted out of the match so the wait future (and its borrow of
        // the child) is dropped before the timeout arm reaches for it.
        let wait_result = tokio::time::timeout(request.timeout, feed_and_wait).await;

        let (exit_status, timed_out) = match wait_result {
            Ok(Ok(status)) => (status.code(), false),
            Ok(Err(e)) => {
                return Err(InvokerError::Io {
                    program: request.program.clone(),
                    source: e,
                });
            }
            Err(_) => {
                warn!(
                    target: "cligate::invoker",
                    "'{}' exceeded its {:?} timeout; killing",
                    request.program, request.timeout
                );
                if let Err(e) = child.start_kill() {
                    warn!(
                        target: "cligate::invoker",
                        "Failed to kill timed-out '{}': {}",
                        request.program, e
                    );
                }
                // Reap the child so the pipes close and the readers finish
                // with the partial output.
                let _ = child.wait().await;
                (None, true)
            }
        };

        let (stdout, stderr) = futures::future::join(stdout_task, stderr_task).await;
        let stdout = String::from_utf8_lossy(&stdout.unwrap_or_default()).to_string();
        let stderr = String::from_utf8_lossy(&stderr.unwrap_or_default()).to_string();

        let elapsed = start.elapsed();

        debug!(
            target: "cligate::invoker",
            exit_status = ?exit_status,
            timed_out,
            "'{}' finished in {:?}",
            request.program, elapsed
        );

        Ok(InvocationResult {
            exit_status,
            stdout,
            stderr,
            elapsed,
            timed_out,
        })
    }
}

async fn read_to_end<R: AsyncRead + Unpin>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    buf
}

/// Shell-quoted rendering of the command line for the invocation log.
fn render_command(request: &InvocationRequest) -> String {
    std::iter::once(&request.program)
        .chain(request.args.iter())
        .map(|part| shell_escape::escape(Cow::from(part.as_str())).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
