//! GitHub Copilot CLI adapter.
//!
//! Translates each contract operation into one headless invocation of the
//! `copilot` binary (`-p <prompt> --allow-all-tools`, optional `--model`)
//! and parses its raw textual output into a normalized outcome. Code and
//! diff payloads travel over stdin so they never meet the shell.

use super::{
    AdapterDescriptor, AssistantAdapter, Operation, OperationError, OperationOptions,
    OperationOutcome, outcome_from_failed_invocation, outcome_from_invoker_error,
};
use crate::config::CopilotConfig;
use crate::invoker::{InvocationRequest, InvocationResult, ProcessInvoker};
use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::debug;

/// Leading banner and progress lines the Copilot CLI prints around its
/// actual answer.
static BANNER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^GitHub Copilot CLI",
        r"^An AI-powered coding assistant",
        r"^═+",
        r"^─+",
        r"^\s*$",
        r"^Loading",
        r"^Thinking",
        r"^Processing",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).expect("pattern is a valid regex"))
    .collect()
});

static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+-]*\n(.*?)\n?```").expect("pattern is a valid regex")
});

static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("pattern is a valid regex"));

/// Adapter for the GitHub Copilot CLI
pub struct CopilotAdapter {
    descriptor: AdapterDescriptor,
    invoker: ProcessInvoker,
    config: CopilotConfig,
    workspace: PathBuf,
}

impl CopilotAdapter {
    /// Create a Copilot adapter running invocations in `workspace` unless a
    /// request overrides it
    pub fn new(config: CopilotConfig, workspace: PathBuf) -> Self {
        let descriptor = AdapterDescriptor {
            identifier: "copilot".to_string(),
            display_name: "GitHub Copilot CLI".to_string(),
            command: config.command.clone(),
            capabilities: vec![
                Operation::Chat,
                Operation::ExplainCode,
                Operation::ModifyCode,
                Operation::GenerateCommitMessage,
            ],
        };

        Self {
            descriptor,
            invoker: ProcessInvoker::new(),
            config,
            workspace,
        }
    }

    fn workspace_for(&self, options: &OperationOptions) -> PathBuf {
        options
            .workspace
            .clone()
            .unwrap_or_else(|| self.workspace.clone())
    }

    /// Build the standard `copilot -p <prompt> --allow-all-tools`
    /// invocation
    fn prompt_invocation(
        &self,
        prompt: String,
        stdin: Option<String>,
        timeout: Duration,
        options: &OperationOptions,
    ) -> InvocationRequest {
        let mut args = Vec::new();

        if let Some(model) = options
            .model
            .as_ref()
            .or(self.config.default_model.as_ref())
        {
            args.push("--model".to_string());
            args.push(model.clone());
        }

        args.push("-p".to_string());
        args.push(prompt);
        args.push("--allow-all-tools".to_string());

        let mut request = InvocationRequest::new(self.descriptor.command.clone(), args, timeout)
            .with_working_dir(self.workspace_for(options));
        if let Some(stdin) = stdin {
            request = request.with_stdin(stdin);
        }
        request
    }

    /// Run an invocation and fold the result into an outcome
    async fn execute(&self, request: InvocationRequest, extract_code: bool) -> OperationOutcome {
        let start = Instant::now();
        match self.invoker.run(request).await {
            Ok(result) => self.outcome_from_result(&result, extract_code),
            Err(err) => outcome_from_invoker_error(&err, start.elapsed()),
        }
    }

    fn outcome_from_result(
        &self,
        result: &InvocationResult,
        extract_code: bool,
    ) -> OperationOutcome {
        if !result.success() {
            return outcome_from_failed_invocation(&self.descriptor.command, result);
        }

        // Exit 0 with diagnostics on stderr: the answer is on stdout, the
        // diagnostics are noise. Stderr only becomes the answer when
        // stdout carries nothing at all.
        let content = if result.stdout.trim().is_empty() {
            result.stderr.trim().to_string()
        } else {
            if !result.stderr.trim().is_empty() {
                debug!(
                    "Discarding {} bytes of stderr diagnostics from successful '{}' run",
                    result.stderr.len(),
                    self.descriptor.command
                );
            }
            clean_output(&result.stdout)
        };

        let content = if extract_code {
            extract_code_block(&content)
        } else {
            content
        };

        OperationOutcome::success(content, result.elapsed)
    }

    /// Collect the staged diff from the workspace
    async fn staged_diff(
        &self,
        files: &[String],
        options: &OperationOptions,
    ) -> Result<String, OperationOutcome> {
        let mut args = vec!["diff".to_string(), "--staged".to_string()];
        args.extend(files.iter().cloned());

        let request = InvocationRequest::new("git", args, self.config.diff_timeout())
            .with_working_dir(self.workspace_for(options));

        match self.invoker.run(request).await {
            Ok(result) if result.success() => Ok(result.stdout),
            Ok(result) => Err(outcome_from_failed_invocation("git", &result)),
            Err(err) => Err(outcome_from_invoker_error(&err, Duration::ZERO)),
        }
    }
}

#[async_trait]
impl AssistantAdapter for CopilotAdapter {
    fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    async fn chat(
        &self,
        message: &str,
        context: Option<&str>,
        options: &OperationOptions,
    ) -> Result<OperationOutcome, OperationError> {
        if message.trim().is_empty() {
            return Ok(OperationOutcome::invalid_payload(
                "chat requires a non-empty message",
            ));
        }

        let prompt = match context {
            Some(ctx) if !ctx.trim().is_empty() => {
                format!("Context: {ctx}\n\nQuestion: {message}")
            }
            _ => message.to_string(),
        };

        let request = self.prompt_invocation(prompt, None, self.config.chat_timeout(), options);
        Ok(self.execute(request, false).await)
    }

    async fn explain_code(
        &self,
        code: &str,
        language: Option<&str>,
        options: &OperationOptions,
    ) -> Result<OperationOutcome, OperationError> {
        if code.trim().is_empty() {
            return Ok(OperationOutcome::invalid_payload(
                "explain_code requires a non-empty code payload",
            ));
        }

        let prompt = format!(
            "Please explain the code provided on standard input{}.",
            language_hint(language)
        );

        let request = self.prompt_invocation(
            prompt,
            Some(code.to_string()),
            self.config.code_timeout(),
            options,
        );
        Ok(self.execute(request, false).await)
    }

    async fn modify_code(
        &self,
        code: &str,
        instruction: &str,
        language: Option<&str>,
        options: &OperationOptions,
    ) -> Result<OperationOutcome, OperationError> {
        if code.trim().is_empty() {
            return Ok(OperationOutcome::invalid_payload(
                "modify_code requires a non-empty code payload",
            ));
        }
        if instruction.trim().is_empty() {
            return Ok(OperationOutcome::invalid_payload(
                "modify_code requires a non-empty instruction",
            ));
        }

        let prompt = format!(
            "Please {} for the code provided on standard input{}. Provide the modified code.",
            instruction.trim(),
            language_hint(language)
        );

        let request = self.prompt_invocation(
            prompt,
            Some(code.to_string()),
            self.config.code_timeout(),
            options,
        );
        Ok(self.execute(request, true).await)
    }

    async fn generate_commit_message(
        &self,
        diff: Option<&str>,
        files: &[String],
        options: &OperationOptions,
    ) -> Result<OperationOutcome, OperationError> {
        let diff_text = match diff {
            Some(d) if !d.trim().is_empty() => d.to_string(),
            _ => match self.staged_diff(files, options).await {
                Ok(text) => text,
                Err(outcome) => return Ok(outcome),
            },
        };

        if diff_text.trim().is_empty() {
            return Ok(OperationOutcome::invalid_payload(
                "no staged changes to describe",
            ));
        }

        let prompt = "Please generate a concise and descriptive git commit message \
                      for the changes provided on standard input. Return only the \
                      commit message, nothing else."
            .to_string();

        let request = self.prompt_invocation(
            prompt,
            Some(diff_text),
            self.config.code_timeout(),
            options,
        );
        Ok(self.execute(request, false).await)
    }

    async fn is_available(&self) -> bool {
        let request = InvocationRequest::new(
            self.descriptor.command.clone(),
            vec!["--version".to_string()],
            self.config.probe_timeout(),
        );

        match self.invoker.run(request).await {
            Ok(result) => result.success(),
            Err(_) => false,
        }
    }
}

fn language_hint(language: Option<&str>) -> String {
    match language {
        Some(lang) if !lang.trim().is_empty() => format!(" (this is {lang} code)"),
        _ => String::new(),
    }
}

/// Strip the CLI's banner and progress chatter, keeping the answer lines.
///
/// Falls back to the raw trimmed output when nothing survives the filter.
fn clean_output(raw: &str) -> String {
    let mut started = false;
    let mut kept = Vec::new();

    for line in raw.trim().lines() {
        if !started {
            if BANNER_PATTERNS.iter().any(|re| re.is_match(line)) {
                continue;
            }
            started = true;
        }
        if !line.trim().is_empty() {
            kept.push(line);
        }
    }

    let cleaned = kept.join("\n").trim().to_string();
    if cleaned.is_empty() {
        raw.trim().to_string()
    } else {
        cleaned
    }
}

/// Extract the largest fenced code block from a reply; fall back to inline
/// code, then to the reply itself.
fn extract_code_block(text: &str) -> String {
    let fenced: Vec<&str> = CODE_BLOCK_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    if let Some(best) = fenced.iter().max_by_key(|m| m.len()) {
        return best.to_string();
    }

    let inline: Vec<&str> = INLINE_CODE_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    if let Some(best) = inline.iter().max_by_key(|m| m.len()) {
        return best.to_string();
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ErrorKind;

    fn adapter() -> CopilotAdapter {
        CopilotAdapter::new(CopilotConfig::default(), PathBuf::from("/tmp"))
    }

    #[test]
    fn test_clean_output_strips_banner() {
        let raw = "GitHub Copilot CLI\n\
                   An AI-powered coding assistant\n\
                   ════════════════\n\
                   \n\
                   Use a list comprehension here.\n\
                   It reads better.\n";
        assert_eq!(
            clean_output(raw),
            "Use a list comprehension here.\nIt reads better."
        );
    }

    #[test]
    fn test_clean_output_keeps_everything_when_filter_eats_it_all() {
        let raw = "Thinking...\nLoading\n";
        assert_eq!(clean_output(raw), "Thinking...\nLoading");
    }

    #[test]
    fn test_extract_code_prefers_largest_fenced_block() {
        let text = "Here you go:\n```python\nx = 1\n```\nand the full version:\n\
                    ```python\ndef main():\n    x = 1\n    return x\n```\ndone";
        assert_eq!(
            extract_code_block(text),
            "def main():\n    x = 1\n    return x"
        );
    }

    #[test]
    fn test_extract_code_falls_back_to_inline_then_raw() {
        assert_eq!(extract_code_block("use `x += 1` instead"), "x += 1");
        assert_eq!(extract_code_block("no code here"), "no code here");
    }

    #[test]
    fn test_prompt_invocation_shape() {
        let adapter = adapter();
        let request = adapter.prompt_invocation(
            "hello".to_string(),
            None,
            Duration::from_secs(60),
            &OperationOptions::default(),
        );

        assert_eq!(request.program, "copilot");
        assert_eq!(
            request.args,
            vec!["--model", "claude-haiku-4.5", "-p", "hello", "--allow-all-tools"]
        );
        assert_eq!(request.working_dir.as_deref(), Some(std::path::Path::new("/tmp")));
        assert_eq!(request.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_request_model_overrides_default() {
        let adapter = adapter();
        let options = OperationOptions {
            model: Some("gpt-5".to_string()),
            workspace: Some(PathBuf::from("/work")),
        };
        let request =
            adapter.prompt_invocation("hi".to_string(), None, Duration::from_secs(60), &options);

        assert_eq!(request.args[0..2], ["--model", "gpt-5"]);
        assert_eq!(request.working_dir.as_deref(), Some(std::path::Path::new("/work")));
    }

    #[test]
    fn test_success_with_empty_stdout_falls_back_to_stderr() {
        let adapter = adapter();
        let result = InvocationResult {
            exit_status: Some(0),
            stdout: String::new(),
            stderr: "the useful text landed here\n".to_string(),
            elapsed: Duration::from_millis(40),
            timed_out: false,
        };

        let outcome = adapter.outcome_from_result(&result, false);
        assert!(outcome.is_success());
        assert_eq!(outcome.content(), Some("the useful text landed here"));
    }

    #[test]
    fn test_nonzero_exit_maps_to_tool_failure() {
        let adapter = adapter();
        let result = InvocationResult {
            exit_status: Some(1),
            stdout: String::new(),
            stderr: "not logged in\n".to_string(),
            elapsed: Duration::from_millis(40),
            timed_out: false,
        };

        let outcome = adapter.outcome_from_result(&result, false);
        assert!(!outcome.is_success());
        let error = outcome.error().unwrap();
        assert_eq!(error.kind, ErrorKind::ToolExecutionFailed);
        assert_eq!(error.detail, "not logged in");
        assert!(outcome.content().is_none());
    }

    #[tokio::test]
    async fn test_empty_payloads_are_rejected_without_spawning() {
        let adapter = adapter();
        let options = OperationOptions::default();

        let outcome = adapter.chat("   ", None, &options).await.unwrap();
        assert_eq!(outcome.error().unwrap().kind, ErrorKind::InvalidPayload);

        let outcome = adapter.explain_code("", None, &options).await.unwrap();
        assert_eq!(outcome.error().unwrap().kind, ErrorKind::InvalidPayload);

        let outcome = adapter
            .modify_code("print('x')", " ", None, &options)
            .await
            .unwrap();
        assert_eq!(outcome.error().unwrap().kind, ErrorKind::InvalidPayload);
    }

    #[tokio::test]
    async fn test_commit_message_with_provided_empty_diff() {
        let adapter = adapter();
        let outcome = adapter
            .generate_commit_message(Some("   "), &[], &OperationOptions::default())
            .await
            .unwrap();
        // Blank diff text falls back to the staged diff of the workspace,
        // which here is not a repo with staged changes; whatever the local
        // git situation, the result is a structured failure, never a
        // propagated one.
        assert!(!outcome.is_success());
        assert!(outcome.content().is_none());
    }
}
