//! Gateway configuration
//!
//! Built-in defaults, optionally overridden by a TOML file and then by CLI
//! arguments. The configuration is read once at startup and treated as
//! read-only afterward.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Host to bind the HTTP listener to
    pub host: String,
    /// Port to bind the HTTP listener to
    pub port: u16,
    /// Identifier of the assistant used when a request names none
    pub default_assistant: String,
    /// Default working directory for CLI invocations; created at startup
    pub workspace: PathBuf,
    /// Directory for daily rolling log files; `None` disables file logging
    pub log_dir: Option<PathBuf>,
    /// Copilot adapter tunables
    pub copilot: CopilotConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            default_assistant: "copilot".to_string(),
            workspace: PathBuf::from("tmp"),
            log_dir: Some(PathBuf::from("logs")),
            copilot: CopilotConfig::default(),
        }
    }
}

/// Copilot CLI adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CopilotConfig {
    /// Executable name (or path) of the Copilot CLI
    pub command: String,
    /// Model requested when the caller names none
    pub default_model: Option<String>,
    /// Timeout for chat operations, in seconds
    pub chat_timeout_secs: u64,
    /// Timeout for explain/modify/commit-message operations, in seconds
    pub code_timeout_secs: u64,
    /// Timeout for collecting the staged diff, in seconds
    pub diff_timeout_secs: u64,
    /// Timeout for the availability probe, in seconds
    pub probe_timeout_secs: u64,
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            command: "copilot".to_string(),
            default_model: Some("claude-haiku-4.5".to_string()),
            chat_timeout_secs: 3600,
            code_timeout_secs: 60,
            diff_timeout_secs: 30,
            probe_timeout_secs: 5,
        }
    }
}

impl CopilotConfig {
    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }

    pub fn code_timeout(&self) -> Duration {
        Duration::from_secs(self.code_timeout_secs)
    }

    pub fn diff_timeout(&self) -> Duration {
        Duration::from_secs(self.diff_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
