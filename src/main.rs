use anyhow::Context;
use clap::Parser;
use cligate::server::AppState;
use cligate::{AssistantRegistry, CopilotAdapter, GatewayConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Debug, Parser)]
#[command(name = "cligate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Unified REST gateway over AI programming assistant CLI tools")]
struct Args {
    /// Host to bind to (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g. "info", "cligate=debug")
    #[arg(long, default_value = "cligate=info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GatewayConfig::from_toml_file(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // The guard flushes buffered file output on shutdown; keep it alive for
    // the whole run.
    let _guard = init_tracing(&args.log_level, config.log_dir.as_deref());

    info!("Starting cligate v{}", env!("CARGO_PKG_VERSION"));

    std::fs::create_dir_all(&config.workspace).with_context(|| {
        format!(
            "failed to create workspace directory {}",
            config.workspace.display()
        )
    })?;

    let mut registry = AssistantRegistry::new();
    registry.register(Arc::new(CopilotAdapter::new(
        config.copilot.clone(),
        config.workspace.clone(),
    )));
    registry.set_default(config.default_assistant.clone());

    // Probe each adapter once so operators see at startup what will work.
    // Absence of a CLI is a runtime condition, not a startup failure.
    let statuses = registry.statuses().await;
    let mut any_available = false;
    for status in &statuses {
        if status.available {
            any_available = true;
            info!("{} is available", status.display_name);
        } else {
            warn!(
                "{} is not available (command '{}' failed the version probe)",
                status.display_name, status.command
            );
        }
    }
    if !any_available {
        warn!("No assistants are available; operations will fail until a CLI is installed");
    }

    let state = Arc::new(AppState {
        registry,
        config,
        started_at: Instant::now(),
    });

    cligate::server::run(state).await
}

/// Console logging, plus daily rolling file logs when a log directory is
/// configured. `RUST_LOG` takes precedence over `--log-level`.
fn init_tracing(fallback_filter: &str, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_filter.to_string()));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "cligate.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}
