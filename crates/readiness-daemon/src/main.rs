//! Readiness Daemon
//!
//! Backend process that evaluates issue readiness, persists the check settings,
//! and talks to Jira and the analysis endpoint on behalf of its clients.

use anyhow::{Context, Result};
use clap::Parser;
use readiness_analysis::AnalysisClient;
use readiness_core::models::Config;
use readiness_core::storage::init_data_dir;
use readiness_daemon::{ApiHandler, ConfigManager, EventManager, IpcServer, SettingsManager};
use readiness_jira::{JiraAuth, JiraClient};
use std::fs;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "readinessd")]
#[command(about = "Readiness daemon - issue readiness backend", long_about = None)]
struct Args {
    /// Socket path for IPC (defaults to the configured path)
    #[arg(short, long)]
    socket: Option<String>,

    /// Log level (defaults to the configured level)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Jira Cloud base URL, e.g. https://acme.atlassian.net
    #[arg(long, env = "JIRA_BASE_URL")]
    jira_url: Option<String>,

    /// Jira account email used for Basic auth
    #[arg(long, env = "JIRA_EMAIL")]
    jira_email: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = Arc::new(ConfigManager::new()?);
    let config = config_manager.get();

    let socket = args
        .socket
        .clone()
        .unwrap_or_else(|| config.daemon.socket_path.clone());
    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.daemon.log_level.clone());

    // Initialize data directory and log file
    let data_dir = init_data_dir()?;
    let log_file_path = data_dir.join("daemon.log");

    // Create log file with append mode
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    // Initialize logging - write to both file and stdout
    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let stdout_writer = std::io::stdout.with_max_level(tracing::Level::INFO);
    let file_writer = log_file.with_max_level(tracing::Level::DEBUG);

    tracing_subscriber::fmt()
        .with_writer(stdout_writer.and(file_writer))
        .with_env_filter(log_level.as_str())
        .with_ansi(false) // No color codes in log file
        .init();

    tracing::info!("Readiness daemon starting...");
    tracing::info!("Socket path: {}", socket);
    tracing::info!("Log file: {}", log_file_path.display());

    let event_manager = Arc::new(EventManager::new());
    let settings_manager = Arc::new(SettingsManager::with_dir(data_dir, event_manager.clone()));
    tracing::info!("Settings manager initialized");

    let jira = Arc::new(connect_jira(&args, &config)?);
    tracing::info!("Jira client initialized for {}", jira.base_url());

    let analysis = Arc::new(AnalysisClient::from_env(&config.analysis)?);
    if analysis.has_credential() {
        tracing::info!("Analysis client initialized (model {})", config.analysis.model);
    } else {
        tracing::warn!(
            "{} is not set; analysis requests will report an error",
            readiness_analysis::API_KEY_ENV
        );
    }

    let api_handler = Arc::new(ApiHandler::new(
        event_manager,
        settings_manager,
        config_manager,
        jira,
        analysis,
    ));
    tracing::info!("API handler initialized");

    // Initialize and start IPC server
    let ipc_server = Arc::new(IpcServer::new(socket, api_handler));

    // Start IPC server in background
    let server_handle = {
        let server = ipc_server.clone();
        tokio::spawn(async move {
            if let Err(e) = server.start().await {
                tracing::error!("IPC server error: {}", e);
            }
        })
    };

    tracing::info!("Daemon ready and listening");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    server_handle.abort();
    let _ = fs::remove_file(ipc_server.socket_path());

    Ok(())
}

/// Build the Jira client from flags, falling back to the config file
fn connect_jira(args: &Args, config: &Config) -> Result<JiraClient> {
    let base_url = args
        .jira_url
        .as_deref()
        .or(config.jira.base_url.as_deref())
        .context("Jira base URL not configured (use --jira-url or JIRA_BASE_URL)")?;
    let email = args
        .jira_email
        .as_deref()
        .or(config.jira.email.as_deref())
        .context("Jira email not configured (use --jira-email or JIRA_EMAIL)")?;

    let auth = JiraAuth::resolve(email).context("Failed to resolve Jira API token")?;
    Ok(JiraClient::new(base_url, &auth)?)
}
