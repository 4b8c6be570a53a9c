use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use zhibi::api::{ApiClient, DocumentQuery};
use zhibi::app::runtime;
use zhibi::cli::{Cli, Commands};
use zhibi::commands;
use zhibi::config::{self, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = config::load_settings();
    if let Some(ref server) = cli.server {
        settings.server_url = server.clone();
    }

    let api = ApiClient::new(
        &settings.server_url,
        Duration::from_secs(settings.request_timeout),
    )?;

    match cli.command.unwrap_or(Commands::Browse { id: None }) {
        Commands::Browse { id } => {
            settings
                .ensure_directories()
                .with_context(|| format!("Failed to create {}", settings.data_dir.display()))?;
            init_file_logging(&settings)?;
            runtime::run(api, id).await
        }
        Commands::List {
            query,
            doc_type,
            theme,
        } => {
            init_stderr_logging();
            commands::list(
                &api,
                DocumentQuery {
                    query,
                    doc_type,
                    theme,
                },
            )
            .await
        }
        Commands::Upload { input } => {
            init_stderr_logging();
            commands::upload(&api, &input).await
        }
    }
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

/// The TUI owns the terminal, so tracing goes to a log file instead.
fn init_file_logging(settings: &Settings) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(settings.log_path())
        .with_context(|| format!("Failed to open {}", settings.log_path().display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
