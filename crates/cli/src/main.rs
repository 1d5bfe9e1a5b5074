use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use streakcert_core::{AppConfig, BackendKind};
use streakcert_storage::StorageBackend;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "streakcert")]
#[command(about = "Daily certification practice with streak commitments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (and the reconcile scheduler unless disabled)
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(short = 'H', long)]
        host: Option<String>,
    },
    /// Run streak reconciliation once and print the summary as JSON
    Reconcile,
    /// Apply PostgreSQL schema migrations
    Migrate,
}

/// Open the configured backend.
pub(crate) async fn open_storage(config: &AppConfig) -> Result<Arc<StorageBackend>> {
    let backend = match config.backend {
        BackendKind::Memory => {
            tracing::warn!("Using in-memory storage; nothing survives a restart");
            StorageBackend::new_memory()
        },
        BackendKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("STREAKCERT_DATABASE_URL or DATABASE_URL must be set for the postgres backend")?;
            StorageBackend::new_postgres(url).await?
        },
    };
    Ok(Arc::new(backend))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(config, port, host).await,
        Commands::Reconcile => commands::reconcile::run(config).await,
        Commands::Migrate => commands::migrate::run(config).await,
    }
}
