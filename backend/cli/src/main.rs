mod doctor_cmd;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use archivist_archive::{IaCredentials, IaS3Client, DEFAULT_ENDPOINT};
use archivist_channels::discord::CdnFetcher;
use archivist_channels::{ChannelAdapter, DiscordAdapter, UploadDeps};
use archivist_config::{load_or_default, Settings};

#[derive(Parser)]
#[command(name = "archivist")]
#[command(about = "Archivist — Discord to Archive.org upload bot")]
#[command(version)]
struct Cli {
    /// Config file path (default: ~/.config/archivist/archivist.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the Discord gateway and serve /upload
    Run,
    /// Check credentials and staging-directory health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Run => {
            let settings = Settings::resolve(&config)?;
            archivist_logging::init_logger(&settings.log_dir, &settings.log_level);
            run_bot(settings).await
        }
        Commands::Doctor => doctor_cmd::run(&config),
    }
}

/// Composition root: builds the archive client, fetcher, and staging root
/// and hands them to the Discord adapter as injected capabilities.
async fn run_bot(settings: Settings) -> Result<()> {
    let endpoint = settings
        .archive_endpoint
        .clone()
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let store = IaS3Client::with_endpoint(
        IaCredentials {
            access_key: settings.archive_access_key.clone(),
            secret_key: settings.archive_secret_key.clone(),
        },
        endpoint,
    )?;

    std::fs::create_dir_all(&settings.staging_dir).with_context(|| {
        format!(
            "Failed to create staging dir {}",
            settings.staging_dir.display()
        )
    })?;

    let deps = Arc::new(UploadDeps {
        store: Arc::new(store),
        fetcher: Arc::new(CdnFetcher::new()),
        staging_root: settings.staging_dir.clone(),
    });

    let adapter = DiscordAdapter::new(settings.discord_token.clone(), deps);
    info!(adapter = adapter.name(), "Starting Archivist");
    adapter.start().await
}
