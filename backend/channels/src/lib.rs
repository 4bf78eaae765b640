//! `archivist-channels` — chat-platform adapters.
//!
//! One adapter today: Discord (serenity gateway, `/upload` slash
//! command). Adapters own their framework specifics and hand each
//! invocation to the shared upload pipeline in [`upload`].

use async_trait::async_trait;

pub mod discord;
pub mod staging;
pub mod upload;

pub use discord::DiscordAdapter;
pub use upload::{run_upload, UploadDeps, UploadOutcome, UploadRequest};

/// All channel adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Run the adapter's gateway connection until it exits.
    async fn start(&self) -> anyhow::Result<()>;
}
