//! Capability traits injected into the upload pipeline.
//!
//! The pipeline never reaches for ambient globals; the composition root
//! hands it an archive store, an attachment fetcher, and a notifier so
//! the whole flow unit-tests against fakes.

use crate::error::UploadError;
use crate::types::{AttachmentRef, StagedFile, UploadMetadata};
use async_trait::async_trait;

/// Destination for archived items.
pub trait ArchiveStore: Send + Sync {
    /// Transfer the staged files as one item. Blocking — callers must run
    /// this on a worker thread, never on the gateway event path.
    fn upload(
        &self,
        identifier: &str,
        files: &[StagedFile],
        metadata: &UploadMetadata,
    ) -> Result<(), UploadError>;
}

/// Fetches attachment bytes from the platform's CDN.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch(&self, attachment: &AttachmentRef) -> Result<Vec<u8>, UploadError>;
}

/// Sends plain-text status messages back through the invoking channel.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn send(&self, text: &str) -> anyhow::Result<()>;
}
