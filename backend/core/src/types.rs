//! Shared data types for the upload pipeline.

use serde::Serialize;
use std::path::PathBuf;

/// Hard cap on a single attachment: 100 MiB.
pub const MAX_ATTACHMENT_BYTES: u64 = 100 * 1024 * 1024;

/// Read-only snapshot of a platform-owned attachment.
///
/// The invoking platform keeps ownership of the bytes; `url` is where
/// they can be fetched from for the duration of the invocation.
#[derive(Debug, Clone)]
pub struct AttachmentRef {
    pub filename: String,
    pub size: u64,
    pub url: String,
}

/// A local copy of one attachment, scoped to a single invocation.
///
/// `path` is namespaced per invocation so concurrent commands never
/// collide; `original_name` is what the user called the file and is the
/// name used remotely and in metadata text.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub path: PathBuf,
    pub original_name: String,
}

/// Item-level metadata sent alongside an upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadMetadata {
    pub scanner: String,
    pub collection: String,
    pub title: String,
    pub description: String,
}

impl UploadMetadata {
    /// Metadata as ordered key/value pairs for the wire.
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("scanner", self.scanner.as_str()),
            ("collection", self.collection.as_str()),
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
        ]
    }
}
