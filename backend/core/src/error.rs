use thiserror::Error;

/// Top-level error type for one upload invocation.
///
/// Every variant is user-visible and non-fatal to the process: the
/// pipeline reports it back through the invoking channel and ends that
/// invocation. Nothing here is retried.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no files attached")]
    NoAttachments,

    #[error("file `{filename}` exceeds the 100MB limit")]
    AttachmentTooLarge { filename: String },

    #[error("failed to download `{filename}`: {reason}")]
    Fetch { filename: String, reason: String },

    #[error("failed to stage `{filename}`: {source}")]
    Staging {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    /// The archival transfer failed; carries the store's reason verbatim.
    #[error("{0}")]
    Transfer(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
