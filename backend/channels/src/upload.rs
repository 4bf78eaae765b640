//! The `/upload` command pipeline.
//!
//! Linear flow per invocation: validate sizes → stage locally → notify →
//! derive identifier/metadata → hand the blocking transfer to a worker
//! thread → report the outcome → remove the staged copies. Invocations
//! are independent; there is no shared mutable state and no retry.

use crate::staging::InvocationStaging;
use archivist_core::{
    describe_upload, identifier, ArchiveStore, AttachmentFetcher, AttachmentRef, Notify,
    StagedFile, UploadError, MAX_ATTACHMENT_BYTES,
};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Collaborators for the pipeline, injected by the composition root.
pub struct UploadDeps {
    pub store: Arc<dyn ArchiveStore>,
    pub fetcher: Arc<dyn AttachmentFetcher>,
    pub staging_root: PathBuf,
}

/// One `/upload` invocation: who asked, and the attachment slots they
/// filled, in slot order.
pub struct UploadRequest {
    pub username: String,
    pub attachments: Vec<AttachmentRef>,
}

/// Terminal state of an invocation. The user has already been notified by
/// the time this is returned; callers only log it.
#[derive(Debug)]
pub enum UploadOutcome {
    /// Validation or staging failed before any transfer was attempted.
    Rejected(UploadError),
    Completed { identifier: String },
    /// The archival transfer itself failed; reason already relayed.
    TransferFailed(String),
}

/// Run one invocation end to end. Every staged file is removed before
/// this returns, whatever the outcome.
pub async fn run_upload(
    deps: &UploadDeps,
    notify: &dyn Notify,
    request: UploadRequest,
) -> UploadOutcome {
    if request.attachments.is_empty() {
        // Unreachable in practice: the command definition requires file1.
        notify_user(notify, "No files attached. Please provide at least one file.").await;
        return UploadOutcome::Rejected(UploadError::NoAttachments);
    }

    let staging = InvocationStaging::new(&deps.staging_root);
    let mut staged: Vec<StagedFile> = Vec::with_capacity(request.attachments.len());

    for (index, attachment) in request.attachments.iter().enumerate() {
        match stage_one(deps, &staging, index, attachment).await {
            Ok(file) => staged.push(file),
            Err(e) => {
                // One bad attachment aborts the whole batch; files staged
                // before it are removed before reporting.
                staging.cleanup(&staged);
                notify_user(notify, &rejection_text(&e)).await;
                return UploadOutcome::Rejected(e);
            }
        }
    }

    let file_count = staged.len();
    notify_user(
        notify,
        &format!("Uploading {file_count} file(s) to Archive.org..."),
    )
    .await;

    let base = if file_count == 1 {
        identifier::filename_base(&request.attachments[0].filename)
    } else {
        identifier::username_base(&request.username)
    };
    let item_id = identifier::unique_identifier(&base, Local::now());
    let metadata = describe_upload(&request.username, &staged);

    info!(identifier = %item_id, files = file_count, user = %request.username, "Starting archive transfer");

    // The store call is blocking; run it on a worker thread and await so
    // other invocations keep dispatching.
    let store = Arc::clone(&deps.store);
    let task_id = item_id.clone();
    let task_files = staged.clone();
    let task_meta = metadata.clone();
    let result = tokio::task::spawn_blocking(move || store.upload(&task_id, &task_files, &task_meta))
        .await
        .unwrap_or_else(|e| Err(UploadError::Transfer(format!("upload task panicked: {e}"))));

    let outcome = match result {
        Ok(()) => {
            let url = identifier::details_url(&item_id);
            let text = if file_count == 1 {
                format!("File successfully uploaded to Archive.org! [View it here]({url})")
            } else {
                format!("Files successfully uploaded to Archive.org! [View them here]({url})")
            };
            notify_user(notify, &text).await;
            UploadOutcome::Completed {
                identifier: item_id,
            }
        }
        Err(e) => {
            error!(identifier = %item_id, error = %e, "Archive transfer failed");
            notify_user(notify, &format!("An error occurred during upload: {e}")).await;
            UploadOutcome::TransferFailed(e.to_string())
        }
    };

    staging.cleanup(&staged);
    outcome
}

/// Size-check then stage a single attachment. The check runs before any
/// bytes move, so an oversized file costs nothing.
async fn stage_one(
    deps: &UploadDeps,
    staging: &InvocationStaging,
    index: usize,
    attachment: &AttachmentRef,
) -> Result<StagedFile, UploadError> {
    if attachment.size > MAX_ATTACHMENT_BYTES {
        return Err(UploadError::AttachmentTooLarge {
            filename: attachment.filename.clone(),
        });
    }
    let bytes = deps.fetcher.fetch(attachment).await?;
    staging.write(index, &attachment.filename, &bytes).await
}

fn rejection_text(error: &UploadError) -> String {
    match error {
        UploadError::AttachmentTooLarge { filename } => {
            format!("File `{filename}` exceeds the 100MB limit.")
        }
        other => format!("Could not prepare the attached files: {other}"),
    }
}

async fn notify_user(notify: &dyn Notify, text: &str) {
    if let Err(e) = notify.send(text).await {
        warn!(error = %e, "Failed to deliver status message");
    }
}
