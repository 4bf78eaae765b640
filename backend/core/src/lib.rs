pub mod error;
pub mod identifier;
pub mod metadata;
pub mod traits;
pub mod types;

pub use error::UploadError;
pub use metadata::describe_upload;
pub use traits::{ArchiveStore, AttachmentFetcher, Notify};
pub use types::{AttachmentRef, StagedFile, UploadMetadata, MAX_ATTACHMENT_BYTES};
