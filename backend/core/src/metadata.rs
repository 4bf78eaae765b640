//! Upload metadata construction.

use crate::types::{StagedFile, UploadMetadata};

const SCANNER: &str = "Discord Bot Upload";
const COLLECTION: &str = "opensource_media";

/// Build the item metadata for one invocation.
///
/// Single file: the filename carries the title and appears in the
/// description. Multiple files: generic title naming the user, with the
/// original basenames listed one per line in the description.
pub fn describe_upload(username: &str, files: &[StagedFile]) -> UploadMetadata {
    if let [only] = files {
        UploadMetadata {
            scanner: SCANNER.to_string(),
            collection: COLLECTION.to_string(),
            title: only.original_name.clone(),
            description: format!(
                "Uploaded via Discord bot by {}: {}",
                username, only.original_name
            ),
        }
    } else {
        let file_list = files
            .iter()
            .map(|f| f.original_name.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        UploadMetadata {
            scanner: SCANNER.to_string(),
            collection: COLLECTION.to_string(),
            title: format!("Files uploaded by {username}"),
            description: format!(
                "Uploaded via Discord bot by {username}.\n\nUploaded files:\n{file_list}"
            ),
        }
    }
}
