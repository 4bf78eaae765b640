//! Per-invocation staging area.
//!
//! Every invocation stages into its own directory under the staging root
//! (`{root}/{uuid}/{index:02}-{filename}`), so concurrent invocations
//! carrying identical filenames never overwrite each other. The directory
//! is removed on every exit path, success or failure.

use archivist_core::{StagedFile, UploadError};
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

pub struct InvocationStaging {
    dir: PathBuf,
}

impl InvocationStaging {
    pub fn new(root: &Path) -> Self {
        Self {
            dir: root.join(Uuid::new_v4().to_string()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist one attachment's bytes. `index` preserves slot order in
    /// the staged path; the original filename stays intact for metadata
    /// and the remote name.
    pub async fn write(
        &self,
        index: usize,
        filename: &str,
        bytes: &[u8],
    ) -> Result<StagedFile, UploadError> {
        // Strip any path components the platform let through.
        let base = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file");

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| staging_error(filename, e))?;

        let path = self.dir.join(format!("{index:02}-{base}"));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| staging_error(filename, e))?;

        Ok(StagedFile {
            path,
            original_name: filename.to_string(),
        })
    }

    /// Remove every staged file that still exists, then the invocation
    /// directory itself. Never fails; leftovers are only logged.
    pub fn cleanup(&self, files: &[StagedFile]) {
        for file in files {
            if file.path.exists() {
                if let Err(e) = std::fs::remove_file(&file.path) {
                    warn!(path = %file.path.display(), error = %e, "Failed to remove staged file");
                }
            }
        }
        if self.dir.exists() {
            if let Err(e) = std::fs::remove_dir(&self.dir) {
                warn!(dir = %self.dir.display(), error = %e, "Failed to remove staging directory");
            }
        }
    }
}

fn staging_error(filename: &str, source: std::io::Error) -> UploadError {
    UploadError::Staging {
        filename: filename.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("archivist-staging-test-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn writes_under_invocation_directory() {
        let root = temp_root();
        let staging = InvocationStaging::new(&root);

        let file = staging.write(0, "report.pdf", b"pdf bytes").await.unwrap();
        assert!(file.path.starts_with(staging.dir()));
        assert_eq!(file.original_name, "report.pdf");
        assert_eq!(std::fs::read(&file.path).unwrap(), b"pdf bytes");

        staging.cleanup(&[file]);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn duplicate_filenames_do_not_collide() {
        let root = temp_root();
        let staging = InvocationStaging::new(&root);

        let first = staging.write(0, "notes.txt", b"first").await.unwrap();
        let second = staging.write(1, "notes.txt", b"second").await.unwrap();
        assert_ne!(first.path, second.path);
        assert_eq!(std::fs::read(&first.path).unwrap(), b"first");
        assert_eq!(std::fs::read(&second.path).unwrap(), b"second");

        staging.cleanup(&[first, second]);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn cleanup_removes_files_and_directory() {
        let root = temp_root();
        let staging = InvocationStaging::new(&root);

        let file = staging.write(0, "a.bin", &[0u8; 16]).await.unwrap();
        assert!(file.path.exists());

        staging.cleanup(std::slice::from_ref(&file));
        assert!(!file.path.exists());
        assert!(!staging.dir().exists());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn path_components_in_filenames_are_stripped() {
        let root = temp_root();
        let staging = InvocationStaging::new(&root);

        let file = staging.write(0, "../../escape.txt", b"x").await.unwrap();
        assert!(file.path.starts_with(staging.dir()));
        assert!(file.path.ends_with("00-escape.txt"));

        staging.cleanup(std::slice::from_ref(&file));
        let _ = std::fs::remove_dir_all(&root);
    }
}
