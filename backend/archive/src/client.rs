//! Blocking archive.org S3 client.
//!
//! Required credentials: an IA-S3 access/secret key pair (from
//! https://archive.org/account/s3.php), sent as `authorization: LOW
//! access:secret` on every request.

use anyhow::{Context, Result};
use archivist_core::{ArchiveStore, StagedFile, UploadError, UploadMetadata};
use reqwest::blocking::{Body, Client};
use std::fs::File;
use tracing::{debug, info};

/// Default S3-compatible endpoint for archive.org.
pub const DEFAULT_ENDPOINT: &str = "https://s3.us.archive.org";

/// IA-S3 key pair.
#[derive(Debug, Clone)]
pub struct IaCredentials {
    pub access_key: String,
    pub secret_key: String,
}

/// Blocking uploader for archive.org items.
pub struct IaS3Client {
    http: Client,
    credentials: IaCredentials,
    endpoint: String,
}

impl IaS3Client {
    pub fn new(credentials: IaCredentials) -> Result<Self> {
        Self::with_endpoint(credentials, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(credentials: IaCredentials, endpoint: impl Into<String>) -> Result<Self> {
        // Attachments run up to 100 MiB; the default 30s request timeout
        // would cut large transfers short.
        let http = Client::builder()
            .timeout(None)
            .build()
            .context("Failed to build HTTP client for archive.org")?;
        Ok(Self {
            http,
            credentials,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    fn object_url(&self, identifier: &str, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint,
            identifier,
            urlencoding::encode(name)
        )
    }

    fn authorization(&self) -> String {
        format!(
            "LOW {}:{}",
            self.credentials.access_key, self.credentials.secret_key
        )
    }
}

impl ArchiveStore for IaS3Client {
    fn upload(
        &self,
        identifier: &str,
        files: &[StagedFile],
        metadata: &UploadMetadata,
    ) -> Result<(), UploadError> {
        for (index, file) in files.iter().enumerate() {
            let url = self.object_url(identifier, &file.original_name);
            debug!(url = %url, "Putting file to archive.org");

            let body = File::open(&file.path)
                .map(Body::from)
                .map_err(|e| UploadError::Staging {
                    filename: file.original_name.clone(),
                    source: e,
                })?;

            let mut request = self
                .http
                .put(&url)
                .header("authorization", self.authorization())
                .body(body);

            // The first PUT creates the item bucket and carries the
            // item-level metadata.
            if index == 0 {
                request = request.header("x-archive-auto-make-bucket", "1");
                for (key, value) in metadata.pairs() {
                    request = request.header(
                        format!("x-archive-meta-{key}").as_str(),
                        meta_header_value(value),
                    );
                }
            }

            let response = request
                .send()
                .map_err(|e| UploadError::Transfer(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                let detail = response.text().unwrap_or_default();
                return Err(UploadError::Transfer(format!(
                    "archive.org returned {} for `{}`: {}",
                    status,
                    file.original_name,
                    detail.trim()
                )));
            }
        }

        info!(identifier = %identifier, files = files.len(), "Archive.org transfer complete");
        Ok(())
    }
}

/// HTTP header values cannot carry newlines or non-ASCII; the IA S3 API
/// accepts `uri(<percent-encoded>)` for those (multi-line descriptions in
/// particular).
fn meta_header_value(value: &str) -> String {
    if value.is_ascii() && !value.contains(['\n', '\r']) {
        value.to_string()
    } else {
        format!("uri({})", urlencoding::encode(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> IaS3Client {
        IaS3Client::new(IaCredentials {
            access_key: "AKEY".into(),
            secret_key: "SKEY".into(),
        })
        .unwrap()
    }

    #[test]
    fn object_url_encodes_remote_name() {
        let c = client();
        assert_eq!(
            c.object_url("my_video.mp4-20250314092653", "My Video.MP4"),
            "https://s3.us.archive.org/my_video.mp4-20250314092653/My%20Video.MP4"
        );
    }

    #[test]
    fn authorization_uses_low_scheme() {
        assert_eq!(client().authorization(), "LOW AKEY:SKEY");
    }

    #[test]
    fn plain_ascii_metadata_passes_through() {
        assert_eq!(meta_header_value("report.pdf"), "report.pdf");
    }

    #[test]
    fn multiline_metadata_is_uri_encoded() {
        let encoded = meta_header_value("line one\nline two");
        assert!(encoded.starts_with("uri("));
        assert!(encoded.contains("line%20one%0Aline%20two"));
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let c = IaS3Client::with_endpoint(
            IaCredentials {
                access_key: "a".into(),
                secret_key: "s".into(),
            },
            "http://localhost:9000/",
        )
        .unwrap();
        assert_eq!(c.object_url("item", "f.txt"), "http://localhost:9000/item/f.txt");
    }
}
