//! `archivist-archive` — Internet Archive upload client.
//!
//! Speaks the archive.org S3-compatible API (`s3.us.archive.org`): one
//! HTTP PUT per file into the item bucket, with item metadata carried as
//! `x-archive-meta-*` headers on the first PUT. No retry, no multipart.

pub mod client;

pub use client::{IaCredentials, IaS3Client, DEFAULT_ENDPOINT};
