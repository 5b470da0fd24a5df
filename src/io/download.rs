//! Streaming download with SHA-256 verification.

use std::path::Path;

use futures::StreamExt;
use reqwest::Client;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::types::Sha256Hash;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: Sha256Hash,
        actual: String,
    },
}

/// Stream `url` into `dest`, hashing as bytes arrive.
///
/// When `expected` is given, a digest mismatch removes the partial file
/// and fails; nothing is retried. Returns the hex digest of what was
/// written.
pub async fn download_and_verify(
    client: &Client,
    url: &str,
    dest: &Path,
    expected: Option<&Sha256Hash>,
) -> Result<String, DownloadError> {
    let response = client.get(url).send().await?.error_for_status()?;

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut hasher = Sha256::new();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        hasher.update(&chunk);
        downloaded += chunk.len() as u64;
    }

    file.flush().await?;
    let actual = hex::encode(hasher.finalize());
    tracing::debug!(url, bytes = downloaded, digest = %actual, "download complete");

    if let Some(expected) = expected {
        if actual != expected.as_str() {
            tokio::fs::remove_file(dest).await.ok();
            return Err(DownloadError::ChecksumMismatch {
                url: url.to_string(),
                expected: expected.clone(),
                actual,
            });
        }
    }

    Ok(actual)
}
