//! HTTP client wrapper for the two download paths.
//!
//! The client exposes the fetch path ([`HttpClient::fetch_document`]), which
//! rejects HTML error pages, buffers the response body, and surfaces every
//! failure, and the direct-save
//! trigger ([`HttpClient::dispatch_save`]), which mirrors the original
//! anchor-click fallback: once dispatch succeeds, later transport or write
//! problems are logged but never change the outcome.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument, warn};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client for file downloads.
///
/// Designed to be created once and reused for multiple downloads, taking
/// advantage of connection pooling.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// A response body buffered by the fetch path, together with the declared
/// content type. Owned by the `download_file` call that created it and
/// released when that call returns.
#[derive(Debug)]
pub(crate) struct FetchedDocument {
    /// The complete response body.
    pub bytes: Vec<u8>,
    /// The declared `Content-Type`, when the server sent one.
    pub content_type: Option<String>,
}

/// Source for a direct-save dispatch: the remote URL, or bytes the fetch
/// path already materialized in memory.
#[derive(Debug)]
pub(crate) enum SaveSource<'a> {
    /// Stream from the remote URL, best effort.
    Remote(&'a str),
    /// Write an in-memory buffer.
    Bytes(&'a [u8]),
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large files)
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetch path: GET the URL, require a success status and a non-HTML
    /// content type, and buffer the whole body in memory.
    ///
    /// Unlike the direct-save trigger, every failure here is surfaced. The
    /// engine uses these errors to decide when to fall back.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the request fails
    /// (network error, timeout), the server returns a non-success status,
    /// the response declares an HTML content type (likely an error page
    /// where a document was expected), or reading the body fails.
    #[instrument(skip(self), fields(url = %url))]
    pub(crate) async fn fetch_document(&self, url: &str) -> Result<FetchedDocument, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(std::string::ToString::to_string);

        if let Some(ct) = content_type.as_deref()
            && is_html_content_type(ct)
        {
            return Err(DownloadError::html_content(url, ct));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::network(url, e))?
            .to_vec();

        debug!(bytes = bytes.len(), content_type = ?content_type, "fetch path buffered body");

        Ok(FetchedDocument {
            bytes,
            content_type,
        })
    }

    /// Direct-save trigger: best-effort save of `source` to `dest`.
    ///
    /// This deliberately preserves the weak guarantee of the original
    /// anchor-click fallback: it can only observe whether the save was
    /// *dispatched*, not whether it completed. An error is returned only
    /// when dispatch itself fails — the URL is malformed or the output file
    /// cannot be created. Anything after that point (connection failures,
    /// error statuses, interrupted streams, write errors) is logged at warn
    /// level and still counts as a successful dispatch.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::InvalidUrl`] for an unparseable remote source
    /// - [`DownloadError::Io`] when the output file cannot be created
    #[instrument(skip(self, source), fields(dest = %dest.display()))]
    pub(crate) async fn dispatch_save(
        &self,
        source: SaveSource<'_>,
        dest: &Path,
    ) -> Result<(), DownloadError> {
        match source {
            SaveSource::Bytes(bytes) => {
                let mut file = File::create(dest)
                    .await
                    .map_err(|e| DownloadError::io(dest, e))?;
                // Dispatched: the file exists. Write problems past this point
                // are logged, matching the trigger's documented guarantee.
                if let Err(e) = write_all_best_effort(&mut file, bytes).await {
                    warn!(error = %e, "write after dispatch failed");
                }
                Ok(())
            }
            SaveSource::Remote(url) => {
                Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
                let mut file = File::create(dest)
                    .await
                    .map_err(|e| DownloadError::io(dest, e))?;

                // Dispatched: everything below is best effort.
                let response = match self.client.get(url).send().await {
                    Ok(response) => response,
                    Err(e) => {
                        warn!(url = %url, error = %e, "direct save request failed after dispatch");
                        return Ok(());
                    }
                };

                debug!(status = response.status().as_u16(), "direct save streaming body");
                if let Err(e) = stream_best_effort(&mut file, response).await {
                    warn!(url = %url, error = %e, "direct save stream failed after dispatch");
                }
                Ok(())
            }
        }
    }

}

/// Whether a declared content type indicates an HTML page.
///
/// Only `text/html` is treated as a rejection signal. Other content types
/// (including `application/octet-stream` for misconfigured servers) are
/// accepted as-is.
fn is_html_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

/// Writes a buffer to a file and flushes it.
async fn write_all_best_effort(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).await?;
    writer.flush().await
}

/// Streams a response body to a file, ignoring the HTTP status entirely —
/// the direct-save path saves whatever the server answers with.
async fn stream_best_effort(
    file: &mut File,
    response: reqwest::Response,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        writer.write_all(&chunk).await?;
    }

    writer.flush().await?;
    Ok(())
}
