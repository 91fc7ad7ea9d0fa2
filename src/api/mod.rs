//! Document-list client for the court service-of-process API.
//!
//! The [`ListClient`] posts the three notice parameters as a JSON body to a
//! fixed endpoint and maps the response's `data` array into
//! [`FileDescriptor`]s ready for the download engine.
//!
//! # Wire contract
//!
//! Request: `POST` with body `{"qdbh": ..., "sdbh": ..., "sdsin": ...}`
//! (exactly three keys) and `Content-Type: application/json`.
//!
//! Response: `{code: number, data: array, msg?: string}` — success means
//! `code == 200` with a list-typed `data`; anything else is an error.

mod error;

pub use error::ApiError;

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::download::filename::resolve_extension;
use crate::parser::NoticeParams;
use crate::user_agent;

/// Production endpoint for the document-list lookup.
pub const DEFAULT_ENDPOINT: &str =
    "https://zxfw.court.gov.cn/yzw/yzw-zxfw-sdfw/api/v1/sdfw/getWsListBySdbhNew";

/// Request timeout for the list call (small JSON payload, no large bodies).
const API_TIMEOUT_SECS: u64 = 30;

/// One raw entry from the API's `data` array.
///
/// Field names mirror the wire format; all are optional on the wire and the
/// descriptor mapping applies the documented fallbacks.
#[derive(Debug, Deserialize)]
struct WsListEntry {
    /// Display name of the document.
    #[serde(default)]
    c_wsmc: Option<String>,
    /// File extension, when the server provides one.
    #[serde(default)]
    c_wjgs: Option<String>,
    /// Source URL of the file. Required for downloading.
    #[serde(default)]
    wjlj: Option<String>,
}

/// A downloadable file resolved from one list entry.
///
/// Immutable once produced; replaced wholesale on each new parse cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Human-readable document name (placeholder when the API omits one).
    pub display_name: String,
    /// File extension without a leading dot; never empty.
    pub extension: String,
    /// URL the file is downloaded from.
    pub source_url: String,
}

impl FileDescriptor {
    /// Maps a raw list entry to a descriptor.
    ///
    /// Returns `None` when the entry has no usable `wjlj` URL — such entries
    /// cannot be downloaded and are dropped rather than failing the list.
    /// Extension precedence: explicit `c_wjgs`, then the extension sniffed
    /// from the URL path, then the generic `file` placeholder.
    fn from_entry(index: usize, entry: WsListEntry) -> Option<Self> {
        let source_url = entry
            .wjlj
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())?;

        let display_name = entry
            .c_wsmc
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("document_{}", index + 1));

        let extension = resolve_extension(entry.c_wjgs.as_deref(), &source_url);

        Some(Self {
            display_name,
            extension,
            source_url,
        })
    }

    /// The filename a download of this descriptor is saved under.
    #[must_use]
    pub fn full_filename(&self) -> String {
        format!("{}.{}", self.display_name, self.extension)
    }
}

/// HTTP client for the document-list endpoint.
///
/// Create once and reuse; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ListClient {
    client: Client,
    endpoint: String,
}

impl Default for ListClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ListClient {
    /// Creates a client against the production endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    /// This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Creates a client against a custom endpoint (used by tests with wiremock).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Fetches the document list for one notice.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] / [`ApiError::Timeout`] on transport failure
    /// - [`ApiError::HttpStatus`] on a non-success HTTP status
    /// - [`ApiError::MalformedResponse`] when the body is not valid JSON,
    ///   lacks a numeric `code`, or `data` is not a list
    /// - [`ApiError::Failure`] when the API reports `code != 200`
    #[instrument(skip(self, params), fields(endpoint = %self.endpoint))]
    pub async fn fetch_file_list(
        &self,
        params: &NoticeParams,
    ) -> Result<Vec<FileDescriptor>, ApiError> {
        debug!("requesting document list");

        let response = self
            .client
            .post(&self.endpoint)
            .json(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout
                } else {
                    ApiError::Network { source: e }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::http_status(status.as_u16(), &body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ApiError::malformed(format!("body is not valid JSON: {e}")))?;

        let code = payload
            .get("code")
            .and_then(Value::as_i64)
            .ok_or_else(|| ApiError::malformed("missing numeric 'code' field"))?;

        if code != 200 {
            let msg = payload.get("msg").and_then(Value::as_str);
            return Err(ApiError::failure(code, msg));
        }

        let data = payload
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::malformed("'data' is not a list"))?;

        let mut files = Vec::with_capacity(data.len());
        for (index, raw) in data.iter().enumerate() {
            let entry: WsListEntry = serde_json::from_value(raw.clone())
                .map_err(|e| ApiError::malformed(format!("list entry {index}: {e}")))?;
            match FileDescriptor::from_entry(index, entry) {
                Some(file) => files.push(file),
                None => warn!(index, "list entry has no source URL, skipping"),
            }
        }

        debug!(files = files.len(), "document list fetched");
        Ok(files)
    }
}
