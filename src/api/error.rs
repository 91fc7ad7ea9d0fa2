//! Error types for the document-list API client.

use thiserror::Error;

/// Errors that can occur while fetching the document list.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error calling list API: {source}")]
    Network {
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout calling list API")]
    Timeout,

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("list API returned HTTP {status}: {body_preview}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Leading bytes of the response body, for diagnostics.
        body_preview: String,
    },

    /// The response body did not match the expected `{code, data, msg}` shape.
    #[error("malformed list API response: {reason}")]
    MalformedResponse {
        /// What was wrong with the response.
        reason: String,
    },

    /// The API answered but reported an unsuccessful operation (`code != 200`).
    #[error("list API reported failure (code {code}): {msg}")]
    Failure {
        /// The application-level result code.
        code: i64,
        /// The server-provided message, or a placeholder when absent.
        msg: String,
    },
}

impl ApiError {
    /// Creates an HTTP status error, truncating the body to a short preview.
    pub fn http_status(status: u16, body: &str) -> Self {
        Self::HttpStatus {
            status,
            body_preview: body.chars().take(200).collect(),
        }
    }

    /// Creates a malformed-response error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Creates an application-level failure error.
    pub fn failure(code: i64, msg: Option<&str>) -> Self {
        Self::Failure {
            code,
            msg: msg.unwrap_or("unknown error").to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_http_status_truncates_body() {
        let long_body = "x".repeat(500);
        let err = ApiError::http_status(502, &long_body);
        match err {
            ApiError::HttpStatus { body_preview, .. } => {
                assert_eq!(body_preview.chars().count(), 200);
            }
            other => panic!("Expected HttpStatus, got: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_failure_display() {
        let err = ApiError::failure(500, Some("系统繁忙"));
        let msg = err.to_string();
        assert!(msg.contains("500"), "Expected code in: {msg}");
        assert!(msg.contains("系统繁忙"), "Expected server msg in: {msg}");
    }

    #[test]
    fn test_api_error_failure_placeholder_msg() {
        let err = ApiError::failure(403, None);
        assert!(err.to_string().contains("unknown error"));
    }

    #[test]
    fn test_api_error_malformed_display() {
        let err = ApiError::malformed("'data' is not a list");
        assert!(err.to_string().contains("'data' is not a list"));
    }
}
