//! Error types for SMS parsing operations.

use thiserror::Error;

/// Errors that can occur while extracting notice parameters from SMS text.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// No http/https URL was found anywhere in the input text.
    #[error(
        "no http(s):// URL found in the input text\n  Suggestion: Paste the full SMS including the link"
    )]
    NoUrlFound,

    /// A URL was found but could not be parsed.
    #[error("invalid URL '{url}': {reason}\n  Suggestion: Check that the link was copied completely")]
    InvalidUrl {
        /// The URL that failed validation.
        url: String,
        /// Why the URL is invalid.
        reason: String,
    },

    /// The URL parsed but one or more required parameters are absent.
    ///
    /// Extraction is all-or-nothing: a URL missing any required parameter
    /// yields this error, never a partial result.
    #[error(
        "URL '{url}' is missing required parameters: {}\n  Suggestion: Use the unmodified link from the court SMS",
        missing.join(", ")
    )]
    MissingParams {
        /// The URL that was examined.
        url: String,
        /// Names of the parameters that were not found.
        missing: Vec<&'static str>,
    },
}

impl ParseError {
    /// Creates an `InvalidUrl` error for a malformed URL.
    #[must_use]
    pub fn malformed(url: &str, parse_error: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: parse_error.to_string(),
        }
    }

    /// Creates a `MissingParams` error listing every absent parameter.
    #[must_use]
    pub fn missing_params(url: &str, missing: Vec<&'static str>) -> Self {
        Self::MissingParams {
            url: url.to_string(),
            missing,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_no_url_message() {
        let msg = ParseError::NoUrlFound.to_string();
        assert!(msg.contains("no http(s)"), "should mention missing URL");
        assert!(msg.contains("Suggestion"), "should carry a suggestion");
    }

    #[test]
    fn test_parse_error_malformed_message() {
        let err = ParseError::malformed("http://[bad", "invalid host");
        let msg = err.to_string();
        assert!(msg.contains("http://[bad"), "should contain URL");
        assert!(msg.contains("invalid host"), "should contain reason");
    }

    #[test]
    fn test_parse_error_missing_params_lists_all() {
        let err = ParseError::missing_params("https://example.com/?qdbh=1", vec!["sdbh", "sdsin"]);
        let msg = err.to_string();
        assert!(msg.contains("sdbh"), "should name first missing param");
        assert!(msg.contains("sdsin"), "should name second missing param");
        assert!(!msg.contains("qdbh,"), "present params are not listed");
    }

    #[test]
    fn test_parse_error_clone() {
        let err = ParseError::malformed("bad-url", "parse error");
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
