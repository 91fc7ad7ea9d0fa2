//! Notice-parameter extraction from SMS text.
//!
//! Court notification SMS messages embed a link whose query string (or
//! hash-fragment query, for single-page-app routes like
//! `#/pagesAjkj/app/wssd/index?qdbh=...`) carries the three parameters the
//! document-list API requires.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use super::error::ParseError;

/// Regex pattern for finding URLs in text.
/// Matches http:// and https:// URLs, capturing until whitespace or common delimiters.
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'\]]+"#).expect("URL regex is valid") // Static pattern, safe to panic
});

/// The three query parameters every court-notice link must carry.
const REQUIRED_PARAMS: [&str; 3] = ["qdbh", "sdbh", "sdsin"];

/// Parameters identifying one court notice, as carried in the SMS link.
///
/// Serializes to exactly the three JSON keys the list API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeParams {
    /// Channel number (`qdbh`).
    pub qdbh: String,
    /// Service number (`sdbh`).
    pub sdbh: String,
    /// Service signature (`sdsin`).
    pub sdsin: String,
}

/// Extracts notice parameters from free-form SMS text.
///
/// Finds the first http/https URL in the input, then reads `qdbh`, `sdbh`
/// and `sdsin` from its query string. The parameters may live either in the
/// normal query position or inside a hash-fragment query; both are checked.
///
/// # Errors
///
/// - [`ParseError::NoUrlFound`] when the text contains no http(s) URL
/// - [`ParseError::InvalidUrl`] when the found URL cannot be parsed
/// - [`ParseError::MissingParams`] when any required parameter is absent
///   (never a partial result)
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn extract_notice_params(input: &str) -> Result<NoticeParams, ParseError> {
    // The first URL in the message is assumed to be the notice link.
    let Some(url_match) = URL_PATTERN.find(input) else {
        return Err(ParseError::NoUrlFound);
    };

    let raw_url = clean_url_trailing(url_match.as_str());
    trace!(url = %raw_url, "found URL candidate");

    let parsed = Url::parse(raw_url).map_err(|e| ParseError::malformed(raw_url, &e.to_string()))?;

    let pairs = query_pairs(&parsed);

    let mut missing = Vec::new();
    let mut values: [Option<String>; 3] = [None, None, None];
    for (i, name) in REQUIRED_PARAMS.iter().enumerate() {
        match pairs.iter().find(|(key, _)| key == name) {
            Some((_, value)) if !value.is_empty() => values[i] = Some(value.clone()),
            _ => missing.push(*name),
        }
    }

    if !missing.is_empty() {
        debug!(url = %raw_url, ?missing, "required parameters absent");
        return Err(ParseError::missing_params(raw_url, missing));
    }

    let [qdbh, sdbh, sdsin] = values;
    // All three are Some here; missing would have returned above.
    match (qdbh, sdbh, sdsin) {
        (Some(qdbh), Some(sdbh), Some(sdsin)) => {
            debug!(url = %raw_url, "notice parameters extracted");
            Ok(NoticeParams { qdbh, sdbh, sdsin })
        }
        _ => Err(ParseError::missing_params(
            raw_url,
            REQUIRED_PARAMS.to_vec(),
        )),
    }
}

/// Collects key/value pairs from the URL, preferring a hash-fragment query
/// (`#/route?key=value`) when one exists, otherwise the normal query string.
fn query_pairs(url: &Url) -> Vec<(String, String)> {
    if let Some(fragment) = url.fragment()
        && let Some(question) = fragment.find('?')
    {
        let hash_query = &fragment[question + 1..];
        return url::form_urlencoded::parse(hash_query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
    }

    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Cleans trailing punctuation that often gets captured with URLs embedded
/// in prose. SMS bodies are frequently Chinese, so full-width sentence
/// punctuation is stripped as well.
fn clean_url_trailing(url: &str) -> &str {
    let mut result = url;
    while let Some(last) = result.chars().last() {
        match last {
            '.' | ',' | ';' | ':' | '!' | '?' | ')' | ']' | '。' | '，' | '；' | '！' | '？'
            | '）' | '】' => {
                result = &result[..result.len() - last.len_utf8()];
            }
            _ => break,
        }
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LINK: &str =
        "https://zxfw.court.gov.cn/h5/index.html#/pagesAjkj/app/wssd/index?qdbh=Q1&sdbh=S2&sdsin=X3";

    // ==================== URL discovery ====================

    #[test]
    fn test_extract_no_url_in_plain_text() {
        let result = extract_notice_params("您有一份新的法律文书，请及时查收。");
        assert!(matches!(result, Err(ParseError::NoUrlFound)));
    }

    #[test]
    fn test_extract_empty_input() {
        let result = extract_notice_params("");
        assert!(matches!(result, Err(ParseError::NoUrlFound)));
    }

    #[test]
    fn test_extract_ignores_scheme_less_hosts() {
        let result = extract_notice_params("visit zxfw.court.gov.cn for details");
        assert!(matches!(result, Err(ParseError::NoUrlFound)));
    }

    #[test]
    fn test_extract_uses_first_url() {
        let input = format!("{LINK} 如无法打开请访问 https://example.com/help");
        let params = extract_notice_params(&input).unwrap();
        assert_eq!(params.qdbh, "Q1");
    }

    // ==================== Hash-query and query positions ====================

    #[test]
    fn test_extract_params_from_hash_query() {
        let params = extract_notice_params(LINK).unwrap();
        assert_eq!(params.qdbh, "Q1");
        assert_eq!(params.sdbh, "S2");
        assert_eq!(params.sdsin, "X3");
    }

    #[test]
    fn test_extract_params_from_search_query() {
        let input = "https://zxfw.court.gov.cn/sd?qdbh=a&sdbh=b&sdsin=c";
        let params = extract_notice_params(input).unwrap();
        assert_eq!(params.qdbh, "a");
        assert_eq!(params.sdbh, "b");
        assert_eq!(params.sdsin, "c");
    }

    #[test]
    fn test_extract_hash_query_wins_over_search_query() {
        // When both positions exist, the hash query is the SPA route's real query.
        let input = "https://host/index.html?qdbh=outer&sdbh=outer&sdsin=outer#/route?qdbh=in1&sdbh=in2&sdsin=in3";
        let params = extract_notice_params(input).unwrap();
        assert_eq!(params.qdbh, "in1");
        assert_eq!(params.sdsin, "in3");
    }

    #[test]
    fn test_extract_params_url_encoded_values_decoded() {
        let input = "https://host/sd?qdbh=a%2Fb&sdbh=s&sdsin=x";
        let params = extract_notice_params(input).unwrap();
        assert_eq!(params.qdbh, "a/b");
    }

    // ==================== Missing parameters ====================

    #[test]
    fn test_extract_missing_one_param_is_error() {
        let input = "https://host/sd?qdbh=a&sdbh=b";
        let result = extract_notice_params(input);
        match result {
            Err(ParseError::MissingParams { missing, .. }) => {
                assert_eq!(missing, vec!["sdsin"]);
            }
            other => panic!("Expected MissingParams, got: {other:?}"),
        }
    }

    #[test]
    fn test_extract_missing_all_params_lists_all() {
        let input = "https://host/sd?foo=bar";
        let result = extract_notice_params(input);
        match result {
            Err(ParseError::MissingParams { missing, .. }) => {
                assert_eq!(missing, vec!["qdbh", "sdbh", "sdsin"]);
            }
            other => panic!("Expected MissingParams, got: {other:?}"),
        }
    }

    #[test]
    fn test_extract_empty_param_value_counts_as_missing() {
        let input = "https://host/sd?qdbh=&sdbh=b&sdsin=c";
        let result = extract_notice_params(input);
        match result {
            Err(ParseError::MissingParams { missing, .. }) => {
                assert_eq!(missing, vec!["qdbh"]);
            }
            other => panic!("Expected MissingParams, got: {other:?}"),
        }
    }

    #[test]
    fn test_extract_never_returns_partial_result() {
        // Either all three parameters or an error; no intermediate state exists
        // in the return type, so missing-parameter inputs must error.
        for input in [
            "https://host/sd?qdbh=a",
            "https://host/sd?sdbh=b&sdsin=c",
            "https://host/sd#/route?sdsin=c",
        ] {
            assert!(extract_notice_params(input).is_err(), "input: {input}");
        }
    }

    // ==================== Trailing punctuation ====================

    #[test]
    fn test_extract_strips_trailing_ascii_punctuation() {
        let input = format!("see {LINK}.");
        let params = extract_notice_params(&input).unwrap();
        assert_eq!(params.sdsin, "X3");
    }

    #[test]
    fn test_extract_strips_trailing_fullwidth_punctuation() {
        let input = format!("请点击{LINK}。");
        let params = extract_notice_params(&input).unwrap();
        assert_eq!(params.sdsin, "X3");
    }

    // ==================== Serialization contract ====================

    #[test]
    fn test_notice_params_serialize_exact_three_keys() {
        let params = NoticeParams {
            qdbh: "q".to_string(),
            sdbh: "s".to_string(),
            sdsin: "x".to_string(),
        };
        let value = serde_json::to_value(&params).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3, "body must carry exactly three keys");
        assert_eq!(obj["qdbh"], "q");
        assert_eq!(obj["sdbh"], "s");
        assert_eq!(obj["sdsin"], "x");
    }
}
