//! Error types for the Venice.ai client.

use std::time::Duration;

/// Errors that can occur while talking to the Venice.ai API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// API key missing or rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned a non-2xx response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Insufficient credits or quota exhausted.
    #[error("billing error: {0}")]
    Billing(String),

    /// Rate limit exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// Optional poll deadline exceeded.
    #[error("gave up waiting after {0:?}")]
    Timeout(Duration),

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g. saving a file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Video job ended in a terminal non-success status.
    #[error("video generation failed: {0}")]
    VideoGeneration(String),

    /// Response had an unexpected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Result type alias for Venice.ai operations.
pub type Result<T> = std::result::Result<T, Error>;

const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Trims an API error body down to something fit for a terminal.
///
/// Gateways occasionally return whole HTML error pages; those collapse to a
/// generic message instead of 50 lines of markup.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "(empty error body)".into();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with("<!doctype") || lower.starts_with("<html") {
        return "(HTML error page)".into();
    }
    if trimmed.len() > MAX_ERROR_MESSAGE_LEN {
        let mut end = MAX_ERROR_MESSAGE_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        return format!("{}...", &trimmed[..end]);
    }
    trimmed.to_string()
}

/// Parses a `Retry-After` header value as whole seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    #[test]
    fn test_error_display() {
        let err = Error::Api {
            status: 404,
            message: "Not found".into(),
        };
        assert_eq!(err.to_string(), "API error: 404 - Not found");

        let err = Error::ContentBlocked("Safety filter triggered".into());
        assert_eq!(err.to_string(), "content blocked: Safety filter triggered");

        let err = Error::VideoGeneration("CONTENT_VIOLATION".into());
        assert_eq!(
            err.to_string(),
            "video generation failed: CONTENT_VIOLATION"
        );
    }

    #[test]
    fn test_sanitize_empty_body() {
        assert_eq!(sanitize_error_message("   "), "(empty error body)");
    }

    #[test]
    fn test_sanitize_html_body() {
        assert_eq!(
            sanitize_error_message("<html><body>502 Bad Gateway</body></html>"),
            "(HTML error page)"
        );
        assert_eq!(
            sanitize_error_message("<!DOCTYPE html><html></html>"),
            "(HTML error page)"
        );
    }

    #[test]
    fn test_sanitize_truncates_long_body() {
        let long = "x".repeat(2000);
        let sanitized = sanitize_error_message(&long);
        assert!(sanitized.len() <= MAX_ERROR_MESSAGE_LEN + 3);
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn test_sanitize_passthrough() {
        assert_eq!(
            sanitize_error_message("  invalid model id  "),
            "invalid model id"
        );
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        assert_eq!(parse_retry_after(&headers), Some(30));
    }

    #[test]
    fn test_parse_retry_after_absent_or_http_date() {
        let headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        // HTTP-date form is not supported; treated as absent
        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }
}
