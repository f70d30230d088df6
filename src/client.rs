//! Venice.ai API client and builder.

use crate::error::{parse_retry_after, sanitize_error_message, Error, Result};
use serde::Serialize;
use std::time::Duration;

/// Default API base endpoint.
pub const API_BASE: &str = "https://api.venice.ai/api/v1";

/// Environment variable consulted when no API key is given explicitly.
pub const API_KEY_ENV: &str = "VENICE_API_KEY";

/// Builder for [`VeniceClient`].
#[derive(Debug, Clone, Default)]
pub struct VeniceClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl VeniceClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to the `VENICE_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the client, resolving the API key.
    ///
    /// The credential is resolved exactly once here; a missing key fails
    /// before any network call is attempted.
    pub fn build(self) -> Result<VeniceClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
            .ok_or_else(|| {
                Error::Auth(format!("{API_KEY_ENV} not set and no API key provided"))
            })?;

        Ok(VeniceClient {
            client: reqwest::Client::new(),
            api_key,
            base_url: self
                .base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| API_BASE.to_string()),
        })
    }
}

/// Client for the Venice.ai media generation API.
///
/// Owns the HTTP connection and the bearer credential. All image and video
/// operations are methods on this type.
#[derive(Debug, Clone)]
pub struct VeniceClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl VeniceClient {
    /// Creates a new [`VeniceClientBuilder`].
    pub fn builder() -> VeniceClientBuilder {
        VeniceClientBuilder::new()
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POSTs a JSON body and returns the raw response for the caller to
    /// interpret. Non-2xx statuses are mapped to an [`Error`] here.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        self.check_status(response).await
    }

    /// POSTs a multipart form and returns the raw response.
    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        self.check_status(response).await
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let headers = response.headers().clone();
        let text = response.text().await.unwrap_or_default();
        Err(parse_error(status.as_u16(), &text, &headers))
    }
}

/// Maps a non-2xx HTTP response to the error taxonomy.
pub(crate) fn parse_error(status: u16, text: &str, headers: &reqwest::header::HeaderMap) -> Error {
    let text = sanitize_error_message(text);
    if status == 401 || status == 403 {
        return Error::Auth(text);
    }
    if status == 402 {
        return Error::Billing(text);
    }
    if status == 422 || status == 400 {
        return Error::InvalidRequest(text);
    }
    if status == 429 {
        if text.contains("insufficient") && text.contains("balance") {
            return Error::Billing(text);
        }
        let retry_after = parse_retry_after(headers).map(Duration::from_secs);
        return Error::RateLimited { retry_after };
    }
    let lower = text.to_lowercase();
    if lower.contains("safety")
        || lower.contains("blocked")
        || lower.contains("content_policy")
        || lower.contains("moderated")
    {
        return Error::ContentBlocked(text);
    }
    Error::Api {
        status,
        message: text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_with_explicit_key() {
        let client = VeniceClientBuilder::new().api_key("vv-test").build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_builder_missing_key() {
        // Clear the env var if it exists, then check the builder fails;
        // an explicitly empty key must not mask a missing credential either
        let saved = std::env::var(API_KEY_ENV).ok();
        std::env::remove_var(API_KEY_ENV);

        let result = VeniceClientBuilder::new().build();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(
            err.to_string().contains(API_KEY_ENV),
            "error should mention {API_KEY_ENV}: {err}"
        );
        assert!(matches!(err, Error::Auth(_)));

        let result = VeniceClientBuilder::new().api_key("").build();
        assert!(result.is_err());

        if let Some(val) = saved {
            std::env::set_var(API_KEY_ENV, val);
        }
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = VeniceClientBuilder::new()
            .api_key("vv-test")
            .base_url("https://example.com/api/")
            .build()
            .unwrap();
        assert_eq!(
            client.endpoint("/image/generate"),
            "https://example.com/api/image/generate"
        );
    }

    #[test]
    fn test_default_base_url() {
        let client = VeniceClientBuilder::new()
            .api_key("vv-test")
            .build()
            .unwrap();
        assert_eq!(
            client.endpoint("/video/quote"),
            "https://api.venice.ai/api/v1/video/quote"
        );
    }

    // -- parse_error mapping --

    #[test]
    fn test_parse_error_auth() {
        let headers = reqwest::header::HeaderMap::new();
        assert!(matches!(
            parse_error(401, "Unauthorized", &headers),
            Error::Auth(_)
        ));
        assert!(matches!(
            parse_error(403, "Forbidden", &headers),
            Error::Auth(_)
        ));
    }

    #[test]
    fn test_parse_error_billing() {
        let headers = reqwest::header::HeaderMap::new();
        assert!(matches!(
            parse_error(402, "Payment required", &headers),
            Error::Billing(_)
        ));
    }

    #[test]
    fn test_parse_error_invalid_request() {
        let headers = reqwest::header::HeaderMap::new();
        assert!(matches!(
            parse_error(422, "bad duration", &headers),
            Error::InvalidRequest(_)
        ));
        assert!(matches!(
            parse_error(400, "unknown model", &headers),
            Error::InvalidRequest(_)
        ));
    }

    #[test]
    fn test_parse_error_rate_limited_with_hint() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::RETRY_AFTER,
            reqwest::header::HeaderValue::from_static("15"),
        );
        match parse_error(429, "Too Many Requests", &headers) {
            Error::RateLimited { retry_after } => {
                assert_eq!(retry_after, Some(Duration::from_secs(15)));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_429_insufficient_balance_is_billing() {
        let headers = reqwest::header::HeaderMap::new();
        assert!(matches!(
            parse_error(429, "insufficient USD balance", &headers),
            Error::Billing(_)
        ));
    }

    #[test]
    fn test_parse_error_content_blocked() {
        let headers = reqwest::header::HeaderMap::new();
        assert!(matches!(
            parse_error(500, "request blocked by safety filter", &headers),
            Error::ContentBlocked(_)
        ));
    }

    #[test]
    fn test_parse_error_generic() {
        let headers = reqwest::header::HeaderMap::new();
        assert!(matches!(
            parse_error(500, "Internal Server Error", &headers),
            Error::Api { status: 500, .. }
        ));
    }
}
