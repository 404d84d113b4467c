//! HTTP response handling with Pipedrive-specific extensions.

use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};

/// Wrapper around an HTTP response with additional functionality.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    /// Create a new Response from a reqwest::Response.
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        let status = self.status();
        (200..300).contains(&status)
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Get the Retry-After header as a Duration.
    pub fn retry_after(&self) -> Option<Duration> {
        let value = self.header("retry-after")?;

        // Pipedrive sends Retry-After in seconds
        value.parse::<u64>().ok().map(Duration::from_secs)
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get rate limit state from the `x-ratelimit-*` response headers.
    ///
    /// Surfaced as data only; the client never waits on it.
    pub fn rate_limit(&self) -> Option<RateLimit> {
        let limit = self.header("x-ratelimit-limit")?.parse().ok()?;
        let remaining = self.header("x-ratelimit-remaining")?.parse().ok()?;
        let reset = self
            .header("x-ratelimit-reset")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs);

        Some(RateLimit {
            limit,
            remaining,
            reset,
        })
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Get the response body as bytes.
    pub async fn bytes(self) -> Result<bytes::Bytes> {
        self.inner.bytes().await.map_err(Into::into)
    }

    /// Deserialize the response body as JSON.
    ///
    /// Decode failures are classified: broken JSON maps to `Decode`, shape
    /// mismatches map to `TypeMismatch`.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Error::decode)
    }

    /// Get access to the inner reqwest::Response.
    pub fn into_inner(self) -> reqwest::Response {
        self.inner
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed per window.
    pub limit: u64,
    /// Requests remaining in the current window.
    pub remaining: u64,
    /// Time until the window resets.
    pub reset: Option<Duration>,
}

impl RateLimit {
    /// Returns true if the current window is exhausted.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Extension trait for processing Pipedrive API responses.
pub trait ResponseExt {
    /// Check for a Pipedrive API error and convert to the appropriate error type.
    fn check_api_error(self) -> impl std::future::Future<Output = Result<Response>> + Send;
}

impl ResponseExt for Response {
    async fn check_api_error(self) -> Result<Response> {
        let status = self.status();

        if self.is_success() {
            return Ok(self);
        }

        if status == 429 {
            let retry_after = self.retry_after();
            return Err(Error::new(ErrorKind::RateLimited { retry_after }));
        }

        let body = self.text().await.unwrap_or_default();
        Err(parse_error_response(status, &body))
    }
}

/// Parse an error response body and convert to the appropriate error kind.
fn parse_error_response(status: u16, body: &str) -> Error {
    // The API reports failures as {"success":false,"error":...,"error_info":...}
    if let Ok(err) = serde_json::from_str::<ApiErrorResponse>(body) {
        if let Some(message) = err.error {
            return Error::new(ErrorKind::Api {
                message,
                error_info: err.error_info,
            });
        }
    }

    let message = truncate_message(body);
    let kind = match status {
        401 => ErrorKind::Authentication(message),
        403 => ErrorKind::Authorization(message),
        404 => ErrorKind::NotFound(message),
        _ => ErrorKind::Http { status, message },
    };

    Error::new(kind)
}

/// Bound the amount of raw body text carried inside an error.
fn truncate_message(body: &str) -> String {
    const MAX_LENGTH: usize = 500;

    if body.len() > MAX_LENGTH {
        let mut truncated: String = body.chars().take(MAX_LENGTH).collect();
        truncated.push_str("...[truncated]");
        truncated
    } else {
        body.to_string()
    }
}

/// Pipedrive API error response format.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    #[allow(dead_code)]
    success: bool,
    error: Option<String>,
    error_info: Option<String>,
}
