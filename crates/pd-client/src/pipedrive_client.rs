//! High-level Pipedrive client with typed HTTP methods.
//!
//! This module provides `PipedriveClient`, which combines the immutable
//! client configuration (base URL + API token) with an HTTP client and
//! provides typed JSON methods for API interactions.
//!
//! ## Security
//!
//! The API token is redacted in Debug output and skipped in tracing spans.

use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::RequestBuilder;
use crate::response::Response;
use crate::DEFAULT_BASE_URL;

/// High-level Pipedrive API client.
///
/// Holds read-only configuration for its lifetime; cloning is cheap and the
/// client can be shared freely across tasks.
///
/// # Example
///
/// ```rust,ignore
/// use pipedrive_client::PipedriveClient;
///
/// let client = PipedriveClient::from_token("api-token")?;
///
/// // GET with typed response
/// let deals: serde_json::Value = client.get_json("/deals").await?;
/// ```
#[derive(Clone)]
pub struct PipedriveClient {
    http: HttpClient,
    base_url: String,
    api_token: String,
}

impl std::fmt::Debug for PipedriveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipedriveClient")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl PipedriveClient {
    /// Create a new client with the given base URL and API token.
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Result<Self> {
        Self::with_config(base_url, api_token, ClientConfig::default())
    }

    /// Create a new client against the default API base URL.
    pub fn from_token(api_token: impl Into<String>) -> Result<Self> {
        Self::new(DEFAULT_BASE_URL, api_token)
    }

    /// Create a new client with custom configuration.
    pub fn with_config(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::new(ErrorKind::Config(
                "base URL is not set".to_string(),
            )));
        }
        url::Url::parse(&base_url)?;

        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::new(ErrorKind::Config(
                "API token is not set".to_string(),
            )));
        }

        let http = HttpClient::new(config)?;
        Ok(Self {
            http,
            base_url,
            api_token,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the API token.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Build the full URL for a path.
    ///
    /// If the path starts with `http://` or `https://`, it is used as-is.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // =========================================================================
    // Base HTTP Methods (with authentication)
    // =========================================================================

    /// Create a GET request builder with the API token attached.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path)).api_token(&self.api_token)
    }

    /// Create a POST request builder with the API token attached.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path)).api_token(&self.api_token)
    }

    /// Create a PUT request builder with the API token attached.
    pub fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path)).api_token(&self.api_token)
    }

    /// Create a DELETE request builder with the API token attached.
    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path)).api_token(&self.api_token)
    }

    /// Execute a request and return the raw response.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        self.http.execute(request).await
    }

    // =========================================================================
    // Typed JSON Methods
    // =========================================================================

    /// GET request with JSON response deserialization.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.http.send_json(self.get(path)).await
    }

    /// GET request with query options and JSON response.
    #[instrument(skip(self, opts), fields(path = %path))]
    pub async fn get_json_with_options<T: DeserializeOwned, O: Serialize>(
        &self,
        path: &str,
        opts: &O,
    ) -> Result<T> {
        let request = self.get(path).query_opts(opts)?;
        self.http.send_json(request).await
    }

    /// POST request with JSON body and response.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.post(path).json(body)?;
        self.http.send_json(request).await
    }

    /// PUT request with JSON body and response.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.put(path).json(body)?;
        self.http.send_json(request).await
    }

    /// DELETE request, discarding the response body.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete_request(&self, path: &str) -> Result<()> {
        self.http.execute(self.delete(path)).await?;
        Ok(())
    }

    /// DELETE request with query options, discarding the response body.
    #[instrument(skip(self, opts), fields(path = %path))]
    pub async fn delete_with_options<O: Serialize>(&self, path: &str, opts: &O) -> Result<()> {
        let request = self.delete(path).query_opts(opts)?;
        self.http.execute(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = PipedriveClient::new("https://api.pipedrive.com/v1", "token123").unwrap();

        // Absolute paths
        assert_eq!(
            client.url("/deals"),
            "https://api.pipedrive.com/v1/deals"
        );

        // Relative paths
        assert_eq!(
            client.url("deals/42"),
            "https://api.pipedrive.com/v1/deals/42"
        );

        // Full URLs
        assert_eq!(client.url("https://other.com/path"), "https://other.com/path");
    }

    #[test]
    fn test_trailing_slash_handling() {
        let client = PipedriveClient::new("https://api.pipedrive.com/v1/", "token").unwrap();

        assert_eq!(client.base_url(), "https://api.pipedrive.com/v1");
        assert_eq!(
            client.url("/persons"),
            "https://api.pipedrive.com/v1/persons"
        );
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = PipedriveClient::new("", "token").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));

        // A bare trailing slash trims down to nothing
        let err = PipedriveClient::new("/", "token").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = PipedriveClient::new("not a url", "token").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = PipedriveClient::new("https://api.pipedrive.com/v1", "").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = PipedriveClient::from_token("super-secret").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }
}
