//! HTTP request building with Pipedrive-specific token handling.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Error, ErrorKind, Result};

/// HTTP request method.
///
/// The Pipedrive v1 API uses PUT (not PATCH) for updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Builder for HTTP requests against the Pipedrive API.
#[derive(Debug)]
pub struct RequestBuilder {
    pub(crate) method: RequestMethod,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) query_params: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
    /// API token, rendered as the `api_token` query parameter at execution.
    pub(crate) api_token: Option<String>,
}

/// Request body content.
#[derive(Debug)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(HashMap<String, String>),
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            query_params: Vec::new(),
            body: None,
            api_token: None,
        }
    }

    /// Set the API token for authentication.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Render an options struct into query parameters.
    ///
    /// Fields the struct skips during serialization are omitted from the
    /// query string entirely.
    pub fn query_opts<T: Serialize>(mut self, opts: &T) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(opts)?;
        for (name, value) in url::form_urlencoded::parse(encoded.as_bytes()) {
            self.query_params
                .push((name.into_owned(), value.into_owned()));
        }
        Ok(self)
    }

    /// Set JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| Error::with_source(ErrorKind::Serialization(e.to_string()), e))?;
        self.body = Some(RequestBody::Json(value));
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    /// Set raw JSON body.
    pub fn json_value(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self
    }

    /// Set form body.
    pub fn form(mut self, data: HashMap<String, String>) -> Self {
        self.body = Some(RequestBody::Form(data));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = RequestBuilder::new(RequestMethod::Get, "https://example.com/v1/deals")
            .api_token("token123")
            .header("X-Custom", "value")
            .query("start", "100");

        assert_eq!(req.method, RequestMethod::Get);
        assert_eq!(req.url, "https://example.com/v1/deals");
        assert_eq!(req.api_token, Some("token123".to_string()));
        assert_eq!(req.headers.get("X-Custom"), Some(&"value".to_string()));
        assert_eq!(req.query_params.len(), 1);
    }

    #[test]
    fn test_json_body() {
        let data = serde_json::json!({"title": "New deal"});
        let req = RequestBuilder::new(RequestMethod::Post, "https://example.com")
            .json(&data)
            .unwrap();

        assert!(matches!(req.body, Some(RequestBody::Json(_))));
        assert_eq!(
            req.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_query_opts() {
        #[derive(Serialize)]
        struct ListOptions {
            #[serde(skip_serializing_if = "Option::is_none")]
            start: Option<u32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            limit: Option<u32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            sort: Option<String>,
        }

        let req = RequestBuilder::new(RequestMethod::Get, "https://example.com")
            .query_opts(&ListOptions {
                start: Some(50),
                limit: None,
                sort: Some("add_time DESC".to_string()),
            })
            .unwrap();

        assert_eq!(
            req.query_params,
            vec![
                ("start".to_string(), "50".to_string()),
                ("sort".to_string(), "add_time DESC".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_opts_empty() {
        #[derive(Serialize)]
        struct Empty {
            #[serde(skip_serializing_if = "Option::is_none")]
            start: Option<u32>,
        }

        let req = RequestBuilder::new(RequestMethod::Get, "https://example.com")
            .query_opts(&Empty { start: None })
            .unwrap();

        assert!(req.query_params.is_empty());
    }
}
