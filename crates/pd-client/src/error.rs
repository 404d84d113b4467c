//! Error types for pipedrive-client.

use std::time::Duration;

/// Result type alias for pipedrive-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pipedrive-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Classify a serde_json failure from response decoding.
    ///
    /// Structurally broken JSON maps to `Decode`; JSON that parsed but does
    /// not fit the target shape maps to `TypeMismatch`.
    pub fn decode(err: serde_json::Error) -> Self {
        let kind = match err.classify() {
            serde_json::error::Category::Data => ErrorKind::TypeMismatch(err.to_string()),
            _ => ErrorKind::Decode(err.to_string()),
        };
        Error::with_source(kind, err)
    }

    /// Returns true if this error is worth retrying by the caller.
    ///
    /// The library itself never retries; this is a classification helper for
    /// external retry policies.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind, ErrorKind::RateLimited { .. })
    }

    /// Returns true if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication(_))
    }

    /// Returns the retry-after duration if this is a rate limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            ErrorKind::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Invalid configuration (missing or malformed base URL, empty token).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A response body was not valid JSON or the envelope shape did not match.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A known field's JSON value has an incompatible shape.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Pipedrive API error response (`success: false` envelope).
    #[error("Pipedrive API error: {message}")]
    Api {
        message: String,
        error_info: Option<String>,
    },

    /// HTTP request failed without a parseable API error body.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Authentication error (HTTP 401).
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Authorization error (HTTP 403).
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded (HTTP 429).
    #[error("Rate limited{}", retry_after.map(|d| format!(", retry after {:?}", d)).unwrap_or_default())]
    RateLimited { retry_after: Option<Duration> },

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ErrorKind {
    /// Returns true if this error kind is typically retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::RateLimited { .. } => true,
            ErrorKind::Timeout => true,
            ErrorKind::Connection(_) => true,
            ErrorKind::Http { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is typically retryable.
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::decode(err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        let err = Error::new(ErrorKind::RateLimited { retry_after: None });
        assert!(err.is_retryable());

        let err = Error::new(ErrorKind::Timeout);
        assert!(err.is_retryable());

        let err = Error::new(ErrorKind::Http {
            status: 503,
            message: "Service unavailable".to_string(),
        });
        assert!(err.is_retryable());

        let err = Error::new(ErrorKind::NotFound("resource".to_string()));
        assert!(!err.is_retryable());

        let err = Error::new(ErrorKind::Api {
            message: "unknown field".to_string(),
            error_info: None,
        });
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_is_rate_limited() {
        let err = Error::new(ErrorKind::RateLimited {
            retry_after: Some(Duration::from_secs(30)),
        });
        assert!(err.is_rate_limited());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));

        let err = Error::new(ErrorKind::Timeout);
        assert!(!err.is_rate_limited());
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_decode_classification() {
        // Broken JSON -> Decode
        let syntax = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = Error::decode(syntax);
        assert!(matches!(err.kind, ErrorKind::Decode(_)));

        // Valid JSON, wrong shape -> TypeMismatch
        let data = serde_json::from_str::<u32>("\"a string\"").unwrap_err();
        let err = Error::decode(data);
        assert!(matches!(err.kind, ErrorKind::TypeMismatch(_)));
    }

    #[test]
    fn test_error_kind_display_messages() {
        let cases: Vec<(ErrorKind, &str)> = vec![
            (
                ErrorKind::Config("missing base URL".into()),
                "Configuration error: missing base URL",
            ),
            (
                ErrorKind::Serialization("not a map".into()),
                "Serialization error: not a map",
            ),
            (
                ErrorKind::Decode("unexpected EOF".into()),
                "Decode error: unexpected EOF",
            ),
            (
                ErrorKind::TypeMismatch("expected object".into()),
                "Type mismatch: expected object",
            ),
            (
                ErrorKind::Api {
                    message: "Deal not found".into(),
                    error_info: None,
                },
                "Pipedrive API error: Deal not found",
            ),
            (
                ErrorKind::Http {
                    status: 500,
                    message: "Internal Server Error".into(),
                },
                "HTTP error: 500 Internal Server Error",
            ),
            (
                ErrorKind::Authentication("invalid token".into()),
                "Authentication error: invalid token",
            ),
            (
                ErrorKind::Authorization("forbidden".into()),
                "Authorization error: forbidden",
            ),
            (ErrorKind::NotFound("deals/42".into()), "Not found: deals/42"),
            (
                ErrorKind::RateLimited {
                    retry_after: Some(Duration::from_secs(2)),
                },
                "retry after",
            ),
            (ErrorKind::RateLimited { retry_after: None }, "Rate limited"),
            (ErrorKind::Timeout, "Request timeout"),
            (
                ErrorKind::Connection("refused".into()),
                "Connection error: refused",
            ),
            (ErrorKind::Other("something else".into()), "something else"),
        ];

        for (kind, expected_substring) in cases {
            let display = kind.to_string();
            assert!(
                display.contains(expected_substring),
                "Expected '{display}' to contain '{expected_substring}'"
            );
        }
    }

    #[test]
    fn test_retryable_http_status_codes() {
        let retryable = [429, 500, 502, 503, 504];
        for status in retryable {
            let err = Error::new(ErrorKind::Http {
                status,
                message: "error".into(),
            });
            assert!(err.is_retryable(), "HTTP {status} should be retryable");
        }

        let non_retryable = [400, 401, 403, 404, 405, 409, 422];
        for status in non_retryable {
            let err = Error::new(ErrorKind::Http {
                status,
                message: "error".into(),
            });
            assert!(!err.is_retryable(), "HTTP {status} should NOT be retryable");
        }
    }

    #[test]
    fn test_error_with_source() {
        let source_err = std::io::Error::other("disk full");
        let err = Error::with_source(ErrorKind::Other("write failed".into()), source_err);

        assert!(err.source.is_some());
        assert_eq!(err.to_string(), "write failed");
    }

    #[test]
    fn test_from_url_parse_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
        assert!(err.to_string().contains("Invalid URL"));
    }
}
