//! # pipedrive-client
//!
//! Core HTTP client infrastructure for the Pipedrive API.
//!
//! This crate provides the foundational HTTP client with:
//! - API token injection as a query parameter
//! - Typed JSON request/response methods
//! - Pipedrive error-envelope mapping for non-2xx responses
//! - Rate-limit header parsing (surfaced as data, never acted on)
//! - Connection pooling and compression
//! - Request/response tracing
//!
//! Retry, backoff and caching are deliberately absent: every operation is a
//! single request/response round trip, and transport policy belongs to the
//! caller.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │                      (pipedrive-rest)                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PipedriveClient                          │
//! │  - Holds base URL + API token                               │
//! │  - Provides typed JSON methods (get_json, post_json, etc.)  │
//! │  - Injects the token into every request                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HttpClient                             │
//! │  - Raw HTTP execution over reqwest                          │
//! │  - Request building, error-envelope mapping                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use pipedrive_client::PipedriveClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pipedrive_client::Error> {
//!     let client = PipedriveClient::new("https://api.pipedrive.com/v1", "token")?;
//!
//!     let deals: serde_json::Value = client.get_json("/deals").await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod pipedrive_client;
mod request;
mod response;

pub use client::HttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use pipedrive_client::PipedriveClient;
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{RateLimit, Response, ResponseExt};

/// Default Pipedrive API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.pipedrive.com/v1";

/// User-Agent string for the client.
pub const USER_AGENT: &str = concat!("pipedrive-api/", env!("CARGO_PKG_VERSION"));
