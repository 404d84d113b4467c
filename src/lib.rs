//! # pipedrive-api
//!
//! A Pipedrive CRM API client library for Rust.
//!
//! This library provides type-safe access to the Pipedrive REST API:
//! request construction against documented endpoints, JSON body
//! serialization, and response decoding into typed structures, including
//! the open custom-field bag every resource carries.
//!
//! ## Security
//!
//! - The API token is redacted in Debug output
//! - Tracing/logging skips credential parameters
//!
//! ## Crates
//!
//! - **pipedrive-client** - Core HTTP client infrastructure
//! - **pipedrive-rest** - REST API: deals, persons, organizations, notes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pipedrive_api::PipedriveRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PipedriveRestClient::from_token("api-token")?;
//!
//!     // List deals, one page at a time
//!     let mut opts = pipedrive_api::rest::DealsListOptions::default();
//!     loop {
//!         let page = client.deals().list(&opts).await?;
//!         let more = page.more_items_in_collection();
//!         let next_start = page.pagination().and_then(|p| p.next_start);
//!
//!         for deal in page.items() {
//!             println!("{} {:?}", deal.id, deal.title);
//!         }
//!
//!         if !more {
//!             break;
//!         }
//!         opts.start = next_start;
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export member crates for convenient access
#[cfg(feature = "client")]
pub use pipedrive_client as client;
#[cfg(feature = "rest")]
pub use pipedrive_rest as rest;

// Re-export commonly used types at the top level
#[cfg(feature = "client")]
pub use pipedrive_client::{ClientConfig, Error, ErrorKind, PipedriveClient};
#[cfg(feature = "rest")]
pub use pipedrive_rest::PipedriveRestClient;
