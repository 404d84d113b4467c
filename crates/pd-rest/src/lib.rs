//! # pipedrive-rest
//!
//! Typed Pipedrive REST API client: deals, persons, organizations, notes.
//!
//! ## Features
//!
//! - **CRUD** per resource - list, get, create, update, delete
//! - **Search** - scored matches via `/{resource}/search`
//! - **Custom fields** - account-specific keys captured into an open bag on
//!   every resource, and merged back into write bodies
//! - **Pagination** - offset cursors surfaced through the response envelope
//!
//! ## Example
//!
//! ```rust,ignore
//! use pipedrive_rest::{DealCreateOptions, PipedriveRestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pipedrive_rest::Error> {
//!     let client = PipedriveRestClient::from_token("api-token")?;
//!
//!     // List the first page of deals
//!     let page = client.deals().list(&Default::default()).await?;
//!     for deal in page.items() {
//!         println!("{:?} {:?}", deal.id, deal.title);
//!     }
//!
//!     // Create a deal with a custom field
//!     let mut opts = DealCreateOptions {
//!         title: Some("New deal".into()),
//!         ..Default::default()
//!     };
//!     opts.custom_fields
//!         .insert("dcf558aa...".into(), serde_json::json!("custom value"));
//!     let created = client.deals().create(&opts).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod deals;
mod envelope;
mod notes;
mod organizations;
mod persons;
mod types;

// Main client
pub use client::PipedriveRestClient;

// Envelope types
pub use envelope::{
    decode_list, decode_search, decode_single, AdditionalData, Envelope, Pagination, SearchData,
    SearchEnvelope, SearchMatch,
};

// Resources
pub use deals::{
    Deal, DealCreateOptions, DealSearchParams, DealUpdateOptions, DealsListOptions, DealsService,
};
pub use notes::{Note, NoteCreateOptions, NoteUpdateOptions, NotesListOptions, NotesService};
pub use organizations::{
    Organization, OrganizationCreateOptions, OrganizationSearchParams, OrganizationUpdateOptions,
    OrganizationsListOptions, OrganizationsService,
};
pub use persons::{
    Person, PersonCreateOptions, PersonFollower, PersonSearchParams, PersonUpdateOptions,
    PersonsListOptions, PersonsService,
};

// Shared field types
pub use types::{
    CustomFields, Email, OrgSummary, PersonSummary, Phone, Timestamp, UserSummary, VisibleTo,
    DATE_FORMAT, DATE_TIME_FORMAT,
};

// Re-export pipedrive-client types that users might need
pub use pipedrive_client::{
    ClientConfig, ClientConfigBuilder, Error, ErrorKind, PipedriveClient, RateLimit, Result,
};
