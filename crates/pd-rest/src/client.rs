//! Typed Pipedrive REST API client.
//!
//! This client wraps `PipedriveClient` from `pipedrive-client` and exposes
//! the per-resource services (deals, persons, organizations, notes). Every
//! operation is one request/response round trip: build the URL, attach query
//! options or a JSON body, call the transport, decode the envelope.

use serde::de::DeserializeOwned;

use pipedrive_client::{ClientConfig, PipedriveClient, RequestBuilder, Result};

use crate::deals::DealsService;
use crate::envelope::{self, Envelope, SearchEnvelope};
use crate::notes::NotesService;
use crate::organizations::OrganizationsService;
use crate::persons::PersonsService;

/// Pipedrive REST API client.
///
/// # Example
///
/// ```rust,ignore
/// use pipedrive_rest::PipedriveRestClient;
///
/// let client = PipedriveRestClient::from_token("api-token")?;
///
/// // List
/// let deals = client.deals().list(&Default::default()).await?;
///
/// // Create
/// let created = client
///     .deals()
///     .create(&DealCreateOptions {
///         title: Some("New deal".into()),
///         ..Default::default()
///     })
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct PipedriveRestClient {
    client: PipedriveClient,
}

impl PipedriveRestClient {
    /// Create a new REST client with the given base URL and API token.
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Result<Self> {
        let client = PipedriveClient::new(base_url, api_token)?;
        Ok(Self { client })
    }

    /// Create a new REST client against the default API base URL.
    pub fn from_token(api_token: impl Into<String>) -> Result<Self> {
        let client = PipedriveClient::from_token(api_token)?;
        Ok(Self { client })
    }

    /// Create a new REST client with custom HTTP configuration.
    pub fn with_config(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = PipedriveClient::with_config(base_url, api_token, config)?;
        Ok(Self { client })
    }

    /// Create a REST client from an existing PipedriveClient.
    pub fn from_client(client: PipedriveClient) -> Self {
        Self { client }
    }

    /// Get the underlying PipedriveClient.
    pub fn inner(&self) -> &PipedriveClient {
        &self.client
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    // =========================================================================
    // Resource Services
    // =========================================================================

    /// Deal operations.
    pub fn deals(&self) -> DealsService<'_> {
        DealsService { client: self }
    }

    /// Person operations.
    pub fn persons(&self) -> PersonsService<'_> {
        PersonsService { client: self }
    }

    /// Organization operations.
    pub fn organizations(&self) -> OrganizationsService<'_> {
        OrganizationsService { client: self }
    }

    /// Note operations.
    pub fn notes(&self) -> NotesService<'_> {
        NotesService { client: self }
    }

    // =========================================================================
    // Envelope-aware transport helpers
    // =========================================================================

    pub(crate) fn pd(&self) -> &PipedriveClient {
        &self.client
    }

    /// Execute a request whose `data` is a single resource.
    pub(crate) async fn fetch_single<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>> {
        let response = self.client.execute(request).await?;
        let body = response.bytes().await?;
        envelope::decode_single(&body)
    }

    /// Execute a request whose `data` is a resource list.
    pub(crate) async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<Vec<T>>> {
        let response = self.client.execute(request).await?;
        let body = response.bytes().await?;
        envelope::decode_list(&body)
    }

    /// Execute a request whose `data` wraps scored search matches.
    pub(crate) async fn fetch_search<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<SearchEnvelope<T>> {
        let response = self.client.execute(request).await?;
        let body = response.bytes().await?;
        envelope::decode_search(&body)
    }

    /// Execute a request, discarding the response body.
    pub(crate) async fn fetch_unit(&self, request: RequestBuilder) -> Result<()> {
        self.client.execute(request).await?;
        Ok(())
    }
}
