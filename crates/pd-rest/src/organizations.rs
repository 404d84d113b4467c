//! Organization resource: read model, write options, and operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use pipedrive_client::Result;

use crate::client::PipedriveRestClient;
use crate::envelope::{Envelope, SearchEnvelope};
use crate::types::{
    comma_separated, ids_param, CustomFields, MergeRequest, Timestamp, UserSummary, VisibleTo,
};

/// An organization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Organization {
    pub id: i64,
    pub company_id: Option<i64>,
    pub owner_id: Option<UserSummary>,
    pub name: Option<String>,
    pub open_deals_count: Option<i64>,
    pub related_open_deals_count: Option<i64>,
    pub closed_deals_count: Option<i64>,
    pub related_closed_deals_count: Option<i64>,
    pub email_messages_count: Option<i64>,
    pub people_count: Option<i64>,
    pub activities_count: Option<i64>,
    pub done_activities_count: Option<i64>,
    pub undone_activities_count: Option<i64>,
    pub reference_activities_count: Option<i64>,
    pub files_count: Option<i64>,
    pub notes_count: Option<i64>,
    pub followers_count: Option<i64>,
    pub won_deals_count: Option<i64>,
    pub related_won_deals_count: Option<i64>,
    pub lost_deals_count: Option<i64>,
    pub related_lost_deals_count: Option<i64>,
    pub active_flag: Option<bool>,
    pub category_id: Value,
    pub picture_id: Value,
    pub country_code: Value,
    pub first_char: Option<String>,
    pub update_time: Option<String>,
    pub add_time: Option<String>,
    pub visible_to: Value,
    pub next_activity_date: Option<String>,
    pub next_activity_time: Value,
    pub next_activity_id: Option<i64>,
    pub last_activity_id: Option<i64>,
    pub last_activity_date: Option<String>,
    pub timeline_last_activity_time: Value,
    pub timeline_last_activity_time_by_owner: Value,
    pub address: Option<String>,
    pub address_subpremise: Option<String>,
    pub address_street_number: Option<String>,
    pub address_route: Option<String>,
    pub address_sublocality: Option<String>,
    pub address_locality: Option<String>,
    pub address_admin_area_level_1: Option<String>,
    pub address_admin_area_level_2: Option<String>,
    pub address_country: Option<String>,
    pub address_postal_code: Option<String>,
    pub address_formatted_address: Option<String>,
    pub owner_name: Option<String>,
    pub cc_email: Option<String>,
    /// Account-specific custom fields not in the fixed schema.
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

/// Options for listing organizations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationsListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_char: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// Parameters for searching organizations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationSearchParams {
    pub term: String,
    #[serde(
        serialize_with = "comma_separated",
        skip_serializing_if = "Option::is_none"
    )]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Options for creating an organization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationCreateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to: Option<VisibleTo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_time: Option<Timestamp>,
    /// Custom field values keyed by the API's field identifier.
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

/// Options for updating an organization (sparse: only set fields are sent).
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationUpdateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to: Option<VisibleTo>,
    /// Custom field values keyed by the API's field identifier.
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

/// Organization operations.
pub struct OrganizationsService<'a> {
    pub(crate) client: &'a PipedriveRestClient,
}

impl OrganizationsService<'_> {
    /// List organizations.
    #[instrument(skip(self, opts))]
    pub async fn list(
        &self,
        opts: &OrganizationsListOptions,
    ) -> Result<Envelope<Vec<Organization>>> {
        let request = self.client.pd().get("/organizations").query_opts(opts)?;
        self.client.fetch_list(request).await
    }

    /// Get an organization by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Envelope<Organization>> {
        let request = self.client.pd().get(&format!("/organizations/{id}"));
        self.client.fetch_single(request).await
    }

    /// Find organizations by name (legacy endpoint).
    #[instrument(skip(self))]
    pub async fn find(&self, term: &str) -> Result<Envelope<Vec<Organization>>> {
        let request = self
            .client
            .pd()
            .get("/organizations/find")
            .query("term", term);
        self.client.fetch_list(request).await
    }

    /// Search for organizations, returning scored matches.
    #[instrument(skip(self, params))]
    pub async fn search(
        &self,
        params: &OrganizationSearchParams,
    ) -> Result<SearchEnvelope<Organization>> {
        let request = self
            .client
            .pd()
            .get("/organizations/search")
            .query_opts(params)?;
        self.client.fetch_search(request).await
    }

    /// Create a new organization.
    #[instrument(skip(self, opts))]
    pub async fn create(
        &self,
        opts: &OrganizationCreateOptions,
    ) -> Result<Envelope<Organization>> {
        let request = self.client.pd().post("/organizations").json(opts)?;
        self.client.fetch_single(request).await
    }

    /// Update an organization.
    #[instrument(skip(self, opts))]
    pub async fn update(
        &self,
        id: i64,
        opts: &OrganizationUpdateOptions,
    ) -> Result<Envelope<Organization>> {
        let request = self
            .client
            .pd()
            .put(&format!("/organizations/{id}"))
            .json(opts)?;
        self.client.fetch_single(request).await
    }

    /// Merge an organization into another.
    #[instrument(skip(self))]
    pub async fn merge(&self, id: i64, merge_with_id: i64) -> Result<Envelope<Organization>> {
        let request = self
            .client
            .pd()
            .put(&format!("/organizations/{id}/merge"))
            .json(&MergeRequest { merge_with_id })?;
        self.client.fetch_single(request).await
    }

    /// Mark an organization as deleted.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let request = self.client.pd().delete(&format!("/organizations/{id}"));
        self.client.fetch_unit(request).await
    }

    /// Mark multiple organizations as deleted.
    #[instrument(skip(self))]
    pub async fn delete_multiple(&self, ids: &[i64]) -> Result<()> {
        let request = self
            .client
            .pd()
            .delete("/organizations")
            .query("ids", ids_param(ids));
        self.client.fetch_unit(request).await
    }

    /// Remove a follower from an organization.
    #[instrument(skip(self))]
    pub async fn delete_follower(&self, id: i64, follower_id: i64) -> Result<()> {
        let request = self
            .client
            .pd()
            .delete(&format!("/organizations/{id}/followers/{follower_id}"));
        self.client.fetch_unit(request).await
    }
}
