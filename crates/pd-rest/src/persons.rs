//! Person resource: read model, write options, and operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use pipedrive_client::Result;

use crate::client::PipedriveRestClient;
use crate::envelope::{Envelope, SearchEnvelope};
use crate::types::{
    comma_separated, ids_param, CustomFields, Email, MergeRequest, OrgSummary, Phone, Timestamp,
    UserSummary, VisibleTo,
};

/// A person.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Person {
    pub id: i64,
    pub company_id: Option<i64>,
    pub owner_id: Option<UserSummary>,
    pub org_id: Option<OrgSummary>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub open_deals_count: Option<i64>,
    pub related_open_deals_count: Option<i64>,
    pub closed_deals_count: Option<i64>,
    pub related_closed_deals_count: Option<i64>,
    pub participant_open_deals_count: Option<i64>,
    pub participant_closed_deals_count: Option<i64>,
    pub email_messages_count: Option<i64>,
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
    pub phone: Vec<Phone>,
    pub email: Vec<Email>,
    pub first_char: Option<String>,
    pub update_time: Option<String>,
    pub add_time: Option<String>,
    pub visible_to: Value,
    pub picture_id: Value,
    pub next_activity_date: Value,
    pub next_activity_time: Value,
    pub next_activity_id: Value,
    pub last_activity_id: Option<i64>,
    pub last_activity_date: Option<String>,
    pub timeline_last_activity_time: Value,
    pub timeline_last_activity_time_by_owner: Value,
    pub last_incoming_mail_time: Value,
    pub last_outgoing_mail_time: Value,
    pub org_name: Option<String>,
    pub owner_name: Option<String>,
    pub cc_email: Option<String>,
    pub label: Option<i64>,
    /// Account-specific custom fields not in the fixed schema.
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

/// Options for listing persons.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonsListOptions {
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

/// Parameters for searching persons.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonSearchParams {
    pub term: String,
    #[serde(
        serialize_with = "comma_separated",
        skip_serializing_if = "Option::is_none"
    )]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Options for creating a person.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonCreateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
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

/// Options for updating a person (sparse: only set fields are sent).
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonUpdateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
    /// Replaces the full e-mail list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Vec<Email>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to: Option<VisibleTo>,
    /// Custom field values keyed by the API's field identifier.
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

/// A follower attached to a person.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PersonFollower {
    pub id: i64,
    pub user_id: Option<i64>,
    pub person_id: Option<i64>,
    pub add_time: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct AddFollowerRequest {
    user_id: i64,
}

/// Person operations.
pub struct PersonsService<'a> {
    pub(crate) client: &'a PipedriveRestClient,
}

impl PersonsService<'_> {
    /// List persons.
    #[instrument(skip(self, opts))]
    pub async fn list(&self, opts: &PersonsListOptions) -> Result<Envelope<Vec<Person>>> {
        let request = self.client.pd().get("/persons").query_opts(opts)?;
        self.client.fetch_list(request).await
    }

    /// Get a person by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Envelope<Person>> {
        let request = self.client.pd().get(&format!("/persons/{id}"));
        self.client.fetch_single(request).await
    }

    /// Find persons by name (legacy endpoint).
    #[instrument(skip(self))]
    pub async fn find(&self, term: &str) -> Result<Envelope<Vec<Person>>> {
        let request = self.client.pd().get("/persons/find").query("term", term);
        self.client.fetch_list(request).await
    }

    /// Search for persons, returning scored matches.
    #[instrument(skip(self, params))]
    pub async fn search(&self, params: &PersonSearchParams) -> Result<SearchEnvelope<Person>> {
        let request = self.client.pd().get("/persons/search").query_opts(params)?;
        self.client.fetch_search(request).await
    }

    /// Create a new person.
    #[instrument(skip(self, opts))]
    pub async fn create(&self, opts: &PersonCreateOptions) -> Result<Envelope<Person>> {
        let request = self.client.pd().post("/persons").json(opts)?;
        self.client.fetch_single(request).await
    }

    /// Update a person.
    #[instrument(skip(self, opts))]
    pub async fn update(&self, id: i64, opts: &PersonUpdateOptions) -> Result<Envelope<Person>> {
        let request = self.client.pd().put(&format!("/persons/{id}")).json(opts)?;
        self.client.fetch_single(request).await
    }

    /// Merge a person into another.
    #[instrument(skip(self))]
    pub async fn merge(&self, id: i64, merge_with_id: i64) -> Result<Envelope<Person>> {
        let request = self
            .client
            .pd()
            .put(&format!("/persons/{id}/merge"))
            .json(&MergeRequest { merge_with_id })?;
        self.client.fetch_single(request).await
    }

    /// Add a follower to a person.
    #[instrument(skip(self))]
    pub async fn add_follower(&self, id: i64, user_id: i64) -> Result<Envelope<PersonFollower>> {
        let request = self
            .client
            .pd()
            .post(&format!("/persons/{id}/followers"))
            .json(&AddFollowerRequest { user_id })?;
        self.client.fetch_single(request).await
    }

    /// Remove a follower from a person.
    #[instrument(skip(self))]
    pub async fn delete_follower(&self, id: i64, follower_id: i64) -> Result<()> {
        let request = self
            .client
            .pd()
            .delete(&format!("/persons/{id}/followers/{follower_id}"));
        self.client.fetch_unit(request).await
    }

    /// Mark a person as deleted.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let request = self.client.pd().delete(&format!("/persons/{id}"));
        self.client.fetch_unit(request).await
    }

    /// Mark multiple persons as deleted.
    #[instrument(skip(self))]
    pub async fn delete_multiple(&self, ids: &[i64]) -> Result<()> {
        let request = self
            .client
            .pd()
            .delete("/persons")
            .query("ids", ids_param(ids));
        self.client.fetch_unit(request).await
    }

    /// Delete a person's picture.
    #[instrument(skip(self))]
    pub async fn delete_picture(&self, id: i64) -> Result<()> {
        let request = self.client.pd().delete(&format!("/persons/{id}/picture"));
        self.client.fetch_unit(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::decode_list;
    use serde_json::json;

    #[test]
    fn test_person_decode_with_contacts() {
        let person: Person = serde_json::from_value(json!({
            "id": 31,
            "name": "Bob Example",
            "first_name": "Bob",
            "last_name": "Example",
            "email": [{"label": "work", "value": "bob@acme.io", "primary": true}],
            "phone": [{"value": "555-0100", "primary": true}],
            "owner_id": {"id": 9, "name": "Ada", "has_pic": false},
            "org_id": {"name": "ACME", "value": 5}
        }))
        .unwrap();

        assert_eq!(person.email[0].label.as_deref(), Some("work"));
        assert_eq!(person.phone[0].value, "555-0100");
        assert_eq!(person.owner_id.as_ref().unwrap().id, Some(9));
        assert!(person.custom_fields.is_empty());
    }

    #[test]
    fn test_person_custom_field_capture() {
        let person: Person = serde_json::from_value(json!({
            "id": 31,
            "name": "Bob",
            "x_1": 42
        }))
        .unwrap();

        assert_eq!(person.custom_fields.get("x_1"), Some(&json!(42)));
    }

    #[test]
    fn test_person_list_envelope() {
        let body = br#"{"success":true,"data":[{"id":1,"name":"A"},{"id":2,"name":"B"}],"additional_data":{"pagination":{"start":0,"limit":2,"more_items_in_collection":true,"next_start":2}}}"#;
        let envelope: Envelope<Vec<Person>> = decode_list(body).unwrap();

        assert!(envelope.more_items_in_collection());
        let persons = envelope.items();
        assert_eq!(persons.len(), 2);
        assert_eq!(persons[1].name.as_deref(), Some("B"));
    }

    #[test]
    fn test_create_options_sparse_serialization() {
        let opts = PersonCreateOptions {
            name: Some("Bob".to_string()),
            email: Some("bob@acme.io".to_string()),
            ..Default::default()
        };

        let encoded = serde_json::to_value(&opts).unwrap();
        assert_eq!(encoded, json!({"name": "Bob", "email": "bob@acme.io"}));
    }

    #[test]
    fn test_update_options_email_list() {
        let opts = PersonUpdateOptions {
            email: Some(vec![Email {
                label: None,
                value: "new@acme.io".to_string(),
                primary: true,
            }]),
            ..Default::default()
        };

        let encoded = serde_json::to_value(&opts).unwrap();
        assert_eq!(
            encoded,
            json!({"email": [{"value": "new@acme.io", "primary": true}]})
        );
    }
}
