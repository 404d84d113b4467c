//! Deal resource: read model, write options, and operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use pipedrive_client::Result;

use crate::client::PipedriveRestClient;
use crate::envelope::{Envelope, SearchEnvelope};
use crate::types::{
    comma_separated, ids_param, CustomFields, MergeRequest, OrgSummary, PersonSummary, Timestamp,
    UserSummary, VisibleTo,
};

/// A deal.
///
/// Fixed attributes follow the API schema; any other top-level key the
/// account defines lands in `custom_fields`. Attributes the API returns
/// with inconsistent shapes (scalar placeholder or nested object) are typed
/// [`Value`] and left to the caller to interpret.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Deal {
    pub id: i64,
    pub creator_user_id: Option<UserSummary>,
    pub user_id: Option<UserSummary>,
    pub person_id: Option<PersonSummary>,
    pub org_id: Option<OrgSummary>,
    pub stage_id: Option<i64>,
    pub title: Option<String>,
    pub value: Option<f64>,
    pub currency: Option<String>,
    pub add_time: Option<String>,
    pub update_time: Option<String>,
    pub stage_change_time: Option<String>,
    pub active: Option<bool>,
    pub deleted: Option<bool>,
    pub status: Option<String>,
    pub probability: Value,
    pub next_activity_date: Value,
    pub next_activity_time: Value,
    pub next_activity_id: Value,
    pub last_activity_id: Option<i64>,
    pub last_activity_date: Option<String>,
    pub lost_reason: Option<String>,
    pub visible_to: Value,
    pub close_time: Option<String>,
    pub pipeline_id: Option<i64>,
    pub won_time: Value,
    pub first_won_time: Value,
    pub lost_time: Option<String>,
    pub products_count: Option<i64>,
    pub files_count: Option<i64>,
    pub notes_count: Option<i64>,
    pub followers_count: Option<i64>,
    pub email_messages_count: Option<i64>,
    pub activities_count: Option<i64>,
    pub done_activities_count: Option<i64>,
    pub undone_activities_count: Option<i64>,
    pub reference_activities_count: Option<i64>,
    pub participants_count: Option<i64>,
    pub expected_close_date: Value,
    pub last_incoming_mail_time: Value,
    pub last_outgoing_mail_time: Value,
    pub stage_order_nr: Option<i64>,
    pub person_name: Value,
    pub org_name: Value,
    pub next_activity_subject: Value,
    pub next_activity_type: Value,
    pub next_activity_duration: Value,
    pub next_activity_note: Value,
    pub formatted_value: Option<String>,
    pub rotten_time: Value,
    pub weighted_value: Option<f64>,
    pub formatted_weighted_value: Option<String>,
    pub owner_name: Option<String>,
    pub cc_email: Option<String>,
    pub org_hidden: Option<bool>,
    pub person_hidden: Option<bool>,
    /// Account-specific custom fields not in the fixed schema.
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

/// Options for listing deals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DealsListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// 0 or 1 on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owned_by_you: Option<u8>,
}

/// Parameters for searching deals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DealSearchParams {
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
    pub person_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Options for creating a deal.
///
/// Unset fields are omitted from the request body; custom fields are merged
/// into the same flat object.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DealCreateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lost_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to: Option<VisibleTo>,
    /// Custom field values keyed by the API's field identifier.
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

/// Options for updating a deal (sparse: only set fields are sent).
#[derive(Debug, Clone, Default, Serialize)]
pub struct DealUpdateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lost_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to: Option<VisibleTo>,
    /// Custom field values keyed by the API's field identifier.
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

/// Deal operations.
pub struct DealsService<'a> {
    pub(crate) client: &'a PipedriveRestClient,
}

impl DealsService<'_> {
    /// List deals.
    #[instrument(skip(self, opts))]
    pub async fn list(&self, opts: &DealsListOptions) -> Result<Envelope<Vec<Deal>>> {
        let request = self.client.pd().get("/deals").query_opts(opts)?;
        self.client.fetch_list(request).await
    }

    /// Get a deal by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Envelope<Deal>> {
        let request = self.client.pd().get(&format!("/deals/{id}"));
        self.client.fetch_single(request).await
    }

    /// Find deals by name (legacy endpoint).
    #[instrument(skip(self))]
    pub async fn find(&self, term: &str) -> Result<Envelope<Vec<Deal>>> {
        let request = self.client.pd().get("/deals/find").query("term", term);
        self.client.fetch_list(request).await
    }

    /// Search for deals, returning scored matches.
    #[instrument(skip(self, params))]
    pub async fn search(&self, params: &DealSearchParams) -> Result<SearchEnvelope<Deal>> {
        let request = self.client.pd().get("/deals/search").query_opts(params)?;
        self.client.fetch_search(request).await
    }

    /// List updates about a deal.
    #[instrument(skip(self))]
    pub async fn list_updates(&self, id: i64) -> Result<Envelope<Vec<Deal>>> {
        let request = self.client.pd().get(&format!("/deals/{id}/flow"));
        self.client.fetch_list(request).await
    }

    /// Create a new deal.
    #[instrument(skip(self, opts))]
    pub async fn create(&self, opts: &DealCreateOptions) -> Result<Envelope<Deal>> {
        let request = self.client.pd().post("/deals").json(opts)?;
        self.client.fetch_single(request).await
    }

    /// Update a deal.
    #[instrument(skip(self, opts))]
    pub async fn update(&self, id: i64, opts: &DealUpdateOptions) -> Result<Envelope<Deal>> {
        let request = self.client.pd().put(&format!("/deals/{id}")).json(opts)?;
        self.client.fetch_single(request).await
    }

    /// Duplicate a deal.
    #[instrument(skip(self))]
    pub async fn duplicate(&self, id: i64) -> Result<Envelope<Deal>> {
        let request = self.client.pd().post(&format!("/deals/{id}/duplicate"));
        self.client.fetch_single(request).await
    }

    /// Merge a deal into another.
    #[instrument(skip(self))]
    pub async fn merge(&self, id: i64, merge_with_id: i64) -> Result<Envelope<Deal>> {
        let request = self
            .client
            .pd()
            .put(&format!("/deals/{id}/merge"))
            .json(&MergeRequest { merge_with_id })?;
        self.client.fetch_single(request).await
    }

    /// Delete a deal.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let request = self.client.pd().delete(&format!("/deals/{id}"));
        self.client.fetch_unit(request).await
    }

    /// Delete deals in bulk.
    #[instrument(skip(self))]
    pub async fn delete_multiple(&self, ids: &[i64]) -> Result<()> {
        let request = self.client.pd().delete("/deals").query("ids", ids_param(ids));
        self.client.fetch_unit(request).await
    }

    /// Remove a follower from a deal.
    #[instrument(skip(self))]
    pub async fn delete_follower(&self, id: i64, follower_id: i64) -> Result<()> {
        let request = self
            .client
            .pd()
            .delete(&format!("/deals/{id}/followers/{follower_id}"));
        self.client.fetch_unit(request).await
    }

    /// Remove a participant from a deal.
    #[instrument(skip(self))]
    pub async fn delete_participant(&self, id: i64, participant_id: i64) -> Result<()> {
        let request = self
            .client
            .pd()
            .delete(&format!("/deals/{id}/participants/{participant_id}"));
        self.client.fetch_unit(request).await
    }

    /// Remove an attached product from a deal.
    #[instrument(skip(self))]
    pub async fn delete_attached_product(
        &self,
        id: i64,
        product_attachment_id: i64,
    ) -> Result<()> {
        let request = self
            .client
            .pd()
            .delete(&format!("/deals/{id}/products/{product_attachment_id}"));
        self.client.fetch_unit(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::decode_single;
    use serde_json::json;

    #[test]
    fn test_known_fields_only_leaves_bag_empty() {
        let deal: Deal = serde_json::from_value(json!({
            "id": 1,
            "title": "Big deal",
            "value": 1500.0,
            "currency": "EUR",
            "status": "open"
        }))
        .unwrap();

        assert_eq!(deal.id, 1);
        assert_eq!(deal.title.as_deref(), Some("Big deal"));
        assert!(deal.custom_fields.is_empty());
    }

    #[test]
    fn test_unknown_key_lands_in_bag() {
        let deal: Deal = serde_json::from_value(json!({
            "id": 1,
            "title": "Big deal",
            "x_1": 42
        }))
        .unwrap();

        assert_eq!(deal.custom_fields.len(), 1);
        assert_eq!(deal.custom_fields.get("x_1"), Some(&json!(42)));
    }

    #[test]
    fn test_bag_never_shadows_known_field() {
        // "title" is a fixed attribute: it decodes into the typed field and
        // must not reappear in the bag.
        let deal: Deal = serde_json::from_value(json!({
            "id": 1,
            "title": "Taken",
            "9f2e...hash": "custom value"
        }))
        .unwrap();

        assert_eq!(deal.title.as_deref(), Some("Taken"));
        assert!(!deal.custom_fields.contains_key("title"));
        assert!(deal.custom_fields.contains_key("9f2e...hash"));
    }

    #[test]
    fn test_any_shaped_fields_accept_scalars() {
        // probability arrives as null, a number, or a string depending on
        // the account; visible_to as a string or a number.
        let deal: Deal = serde_json::from_value(json!({
            "id": 1,
            "probability": 75,
            "visible_to": "3",
            "won_time": null
        }))
        .unwrap();

        assert_eq!(deal.probability, json!(75));
        assert_eq!(deal.visible_to, json!("3"));
        assert!(deal.won_time.is_null());
    }

    #[test]
    fn test_strict_summary_rejects_scalar() {
        let err = serde_json::from_value::<Deal>(json!({
            "id": 1,
            "user_id": 123
        }))
        .unwrap_err();
        assert!(err.is_data());
    }

    #[test]
    fn test_nested_summaries_decode() {
        let deal: Deal = serde_json::from_value(json!({
            "id": 1,
            "user_id": {"id": 9, "name": "Ada", "email": "ada@acme.io", "has_pic": true,
                        "pic_hash": "ab12", "active_flag": true, "value": 9},
            "person_id": {"name": "Bob", "email": [{"value": "bob@acme.io", "primary": true}],
                          "phone": [{"value": "555-0100", "primary": true}], "value": 31},
            "org_id": {"name": "ACME", "people_count": 12, "owner_id": 9,
                       "address": "Main St 1", "cc_email": "acme@pipedrivemail.com", "value": 5}
        }))
        .unwrap();

        assert_eq!(deal.user_id.as_ref().unwrap().name.as_deref(), Some("Ada"));
        assert_eq!(deal.person_id.as_ref().unwrap().email[0].value, "bob@acme.io");
        assert_eq!(deal.org_id.as_ref().unwrap().people_count, Some(12));
    }

    #[test]
    fn test_create_options_sparse_serialization() {
        let mut custom_fields = CustomFields::new();
        custom_fields.insert("custom_a".to_string(), json!("v"));

        let opts = DealCreateOptions {
            title: Some("t".to_string()),
            custom_fields,
            ..Default::default()
        };

        let encoded = serde_json::to_value(&opts).unwrap();
        assert_eq!(encoded, json!({"title": "t", "custom_a": "v"}));
    }

    #[test]
    fn test_default_options_encode_to_empty_object() {
        let encoded = serde_json::to_value(DealUpdateOptions::default()).unwrap();
        assert_eq!(encoded, json!({}));
    }

    #[test]
    fn test_create_options_full_serialization() {
        let opts = DealCreateOptions {
            title: Some("Annual renewal".to_string()),
            value: Some("4500".to_string()),
            currency: Some("USD".to_string()),
            user_id: Some(7),
            stage_id: Some(2),
            status: Some("open".to_string()),
            probability: Some(80),
            add_time: Some(Timestamp::parse("2024-06-30 10:00:00").unwrap()),
            visible_to: Some(VisibleTo::EntireCompany),
            ..Default::default()
        };

        let encoded = serde_json::to_value(&opts).unwrap();
        assert_eq!(
            encoded,
            json!({
                "title": "Annual renewal",
                "value": "4500",
                "currency": "USD",
                "user_id": 7,
                "stage_id": 2,
                "status": "open",
                "probability": 80,
                "add_time": "2024-06-30 10:00:00",
                "visible_to": 3
            })
        );
    }

    #[test]
    fn test_search_params_query_encoding() {
        let params = DealSearchParams {
            term: "acme".to_string(),
            fields: Some(vec!["title".to_string(), "notes".to_string()]),
            exact_match: Some(true),
            ..Default::default()
        };

        let encoded = serde_urlencoded::to_string(&params).unwrap();
        assert_eq!(encoded, "term=acme&fields=title%2Cnotes&exact_match=true");
    }

    #[test]
    fn test_deal_envelope_decode_with_custom_fields() {
        let body = br#"{"success":true,"data":{"id":6,"title":"With extras","dcf558aac1ae4e8c4f849ba5e668430d8df9be12":"custom"},"additional_data":{"company_id":12}}"#;
        let envelope: Envelope<Deal> = decode_single(body).unwrap();

        let deal = envelope.data.unwrap();
        assert_eq!(deal.id, 6);
        assert_eq!(
            deal.custom_fields
                .get("dcf558aac1ae4e8c4f849ba5e668430d8df9be12"),
            Some(&json!("custom"))
        );
    }
}
