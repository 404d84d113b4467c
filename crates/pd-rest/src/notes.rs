//! Note resource: read model, write options, and operations.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use pipedrive_client::Result;

use crate::client::PipedriveRestClient;
use crate::envelope::Envelope;
use crate::types::{CustomFields, Timestamp};

/// A note attached to a deal, person or organization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Note {
    pub id: i64,
    pub user_id: Option<i64>,
    pub deal_id: Option<i64>,
    pub person_id: Option<i64>,
    pub org_id: Option<i64>,
    pub content: Option<String>,
    pub add_time: Option<String>,
    pub update_time: Option<String>,
    pub active_flag: Option<bool>,
    pub pinned_to_deal_flag: Option<bool>,
    pub pinned_to_person_flag: Option<bool>,
    pub pinned_to_organization_flag: Option<bool>,
    pub last_update_user_id: Option<i64>,
    /// Account-specific custom fields not in the fixed schema.
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

/// Options for listing notes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotesListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// Options for creating a note.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteCreateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_time: Option<Timestamp>,
    /// 0 or 1 on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_to_deal_flag: Option<u8>,
    /// 0 or 1 on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_to_person_flag: Option<u8>,
    /// 0 or 1 on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_to_organization_flag: Option<u8>,
    /// Custom field values keyed by the API's field identifier.
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

/// Options for updating a note (sparse: only set fields are sent).
#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteUpdateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
    /// 0 or 1 on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_to_deal_flag: Option<u8>,
    /// 0 or 1 on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_to_person_flag: Option<u8>,
    /// 0 or 1 on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_to_organization_flag: Option<u8>,
    /// Custom field values keyed by the API's field identifier.
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

/// Note operations.
pub struct NotesService<'a> {
    pub(crate) client: &'a PipedriveRestClient,
}

impl NotesService<'_> {
    /// List notes.
    #[instrument(skip(self, opts))]
    pub async fn list(&self, opts: &NotesListOptions) -> Result<Envelope<Vec<Note>>> {
        let request = self.client.pd().get("/notes").query_opts(opts)?;
        self.client.fetch_list(request).await
    }

    /// Get a note by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Envelope<Note>> {
        let request = self.client.pd().get(&format!("/notes/{id}"));
        self.client.fetch_single(request).await
    }

    /// Create a new note.
    #[instrument(skip(self, opts))]
    pub async fn create(&self, opts: &NoteCreateOptions) -> Result<Envelope<Note>> {
        let request = self.client.pd().post("/notes").json(opts)?;
        self.client.fetch_single(request).await
    }

    /// Update a note.
    #[instrument(skip(self, opts))]
    pub async fn update(&self, id: i64, opts: &NoteUpdateOptions) -> Result<Envelope<Note>> {
        let request = self.client.pd().put(&format!("/notes/{id}")).json(opts)?;
        self.client.fetch_single(request).await
    }

    /// Delete a note.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let request = self.client.pd().delete(&format!("/notes/{id}"));
        self.client.fetch_unit(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::decode_single;
    use serde_json::json;

    #[test]
    fn test_note_decode() {
        let note: Note = serde_json::from_value(json!({
            "id": 80,
            "user_id": 9,
            "deal_id": 6,
            "content": "Call back on Monday",
            "add_time": "2024-06-30 10:00:00",
            "active_flag": true,
            "pinned_to_deal_flag": true
        }))
        .unwrap();

        assert_eq!(note.content.as_deref(), Some("Call back on Monday"));
        assert_eq!(note.deal_id, Some(6));
        assert_eq!(note.pinned_to_deal_flag, Some(true));
        assert!(note.custom_fields.is_empty());
    }

    #[test]
    fn test_note_envelope_decode() {
        let body = br#"{"success":true,"data":{"id":80,"content":"hi"}}"#;
        let envelope: Envelope<Note> = decode_single(body).unwrap();
        assert_eq!(envelope.data.unwrap().id, 80);
    }

    #[test]
    fn test_create_options_sparse_serialization() {
        let opts = NoteCreateOptions {
            content: Some("Call back".to_string()),
            deal_id: Some(6),
            pinned_to_deal_flag: Some(1),
            ..Default::default()
        };

        let encoded = serde_json::to_value(&opts).unwrap();
        assert_eq!(
            encoded,
            json!({"content": "Call back", "deal_id": 6, "pinned_to_deal_flag": 1})
        );
    }
}
