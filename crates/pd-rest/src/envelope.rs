//! The uniform Pipedrive response envelope and its decoders.
//!
//! Every successful API response is a JSON object of the form
//! `{"success": ..., "data": ..., "additional_data": ...}` where `data` is a
//! single resource object, a list of resources, or a search payload, and
//! `additional_data` carries pagination cursors.
//!
//! Decoding is strict about the envelope itself and lenient about unknown
//! keys inside each resource (those are captured by the resource's
//! custom-field bag). The `success` flag is advisory: error detection keys
//! off the HTTP status, not the flag.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pipedrive_client::{Error, ErrorKind, Result};

/// The uniform response wrapper.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope<T> {
    /// Advisory success flag; does not gate decoding.
    pub success: bool,
    /// The payload: a single resource or a list, absent for some operations.
    pub data: Option<T>,
    /// Pagination cursors and company metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<AdditionalData>,
}

impl<T> Envelope<T> {
    /// Pagination metadata, when the response carries any.
    pub fn pagination(&self) -> Option<&Pagination> {
        self.additional_data.as_ref()?.pagination.as_ref()
    }

    /// Whether more items exist beyond this page.
    pub fn more_items_in_collection(&self) -> bool {
        self.pagination()
            .is_some_and(|p| p.more_items_in_collection)
    }
}

impl<T> Envelope<Vec<T>> {
    /// Consume the envelope, yielding the items (empty when `data` is absent).
    pub fn items(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

/// Metadata attached alongside the payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AdditionalData {
    pub company_id: Option<i64>,
    /// Incremental-sync cursor: only items changed since this timestamp.
    pub since_timestamp: Option<String>,
    /// Incremental-sync cursor: last change timestamp on this page.
    pub last_timestamp_on_page: Option<String>,
    pub pagination: Option<Pagination>,
}

/// Offset-based pagination cursor.
///
/// Callers drive pagination by re-issuing List with `start` advanced past
/// the current page while `more_items_in_collection` holds.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Pagination {
    pub start: u32,
    pub limit: u32,
    pub more_items_in_collection: bool,
    pub next_start: Option<u32>,
}

/// Search payload: scored matches under `data.items`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchData<T> {
    pub items: Vec<SearchMatch<T>>,
}

/// One scored search match.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchMatch<T> {
    pub result_score: f64,
    pub item: T,
}

/// A search response envelope.
pub type SearchEnvelope<T> = Envelope<SearchData<T>>;

/// The container shape `data` must have for a given decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataShape {
    Object,
    Array,
}

impl DataShape {
    fn matches(self, data: &Value) -> bool {
        match self {
            DataShape::Object => data.is_object(),
            DataShape::Array => data.is_array(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            DataShape::Object => "object",
            DataShape::Array => "array",
        }
    }
}

/// Decode a response body whose `data` is a single resource object.
pub fn decode_single<T: DeserializeOwned>(body: &[u8]) -> Result<Envelope<T>> {
    decode_envelope(body, DataShape::Object)
}

/// Decode a response body whose `data` is a list of resources.
pub fn decode_list<T: DeserializeOwned>(body: &[u8]) -> Result<Envelope<Vec<T>>> {
    decode_envelope(body, DataShape::Array)
}

/// Decode a search response body (`data.items` with scored matches).
pub fn decode_search<T: DeserializeOwned>(body: &[u8]) -> Result<SearchEnvelope<T>> {
    decode_envelope(body, DataShape::Object)
}

/// Shared envelope decode: structural checks first, payload decode second.
///
/// Structural violations (broken JSON, non-object body, missing `success`,
/// wrong `data` container) fail with `Decode`; a known field inside the
/// payload whose value has an incompatible shape fails with `TypeMismatch`.
fn decode_envelope<T: DeserializeOwned>(body: &[u8], shape: DataShape) -> Result<Envelope<T>> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| Error::with_source(ErrorKind::Decode(e.to_string()), e))?;

    let Value::Object(mut map) = value else {
        return Err(Error::new(ErrorKind::Decode(
            "response body is not a JSON object".to_string(),
        )));
    };

    let success = match map.remove("success") {
        Some(Value::Bool(b)) => b,
        Some(_) => {
            return Err(Error::new(ErrorKind::Decode(
                "`success` is not a boolean".to_string(),
            )))
        }
        None => {
            return Err(Error::new(ErrorKind::Decode(
                "envelope is missing `success`".to_string(),
            )))
        }
    };

    let data = match map.remove("data") {
        None | Some(Value::Null) => None,
        Some(data) => {
            if !shape.matches(&data) {
                return Err(Error::new(ErrorKind::Decode(format!(
                    "expected {} for `data`",
                    shape.name()
                ))));
            }
            Some(serde_json::from_value(data).map_err(Error::decode)?)
        }
    };

    let additional_data = match map.remove("additional_data") {
        None | Some(Value::Null) => None,
        Some(extra) => Some(
            serde_json::from_value(extra)
                .map_err(|e| Error::with_source(ErrorKind::Decode(e.to_string()), e))?,
        ),
    };

    Ok(Envelope {
        success,
        data,
        additional_data,
    })
}
