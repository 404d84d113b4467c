//! Shared field types used across resources.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The open extension bag: account-specific custom fields attached to a
/// resource beyond its fixed schema, keyed by the API's field identifier.
///
/// Captured with `#[serde(flatten)]`: recognized field names are decoded
/// into their typed attributes, every remaining top-level key lands here
/// verbatim. A key equal to a fixed attribute's JSON name is consumed by the
/// typed decode and never appears in the bag.
pub type CustomFields = serde_json::Map<String, Value>;

/// Wire format for dates (`2024-06-30`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format for timestamps (`2024-06-30 15:04:05`).
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A point in time in the API's wire format.
///
/// Serializes as `YYYY-MM-DD HH:MM:SS`; deserializes from either the full
/// timestamp or a bare date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub NaiveDateTime);

impl Timestamp {
    /// Format as a bare date.
    pub fn format_date(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }

    /// Format as a full timestamp.
    pub fn format_full(&self) -> String {
        self.0.format(DATE_TIME_FORMAT).to_string()
    }

    /// Parse from the wire format (full timestamp, or bare date at midnight).
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        match NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT) {
            Ok(dt) => Ok(Timestamp(dt)),
            Err(_) => {
                let date = NaiveDate::parse_from_str(s, DATE_FORMAT)?;
                Ok(Timestamp(date.and_time(NaiveTime::MIN)))
            }
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_full())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Timestamp(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format_full())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(de::Error::custom)
    }
}

/// Record visibility groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleTo {
    /// Owner and followers (private).
    OwnersAndFollowers,
    /// Entire company (shared).
    EntireCompany,
}

impl VisibleTo {
    /// The numeric wire value.
    pub fn as_u8(self) -> u8 {
        match self {
            VisibleTo::OwnersAndFollowers => 1,
            VisibleTo::EntireCompany => 3,
        }
    }
}

impl Serialize for VisibleTo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for VisibleTo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(VisibleTo::OwnersAndFollowers),
            3 => Ok(VisibleTo::EntireCompany),
            other => Err(de::Error::custom(format!(
                "unknown visibility group: {other}"
            ))),
        }
    }
}

/// A labeled e-mail address on a person.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Email {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub primary: bool,
}

/// A labeled phone number on a person.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Phone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub primary: bool,
}

/// Owner/user relation summary embedded in resources.
///
/// The shape is stable across endpoints; a scalar in its place is a decode
/// error (the relation fields with inconsistent upstream shapes are typed
/// [`Value`] instead).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UserSummary {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Scalar or object depending on the account.
    pub has_pic: Value,
    pub pic_hash: Option<String>,
    pub active_flag: Option<bool>,
    pub value: Option<i64>,
}

/// Person relation summary embedded in deals.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PersonSummary {
    pub name: Option<String>,
    pub email: Vec<Email>,
    pub phone: Vec<Phone>,
    pub value: Option<i64>,
}

/// Organization relation summary embedded in deals and persons.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OrgSummary {
    pub name: Option<String>,
    pub people_count: Option<i64>,
    pub owner_id: Option<i64>,
    /// Scalar or object depending on the account.
    pub address: Value,
    pub active_flag: Option<bool>,
    pub cc_email: Option<String>,
    pub value: Option<i64>,
}

/// Request body for merge operations.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct MergeRequest {
    pub merge_with_id: i64,
}

/// Serialize a string list as one comma-separated query value.
pub(crate) fn comma_separated<S: Serializer>(
    value: &Option<Vec<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(items) => serializer.serialize_str(&items.join(",")),
        None => serializer.serialize_none(),
    }
}

/// Render ids as one comma-separated query value.
pub(crate) fn ids_param(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip() {
        let ts = Timestamp::parse("2024-06-30 15:04:05").unwrap();
        assert_eq!(ts.format_full(), "2024-06-30 15:04:05");
        assert_eq!(ts.format_date(), "2024-06-30");

        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-06-30 15:04:05\"");

        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_timestamp_parses_bare_date() {
        let ts = Timestamp::parse("2024-06-30").unwrap();
        assert_eq!(ts.format_full(), "2024-06-30 00:00:00");
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        assert!(Timestamp::parse("June 30th").is_err());
    }

    #[test]
    fn test_visible_to_wire_values() {
        assert_eq!(
            serde_json::to_string(&VisibleTo::OwnersAndFollowers).unwrap(),
            "1"
        );
        assert_eq!(serde_json::to_string(&VisibleTo::EntireCompany).unwrap(), "3");

        let v: VisibleTo = serde_json::from_str("3").unwrap();
        assert_eq!(v, VisibleTo::EntireCompany);

        assert!(serde_json::from_str::<VisibleTo>("2").is_err());
    }

    #[test]
    fn test_email_defaults() {
        let email: Email = serde_json::from_str(r#"{"value":"a@b.co"}"#).unwrap();
        assert_eq!(email.value, "a@b.co");
        assert!(email.label.is_none());
        assert!(!email.primary);
    }

    #[test]
    fn test_user_summary_tolerates_any_has_pic() {
        // has_pic arrives as a bool on some accounts, a number on others
        let user: UserSummary =
            serde_json::from_str(r#"{"id":1,"name":"Ada","has_pic":false}"#).unwrap();
        assert_eq!(user.has_pic, Value::Bool(false));

        let user: UserSummary =
            serde_json::from_str(r#"{"id":1,"name":"Ada","has_pic":12345}"#).unwrap();
        assert!(user.has_pic.is_number());
    }

    #[test]
    fn test_user_summary_rejects_scalar() {
        let err = serde_json::from_str::<UserSummary>("123").unwrap_err();
        assert!(err.is_data());
    }

    #[test]
    fn test_ids_param() {
        assert_eq!(ids_param(&[1, 2, 3]), "1,2,3");
        assert_eq!(ids_param(&[]), "");
    }
}
