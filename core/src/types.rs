//! Domain DTOs for the rental API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch schema drift between the two crates.
//!
//! Rental records arrive with several contact-field spellings. They are
//! deserialized into a private wire shape and normalized once, in
//! `RentalRecord::from(WireRentalRecord)`, so the rest of the crate only sees
//! the canonical record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Whether a bike can currently be reserved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
}

/// A bike in the rental catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bike {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rate_per_day_cents: i64,
    pub availability_status: AvailabilityStatus,
}

impl Bike {
    pub fn is_available(&self) -> bool {
        self.availability_status == AvailabilityStatus::Available
    }
}

/// Payload for `POST /api/rentals`.
///
/// The bike id is sent as both `selected_bike` and `bike_id`; the backend
/// contract has not said which one it reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RentalRequest {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub selected_bike: i64,
    pub bike_id: i64,
    pub total_price_cents: i64,
    pub duration_days: i64,
}

/// The part of a create-rental response the client relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedRental {
    pub id: i64,
}

/// Client-computed rental summary handed from the form to the confirmation
/// page before the server record is available.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RentalPreview {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub selected_bike: Option<i64>,
    pub bike_name: Option<String>,
    pub total_price_cents: Option<i64>,
    pub duration_days: Option<i64>,
}

/// A rental as returned by `GET /api/rentals/{id}`, normalized.
///
/// Blank strings and values of the wrong JSON type are treated as absent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RentalRecord {
    pub id: i64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_price_cents: Option<i64>,
    pub bike_id: Option<i64>,
    pub user_id: Option<i64>,
    pub bike_name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl<'de> Deserialize<'de> for RentalRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        WireRentalRecord::deserialize(deserializer).map(RentalRecord::from)
    }
}

#[derive(Deserialize)]
struct WireRentalRecord {
    id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    total_price_cents: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    bike_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    user_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    bike_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    customer_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    customer_phone: Option<String>,
}

impl From<WireRentalRecord> for RentalRecord {
    fn from(wire: WireRentalRecord) -> Self {
        Self {
            id: wire.id,
            start_date: wire.start_date,
            end_date: wire.end_date,
            total_price_cents: wire.total_price_cents,
            bike_id: wire.bike_id,
            user_id: wire.user_id,
            bike_name: wire.bike_name,
            contact_name: wire.name.or(wire.customer_name),
            contact_email: wire.email.or(wire.customer_email),
            contact_phone: wire.phone.or(wire.customer_phone),
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(non_blank))
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_i64))
}

/// Trimmed copy of `s`, or `None` when nothing is left.
pub fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bike_reads_type_field() {
        let bike: Bike = serde_json::from_str(
            r#"{"id":3,"name":"Trail Blazer","type":"mountain","rate_per_day_cents":2500,"availability_status":"unavailable"}"#,
        )
        .unwrap();
        assert_eq!(bike.kind, "mountain");
        assert!(!bike.is_available());
    }

    #[test]
    fn unknown_availability_is_rejected() {
        let result: Result<Bike, _> = serde_json::from_str(
            r#"{"id":3,"name":"x","type":"y","rate_per_day_cents":1,"availability_status":"maybe"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn request_omits_missing_phone_and_sends_both_bike_fields() {
        let request = RentalRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-03".to_string(),
            selected_bike: 7,
            bike_id: 7,
            total_price_cents: 3000,
            duration_days: 2,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("phone").is_none());
        assert_eq!(json["selected_bike"], 7);
        assert_eq!(json["bike_id"], 7);
    }

    #[test]
    fn record_prefers_plain_contact_spelling() {
        let record: RentalRecord = serde_json::from_str(
            r#"{"id":1,"name":"Ada","customer_name":"Lovelace","customer_email":"ada@example.com"}"#,
        )
        .unwrap();
        assert_eq!(record.contact_name.as_deref(), Some("Ada"));
        assert_eq!(record.contact_email.as_deref(), Some("ada@example.com"));
        assert!(record.contact_phone.is_none());
    }

    #[test]
    fn record_skips_blank_and_mistyped_values() {
        let record: RentalRecord = serde_json::from_str(
            r#"{"id":1,"name":"   ","customer_name":"Grace","phone":null,"customer_phone":12345,"bike_name":"","total_price_cents":"3000"}"#,
        )
        .unwrap();
        assert_eq!(record.contact_name.as_deref(), Some("Grace"));
        assert!(record.contact_phone.is_none());
        assert!(record.bike_name.is_none());
        assert!(record.total_price_cents.is_none());
    }

    #[test]
    fn record_requires_id() {
        let result: Result<RentalRecord, _> = serde_json::from_str(r#"{"start_date":"2024-01-01"}"#);
        assert!(result.is_err());
    }
}
