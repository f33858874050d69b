//! Data models for billing records.
//!
//! Two layers: wire DTOs matching the backend's JSON (camelCase, money in
//! minor units, emails pre-masked by the server) and the domain
//! [`BillingRecord`] held in client state (money in major units, string
//! fields defaulted to empty).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Premium;

/// A billing record as held in client state.
///
/// `premium` is always in major units here; the wire representation uses
/// integer cents. `email` carries the server-masked form unless a reveal has
/// been requested through the visibility coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    /// Backend-assigned identifier, immutable after creation.
    pub id: i64,
    /// Insurance product code, immutable after creation.
    pub product_id: String,
    pub location: String,
    /// Premium paid, in major currency units.
    pub premium: Premium,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A billing record as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingRecordDto {
    pub id: i64,
    pub product_id: String,
    #[serde(default)]
    pub location: String,
    /// Money in minor units (integer cents).
    pub premium_paid_amount: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub photo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BillingRecordDto {
    /// Normalize an inbound record: divide the amount by 100 into major
    /// units and default absent string fields to empty strings.
    pub fn normalize(self) -> BillingRecord {
        BillingRecord {
            id: self.id,
            product_id: self.product_id,
            location: self.location,
            premium: Premium::from_minor(self.premium_paid_amount),
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            photo: self.photo,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Response envelope for the record list endpoint.
#[derive(Debug, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<BillingRecordDto>,
}

/// Response for a single-record email reveal.
#[derive(Debug, Deserialize)]
pub struct RevealResponse {
    pub email: String,
}

/// Input for creating a billing record.
#[derive(Debug, Clone)]
pub struct NewBillingRecord {
    pub product_code: String,
    pub location: String,
    /// Premium in major units; multiplied by 100 before transmission.
    pub premium: Premium,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: String,
}

/// Outbound create payload (money in minor units).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateRecordPayload<'a> {
    pub product_id: &'a str,
    pub location: &'a str,
    pub premium_paid_amount: i64,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub photo: &'a str,
}

impl NewBillingRecord {
    pub(crate) fn payload(&self) -> CreateRecordPayload<'_> {
        CreateRecordPayload {
            product_id: &self.product_code,
            location: &self.location,
            premium_paid_amount: self.premium.as_minor(),
            email: &self.email,
            first_name: &self.first_name,
            last_name: &self.last_name,
            photo: &self.photo,
        }
    }
}

/// Partial update for a billing record.
///
/// Only fields that are set are transmitted; the backend preserves the rest.
/// The product code has no update path in this client.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub location: Option<String>,
    pub premium: Option<Premium>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo: Option<String>,
}

impl RecordPatch {
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn premium(mut self, premium: Premium) -> Self {
        self.premium = Some(premium);
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    pub(crate) fn payload(&self) -> UpdateRecordPayload<'_> {
        UpdateRecordPayload {
            location: self.location.as_deref(),
            premium_paid_amount: self.premium.map(|p| p.as_minor()),
            email: self.email.as_deref(),
            first_name: self.first_name.as_deref(),
            last_name: self.last_name.as_deref(),
            photo: self.photo.as_deref(),
        }
    }
}

/// Outbound update payload; `None` fields are omitted entirely.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateRecordPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium_paid_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<&'a str>,
}

/// Filters for the record list endpoint.
#[derive(Debug, Clone, Default)]
pub struct RecordFilters {
    pub product_code: Option<String>,
    pub location: Option<String>,
}

impl RecordFilters {
    pub fn product_code(mut self, code: impl Into<String>) -> Self {
        self.product_code = Some(code.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Query pairs for the fetch request. Unset filters are omitted
    /// entirely, never sent as empty strings.
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(code) = &self.product_code {
            if !code.is_empty() {
                pairs.push(("productCode", code.clone()));
            }
        }
        if let Some(location) = &self.location {
            if !location.is_empty() {
                pairs.push(("location", location.clone()));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(id: i64) -> BillingRecordDto {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "productId": "P1",
            "location": "NY",
            "premiumPaidAmount": 1234,
            "email": "j***@example.com",
            "firstName": "Jane",
            "lastName": "Doe",
            "photo": "",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_normalize_converts_to_major_units() {
        let record = dto(1).normalize();
        assert_eq!(record.premium, Premium::from_minor(1234));
        assert_eq!(record.premium.to_string(), "12.34");
    }

    #[test]
    fn test_dto_defaults_absent_strings() {
        let dto: BillingRecordDto = serde_json::from_value(serde_json::json!({
            "id": 7,
            "productId": "P2",
            "premiumPaidAmount": 500,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        let record = dto.normalize();
        assert_eq!(record.email, "");
        assert_eq!(record.first_name, "");
        assert_eq!(record.last_name, "");
        assert_eq!(record.photo, "");
        assert_eq!(record.location, "");
    }

    #[test]
    fn test_create_payload_uses_minor_units() {
        let input = NewBillingRecord {
            product_code: "P1".to_string(),
            location: "NY".to_string(),
            premium: Premium::from_major_str("12.34").unwrap(),
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            photo: String::new(),
        };

        let json = serde_json::to_value(input.payload()).unwrap();
        assert_eq!(json["premiumPaidAmount"], 1234);
        assert_eq!(json["productId"], "P1");
    }

    #[test]
    fn test_patch_payload_omits_unset_fields() {
        let patch = RecordPatch::default().location("NY");
        let json = serde_json::to_value(patch.payload()).unwrap();

        assert_eq!(json["location"], "NY");
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("email"));
        assert!(!obj.contains_key("premiumPaidAmount"));
        assert!(!obj.contains_key("firstName"));
    }

    #[test]
    fn test_patch_setters_cover_every_mutable_field() {
        let patch = RecordPatch::default()
            .location("NY")
            .premium(Premium::from_minor(500))
            .email("jane@example.com")
            .first_name("Jane")
            .last_name("Doe")
            .photo("avatar.png");

        let json = serde_json::to_value(patch.payload()).unwrap();
        assert_eq!(json["location"], "NY");
        assert_eq!(json["premiumPaidAmount"], 500);
        assert_eq!(json["email"], "jane@example.com");
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["lastName"], "Doe");
        assert_eq!(json["photo"], "avatar.png");
    }

    #[test]
    fn test_filters_omit_unset_and_empty() {
        let filters = RecordFilters::default().product_code("P1");
        assert_eq!(filters.query(), vec![("productCode", "P1".to_string())]);

        let empty = RecordFilters::default().product_code("P1").location("");
        assert_eq!(empty.query(), vec![("productCode", "P1".to_string())]);

        assert!(RecordFilters::default().query().is_empty());
    }
}
