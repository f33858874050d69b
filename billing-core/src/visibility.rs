//! Per-record email visibility coordination.
//!
//! The default list response carries server-masked emails. Revealing a
//! record's true address is an explicit, per-record action: the unmasked
//! value is fetched lazily and discarded again the moment the record is
//! hidden, so sensitive data sits in client memory for the minimum time.
//! Nothing here is cached across hide/show cycles.

use std::collections::HashMap;

use crate::models::RevealResponse;
use crate::{ApiGateway, BillingRecord, Result};

const REVEAL_PATH: &str = "billing/email";

/// Visibility map from record id to a "reveal" flag, independent of record
/// data. Absent entries are masked. Entries are never pruned when a record
/// is deleted; lookups on a nonexistent id are harmless no-ops.
#[derive(Default)]
pub struct EmailVisibility {
    visible: HashMap<i64, bool>,
    revealed: HashMap<i64, String>,
}

impl EmailVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag for `id` and return the new state. Hiding discards any
    /// fetched unmasked value.
    pub fn toggle(&mut self, id: i64) -> bool {
        let flag = self.visible.entry(id).or_insert(false);
        *flag = !*flag;
        let now_visible = *flag;
        if !now_visible {
            self.revealed.remove(&id);
        }
        now_visible
    }

    /// Current flag for `id`; absent entries are masked.
    pub fn is_visible(&self, id: i64) -> bool {
        self.visible.get(&id).copied().unwrap_or(false)
    }

    /// Set the flag explicitly. Setting to hidden discards the unmasked
    /// value, same as toggling off.
    pub fn set_visible(&mut self, id: i64, visible: bool) {
        self.visible.insert(id, visible);
        if !visible {
            self.revealed.remove(&id);
        }
    }

    /// Hide everything and discard all unmasked values.
    pub fn reset(&mut self) {
        self.visible.clear();
        self.revealed.clear();
    }

    /// Fetch the unmasked email for one record from the backend.
    ///
    /// Call after toggling a record visible; the value is held only until
    /// the record is hidden again.
    pub async fn reveal(&mut self, gateway: &ApiGateway, id: i64) -> Result<()> {
        let query = [("id", id.to_string())];
        let response: RevealResponse = gateway.get(REVEAL_PATH, &query).await?;
        self.revealed.insert(id, response.email);
        Ok(())
    }

    /// The email to display for a record: the fetched unmasked value when
    /// the record is visible and a reveal has completed, the server-masked
    /// value otherwise. Never both.
    pub fn display_email<'a>(&'a self, record: &'a BillingRecord) -> &'a str {
        if self.is_visible(record.id) {
            if let Some(unmasked) = self.revealed.get(&record.id) {
                return unmasked;
            }
        }
        &record.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Premium;
    use chrono::{TimeZone, Utc};

    fn record(id: i64, email: &str) -> BillingRecord {
        BillingRecord {
            id,
            product_id: "P1".to_string(),
            location: "NY".to_string(),
            premium: Premium::from_minor(1000),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            photo: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_absent_entries_are_masked() {
        let visibility = EmailVisibility::new();
        assert!(!visibility.is_visible(42));
    }

    #[test]
    fn test_toggle_is_self_inverse() {
        let mut visibility = EmailVisibility::new();

        assert!(visibility.toggle(1));
        assert!(visibility.is_visible(1));

        assert!(!visibility.toggle(1));
        assert!(!visibility.is_visible(1));
    }

    #[test]
    fn test_hiding_discards_unmasked_value() {
        let mut visibility = EmailVisibility::new();
        let masked = record(1, "j***@example.com");

        visibility.toggle(1);
        visibility
            .revealed
            .insert(1, "jane@example.com".to_string());
        assert_eq!(visibility.display_email(&masked), "jane@example.com");

        visibility.toggle(1);
        assert_eq!(visibility.display_email(&masked), "j***@example.com");

        // Re-showing does not resurrect the old value; a fresh reveal
        // fetch is required.
        visibility.toggle(1);
        assert_eq!(visibility.display_email(&masked), "j***@example.com");
    }

    #[test]
    fn test_display_is_masked_before_reveal_completes() {
        let mut visibility = EmailVisibility::new();
        let masked = record(1, "j***@example.com");

        visibility.toggle(1);
        assert_eq!(visibility.display_email(&masked), "j***@example.com");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut visibility = EmailVisibility::new();
        visibility.toggle(1);
        visibility.toggle(2);
        visibility.revealed.insert(1, "jane@example.com".to_string());

        visibility.reset();

        assert!(!visibility.is_visible(1));
        assert!(!visibility.is_visible(2));
        assert!(visibility.revealed.is_empty());
    }
}
