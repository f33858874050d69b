//! Client-side store for billing records.
//!
//! Holds the record list in server response order plus four independent
//! error slots, one per operation category, so concurrent operations never
//! clobber each other's error feedback. Operations settle without
//! propagating errors; callers inspect the relevant slot afterwards.

use tracing::{debug, warn};

use crate::models::{
    BillingRecordDto, NewBillingRecord, RecordFilters, RecordPatch, RecordsResponse,
};
use crate::{ApiGateway, BillingRecord, Result};

const RECORDS_PATH: &str = "billing";

/// Ticket identifying one issued fetch. Only the latest ticket's response
/// is applied; anything older is discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// State container for billing records.
#[derive(Default)]
pub struct BillingStore {
    records: Vec<BillingRecord>,
    loading: bool,
    fetch_error: Option<String>,
    create_error: Option<String>,
    update_error: Option<String>,
    delete_error: Option<String>,
    fetch_seq: u64,
}

impl BillingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in server response order; not re-sorted client-side.
    pub fn records(&self) -> &[BillingRecord] {
        &self.records
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    pub fn create_error(&self) -> Option<&str> {
        self.create_error.as_deref()
    }

    pub fn update_error(&self) -> Option<&str> {
        self.update_error.as_deref()
    }

    pub fn delete_error(&self) -> Option<&str> {
        self.delete_error.as_deref()
    }

    /// Reset all four error slots.
    pub fn clear_errors(&mut self) {
        self.fetch_error = None;
        self.create_error = None;
        self.update_error = None;
        self.delete_error = None;
    }

    /// Fetch records with the given filters, replacing the whole list on
    /// success. On failure the current list is left untouched
    /// (stale-but-available) and `fetch_error` is set.
    pub async fn fetch_records(&mut self, gateway: &ApiGateway, filters: &RecordFilters) {
        let ticket = self.begin_fetch();
        let result = Self::request_records(gateway, filters).await;
        self.finish_fetch(ticket, result);
    }

    /// Start a fetch: sets `loading`, clears `fetch_error`, and issues a
    /// ticket. Exposed separately from [`finish_fetch`](Self::finish_fetch)
    /// so overlapping fetches can be driven (and tested) explicitly.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_seq += 1;
        self.loading = true;
        self.fetch_error = None;
        FetchTicket(self.fetch_seq)
    }

    /// Apply a fetch outcome. A response whose ticket is no longer the
    /// latest issued is discarded entirely: a newer fetch owns the loading
    /// flag and the list, and stale data must not overwrite fresh data.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<BillingRecord>>) {
        if ticket.0 != self.fetch_seq {
            debug!(
                ticket = ticket.0,
                latest = self.fetch_seq,
                "discarding stale fetch response"
            );
            return;
        }

        self.loading = false;
        match result {
            Ok(records) => {
                self.records = records;
                self.fetch_error = None;
            }
            Err(e) => {
                warn!("fetch failed: {}", e);
                self.fetch_error = Some(e.user_message());
            }
        }
    }

    async fn request_records(
        gateway: &ApiGateway,
        filters: &RecordFilters,
    ) -> Result<Vec<BillingRecord>> {
        let response: RecordsResponse = gateway.get(RECORDS_PATH, &filters.query()).await?;
        Ok(response
            .records
            .into_iter()
            .map(BillingRecordDto::normalize)
            .collect())
    }

    /// Create a record. On success the normalized backend record is appended
    /// and `create_error` cleared; on failure `create_error` is set (401
    /// distinguished as a re-auth message) and the list is untouched.
    pub async fn create_record(&mut self, gateway: &ApiGateway, input: &NewBillingRecord) {
        let result: Result<BillingRecordDto> =
            gateway.post(RECORDS_PATH, &input.payload()).await;

        match result {
            Ok(dto) => {
                self.records.push(dto.normalize());
                self.create_error = None;
            }
            Err(e) => {
                warn!("create failed: {}", e);
                self.create_error = Some(e.user_message());
            }
        }
    }

    /// Update a record with a partial payload; only set fields are sent.
    /// On success the matching record is replaced in place. A result for an
    /// id no longer in the list is silently dropped.
    pub async fn update_record(&mut self, gateway: &ApiGateway, id: i64, patch: &RecordPatch) {
        let query = [("id", id.to_string())];
        let result: Result<BillingRecordDto> =
            gateway.put(RECORDS_PATH, &query, &patch.payload()).await;

        match result {
            Ok(dto) => {
                let updated = dto.normalize();
                if let Some(existing) =
                    self.records.iter_mut().find(|r| r.id == updated.id)
                {
                    *existing = updated;
                }
                self.update_error = None;
            }
            Err(e) => {
                warn!(id, "update failed: {}", e);
                self.update_error = Some(e.user_message());
            }
        }
    }

    /// Delete a record by id. On success exactly that record is removed and
    /// `delete_error` cleared; on failure the record stays present so the
    /// error can be rendered next to it.
    pub async fn delete_record(&mut self, gateway: &ApiGateway, id: i64) {
        let query = [("id", id.to_string())];
        match gateway.delete(RECORDS_PATH, &query).await {
            Ok(()) => {
                self.records.retain(|r| r.id != id);
                self.delete_error = None;
            }
            Err(e) => {
                warn!(id, "delete failed: {}", e);
                self.delete_error = Some(e.user_message());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PortalError, Premium};
    use chrono::{TimeZone, Utc};

    fn record(id: i64) -> BillingRecord {
        BillingRecord {
            id,
            product_id: "P1".to_string(),
            location: "NY".to_string(),
            premium: Premium::from_minor(1000),
            email: "j***@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            photo: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_fetch_failure_keeps_stale_records() {
        let mut store = BillingStore::new();
        let ticket = store.begin_fetch();
        store.finish_fetch(ticket, Ok(vec![record(1), record(2)]));

        let ticket = store.begin_fetch();
        assert!(store.loading());
        store.finish_fetch(
            ticket,
            Err(PortalError::Transport("connection reset".to_string())),
        );

        assert!(!store.loading());
        assert_eq!(store.records().len(), 2);
        assert!(store.fetch_error().unwrap().contains("connection reset"));
    }

    #[test]
    fn test_stale_fetch_response_is_discarded() {
        let mut store = BillingStore::new();

        // A slow fetch starts first, a faster one starts after it.
        let slow = store.begin_fetch();
        let fast = store.begin_fetch();

        // The fast fetch resolves first with fresh data.
        store.finish_fetch(fast, Ok(vec![record(1), record(2)]));
        assert_eq!(store.records().len(), 2);
        assert!(!store.loading());

        // The slow fetch resolves later with stale data; it must not win.
        store.finish_fetch(slow, Ok(vec![record(9)]));
        assert_eq!(store.records().len(), 2);
        assert_eq!(store.records()[0].id, 1);
    }

    #[test]
    fn test_stale_error_does_not_clobber_fresh_success() {
        let mut store = BillingStore::new();

        let slow = store.begin_fetch();
        let fast = store.begin_fetch();

        store.finish_fetch(fast, Ok(vec![record(1)]));
        store.finish_fetch(slow, Err(PortalError::SessionExpired));

        assert!(store.fetch_error().is_none());
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn test_begin_fetch_clears_only_fetch_error() {
        let mut store = BillingStore::new();
        store.create_error = Some("create failed".to_string());
        store.fetch_error = Some("old fetch error".to_string());

        store.begin_fetch();

        assert!(store.fetch_error().is_none());
        assert_eq!(store.create_error(), Some("create failed"));
    }

    #[test]
    fn test_clear_errors_resets_all_slots() {
        let mut store = BillingStore::new();
        store.fetch_error = Some("a".to_string());
        store.create_error = Some("b".to_string());
        store.update_error = Some("c".to_string());
        store.delete_error = Some("d".to_string());

        store.clear_errors();

        assert!(store.fetch_error().is_none());
        assert!(store.create_error().is_none());
        assert!(store.update_error().is_none());
        assert!(store.delete_error().is_none());
    }
}
