//! Reveal command - show the unmasked email for one record

use anyhow::Result;
use billing_core::{BillingStore, EmailVisibility, RecordFilters};

use crate::commands::PortalContext;
use crate::ui;

/// Fetch the record list, then request the unmasked address for one record.
/// The value is printed and immediately discarded; nothing is cached.
pub async fn run(ctx: &mut PortalContext, id: i64) -> Result<()> {
    let gateway = ctx.authenticated_gateway()?;

    let mut store = BillingStore::new();
    store.fetch_records(&gateway, &RecordFilters::default()).await;
    if let Some(error) = store.fetch_error() {
        ui::error(error);
        return Ok(());
    }

    let Some(record) = store.records().iter().find(|r| r.id == id) else {
        ui::error(&format!("No billing record with id {}", id));
        return Ok(());
    };

    let mut visibility = EmailVisibility::new();
    visibility.toggle(id);
    if let Err(e) = visibility.reveal(&gateway, id).await {
        ui::error(&format!("Could not reveal email: {}", e));
        return Ok(());
    }

    ui::key_value("Masked", &record.email);
    ui::key_value("Revealed", visibility.display_email(record));
    Ok(())
}
