//! Billing record commands: list, create, update, delete

use anyhow::Result;
use billing_core::{
    BillingRecord, BillingStore, NewBillingRecord, Premium, RecordFilters, RecordPatch,
};

use crate::commands::PortalContext;
use crate::ui;

fn print_record(record: &BillingRecord) {
    ui::key_value("Id", &record.id.to_string());
    ui::key_value("Product", &record.product_id);
    ui::key_value("Location", &record.location);
    ui::key_value("Premium", &record.premium.to_string());
    ui::key_value("Email", &record.email);
    if !record.first_name.is_empty() || !record.last_name.is_empty() {
        ui::key_value(
            "Name",
            &format!("{} {}", record.first_name, record.last_name),
        );
    }
}

pub async fn list(
    ctx: &mut PortalContext,
    product: Option<String>,
    location: Option<String>,
) -> Result<()> {
    let gateway = ctx.authenticated_gateway()?;

    let mut filters = RecordFilters::default();
    if let Some(product) = product {
        filters = filters.product_code(product);
    }
    if let Some(location) = location {
        filters = filters.location(location);
    }

    let spinner = ui::spinner("Fetching billing records...");
    let mut store = BillingStore::new();
    store.fetch_records(&gateway, &filters).await;
    spinner.finish_and_clear();

    if let Some(error) = store.fetch_error() {
        ui::error(error);
        return Ok(());
    }

    if store.records().is_empty() {
        ui::info("No billing records found");
        return Ok(());
    }

    ui::header(&format!("Billing Records ({})", store.records().len()));
    for record in store.records() {
        println!();
        print_record(record);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    ctx: &mut PortalContext,
    product: String,
    location: String,
    premium: String,
    email: String,
    first_name: String,
    last_name: String,
    photo: String,
) -> Result<()> {
    let gateway = ctx.authenticated_gateway()?;

    let premium = match Premium::from_major_str(&premium) {
        Ok(premium) => premium,
        Err(e) => {
            ui::error(&e.to_string());
            return Ok(());
        }
    };

    let input = NewBillingRecord {
        product_code: product,
        location,
        premium,
        email,
        first_name,
        last_name,
        photo,
    };

    let mut store = BillingStore::new();
    store.create_record(&gateway, &input).await;

    match store.create_error() {
        Some(error) => ui::error(error),
        None => {
            if let Some(created) = store.records().last() {
                ui::success(&format!("Created billing record {}", created.id));
                print_record(created);
            }
        }
    }
    Ok(())
}

pub async fn update(
    ctx: &mut PortalContext,
    id: i64,
    location: Option<String>,
    premium: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let gateway = ctx.authenticated_gateway()?;

    let mut patch = RecordPatch::default();
    if let Some(location) = location {
        patch = patch.location(location);
    }
    if let Some(premium) = premium {
        match Premium::from_major_str(&premium) {
            Ok(premium) => patch = patch.premium(premium),
            Err(e) => {
                ui::error(&e.to_string());
                return Ok(());
            }
        }
    }
    if let Some(email) = email {
        patch = patch.email(email);
    }

    let mut store = BillingStore::new();
    store.update_record(&gateway, id, &patch).await;

    match store.update_error() {
        Some(error) => ui::error(error),
        None => ui::success(&format!("Updated billing record {}", id)),
    }
    Ok(())
}

pub async fn delete(ctx: &mut PortalContext, id: i64, yes: bool) -> Result<()> {
    let gateway = ctx.authenticated_gateway()?;

    if !yes && !ui::confirm(&format!("Delete billing record {}?", id), false)? {
        ui::info("Aborted");
        return Ok(());
    }

    let mut store = BillingStore::new();
    store.delete_record(&gateway, id).await;

    match store.delete_error() {
        Some(error) => ui::error(error),
        None => ui::success(&format!("Deleted billing record {}", id)),
    }
    Ok(())
}
