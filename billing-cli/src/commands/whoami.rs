//! Whoami command - show current session state

use anyhow::Result;

use crate::commands::PortalContext;
use crate::ui;

pub fn run(ctx: &PortalContext) -> Result<()> {
    if ctx.session.is_authenticated() {
        ui::header("Current Session");
        ui::key_value("Email", ctx.session.email().unwrap_or("<unknown>"));
        ui::key_value("Authenticated", "yes");
    } else {
        ui::error("Not signed in");
        ui::info("Run 'billing-portal login' to sign in");
    }
    Ok(())
}
