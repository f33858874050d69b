//! Login and logout commands

use anyhow::Result;

use crate::commands::PortalContext;
use crate::ui;

/// Sign in with a Google identity credential, or directly with an email
/// address for development against backends that skip credential checks.
pub async fn login(
    ctx: &mut PortalContext,
    credential: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let gateway = ctx.anonymous_gateway()?;

    let result = match (credential, email) {
        (Some(credential), _) => ctx.session.sign_in(&gateway, &credential).await,
        (None, Some(email)) => ctx.session.sign_in_with_email(&gateway, &email).await,
        (None, None) => {
            ui::error("Provide --credential <JWT> or --email <address>");
            return Ok(());
        }
    };

    match result {
        Ok(()) => {
            ui::success(&format!(
                "Signed in as {}",
                ctx.session.email().unwrap_or("<unknown>")
            ));
        }
        Err(e) => {
            ui::error(&format!("Sign in failed: {}", e));
        }
    }
    Ok(())
}

/// Sign out, clearing the in-memory and persisted session.
pub fn logout(ctx: &mut PortalContext) -> Result<()> {
    ctx.session.sign_out();
    ui::success("Signed out");
    Ok(())
}
