//! CLI command implementations

pub mod login;
pub mod records;
pub mod reveal;
pub mod whoami;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use billing_core::{
    ApiGateway, ExecutionContext, FileTokenStore, GatewayFactory, PortalConfig, SessionStore,
};

/// Shared state for one CLI invocation: the restored session plus the
/// gateway factory. The CLI runs outside the deployment's network, so it
/// always resolves the public API address.
pub struct PortalContext {
    pub session: SessionStore<FileTokenStore>,
    pub factory: GatewayFactory,
}

impl PortalContext {
    /// Build the context, restoring any persisted session. A missing saved
    /// session is not an error here; commands that need authentication
    /// check for it themselves.
    pub fn new(config: PortalConfig, storage_dir: &Path) -> Self {
        let mut session = SessionStore::new(FileTokenStore::new(storage_dir));
        let _ = session.restore_session();

        Self {
            session,
            factory: GatewayFactory::new(config, ExecutionContext::Browser),
        }
    }

    /// Gateway carrying the current session's bearer token.
    ///
    /// Fails when unauthenticated: every billing operation requires a token.
    pub fn authenticated_gateway(&mut self) -> Result<Arc<ApiGateway>> {
        let token = self
            .session
            .access_token()
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow::anyhow!("Not signed in. Run 'billing-portal login' first.")
            })?;
        Ok(self.factory.gateway(Some(&token))?)
    }

    /// Gateway without a token, for the sign-in exchange.
    pub fn anonymous_gateway(&mut self) -> Result<Arc<ApiGateway>> {
        Ok(self.factory.gateway(None)?)
    }
}
