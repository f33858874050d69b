//! Billing Portal Core Library
//!
//! Client state layer for the insurance billing portal: session management,
//! the billing-record store with independent per-operation error slots,
//! per-record email-visibility coordination, and the authenticated HTTP
//! gateway to the remote billing API.

pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod money;
pub mod records;
pub mod session;
pub mod visibility;

pub use config::{ExecutionContext, PortalConfig};
pub use errors::PortalError;
pub use gateway::{ApiGateway, GatewayFactory};
pub use models::{BillingRecord, NewBillingRecord, RecordFilters, RecordPatch};
pub use money::Premium;
pub use records::{BillingStore, FetchTicket};
pub use session::{
    FileTokenStore, MemoryTokenStore, PersistedSession, SessionStore, TokenStore,
};
pub use visibility::EmailVisibility;

/// Result type for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;
