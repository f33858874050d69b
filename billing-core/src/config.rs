//! Configuration for the portal client.

use serde::{Deserialize, Serialize};

use crate::{PortalError, Result};

/// Where the client code is executing.
///
/// The billing backend is only reachable by its internal address from inside
/// the deployment's network, so base-address resolution depends on context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    /// Server-side rendering / backend execution; uses the internal address.
    Server,
    /// Browser-side execution; uses the public address.
    #[default]
    Browser,
}

/// Configuration for the portal client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Public-facing billing API base URL (e.g., "https://api.example.com").
    pub public_api_url: String,

    /// Internal-network billing API base URL, used for server-side calls.
    pub internal_api_url: String,

    /// OAuth client identifier for Google sign-in. Required.
    pub google_client_id: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl PortalConfig {
    /// Create a new configuration.
    ///
    /// The internal API URL defaults to the public one until overridden.
    pub fn new(public_api_url: impl Into<String>, google_client_id: impl Into<String>) -> Self {
        let public_api_url = public_api_url.into();
        Self {
            internal_api_url: public_api_url.clone(),
            public_api_url,
            google_client_id: google_client_id.into(),
            timeout_secs: default_timeout(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// Reads `PORTAL_API_URL`, `PORTAL_INTERNAL_API_URL` (falls back to the
    /// public URL) and `PORTAL_GOOGLE_CLIENT_ID`. A missing OAuth client id is
    /// fatal: no partial functionality is offered without it.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Lookup is injected so tests do not mutate process-wide env state.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let public_api_url = get("PORTAL_API_URL")
            .ok_or_else(|| PortalError::Config("PORTAL_API_URL is not set".to_string()))?;
        let google_client_id = get("PORTAL_GOOGLE_CLIENT_ID").ok_or_else(|| {
            PortalError::Config("PORTAL_GOOGLE_CLIENT_ID is not set".to_string())
        })?;

        let mut config = Self::new(public_api_url, google_client_id);
        if let Some(internal) = get("PORTAL_INTERNAL_API_URL") {
            config.internal_api_url = internal;
        }
        Ok(config)
    }

    /// Set the internal-network API URL.
    pub fn with_internal_api_url(mut self, url: impl Into<String>) -> Self {
        self.internal_api_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Resolve the API base address for the given execution context.
    pub fn base_url(&self, context: ExecutionContext) -> &str {
        match context {
            ExecutionContext::Server => &self.internal_api_url,
            ExecutionContext::Browser => &self.public_api_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = PortalConfig::new("https://api.example.com", "client-id-123")
            .with_internal_api_url("http://billing.internal:3337")
            .with_timeout(60);

        assert_eq!(config.public_api_url, "https://api.example.com");
        assert_eq!(config.internal_api_url, "http://billing.internal:3337");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_internal_url_defaults_to_public() {
        let config = PortalConfig::new("https://api.example.com", "client-id-123");
        assert_eq!(config.internal_api_url, "https://api.example.com");
    }

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_missing_client_id_is_a_config_error() {
        let result = PortalConfig::from_lookup(env(&[(
            "PORTAL_API_URL",
            "https://api.example.com",
        )]));

        match result {
            Err(PortalError::Config(msg)) => {
                assert!(msg.contains("PORTAL_GOOGLE_CLIENT_ID"))
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_api_url_is_a_config_error() {
        let result =
            PortalConfig::from_lookup(env(&[("PORTAL_GOOGLE_CLIENT_ID", "client-id-123")]));
        assert!(matches!(result, Err(PortalError::Config(_))));
    }

    #[test]
    fn test_internal_url_falls_back_to_public_from_env() {
        let config = PortalConfig::from_lookup(env(&[
            ("PORTAL_API_URL", "https://api.example.com"),
            ("PORTAL_GOOGLE_CLIENT_ID", "client-id-123"),
        ]))
        .unwrap();

        assert_eq!(config.internal_api_url, "https://api.example.com");
        assert_eq!(config.google_client_id, "client-id-123");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_internal_url_read_from_env_when_set() {
        let config = PortalConfig::from_lookup(env(&[
            ("PORTAL_API_URL", "https://api.example.com"),
            ("PORTAL_INTERNAL_API_URL", "http://billing.internal:3337"),
            ("PORTAL_GOOGLE_CLIENT_ID", "client-id-123"),
        ]))
        .unwrap();

        assert_eq!(config.internal_api_url, "http://billing.internal:3337");
        assert_eq!(config.public_api_url, "https://api.example.com");
    }

    #[test]
    fn test_base_url_resolution() {
        let config = PortalConfig::new("https://api.example.com", "client-id-123")
            .with_internal_api_url("http://billing.internal:3337");

        assert_eq!(
            config.base_url(ExecutionContext::Browser),
            "https://api.example.com"
        );
        assert_eq!(
            config.base_url(ExecutionContext::Server),
            "http://billing.internal:3337"
        );
    }
}
