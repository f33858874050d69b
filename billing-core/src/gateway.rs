//! Authenticated HTTP client facade for the billing backend.
//!
//! [`ApiGateway`] binds a configured `reqwest` client to a base address and
//! an optional bearer token. Construction goes through [`GatewayFactory`]
//! rather than a process-wide singleton: one cached gateway per token,
//! rebuilt whenever the token changes so a stale Authorization header can
//! never leak across sessions.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::{ExecutionContext, PortalConfig, PortalError, Result};

/// Authenticated HTTP client for the billing backend.
pub struct ApiGateway {
    config: PortalConfig,
    context: ExecutionContext,
    token: Option<String>,
    client: reqwest::Client,
}

impl ApiGateway {
    /// Create a gateway bound to the given config, context and token.
    pub fn new(
        config: PortalConfig,
        context: ExecutionContext,
        token: Option<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PortalError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            context,
            token,
            client,
        })
    }

    /// The bearer token this gateway was constructed with, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Build the full URL for an API endpoint.
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url(self.context).trim_end_matches('/'),
            path
        )
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request with query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(path, "GET");
        let request = self.with_auth(self.client.get(self.url(path)).query(query));
        let response = request.send().await.map_err(|e| self.map_reqwest_error(e))?;
        self.handle_response(response).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        debug!(path, "POST");
        let request = self.with_auth(self.client.post(self.url(path)).json(body));
        let response = request.send().await.map_err(|e| self.map_reqwest_error(e))?;
        self.handle_response(response).await
    }

    /// Make a PUT request with query parameters and a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T> {
        debug!(path, "PUT");
        let request = self.with_auth(self.client.put(self.url(path)).query(query).json(body));
        let response = request.send().await.map_err(|e| self.map_reqwest_error(e))?;
        self.handle_response(response).await
    }

    /// Make a DELETE request with query parameters.
    pub async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<()> {
        debug!(path, "DELETE");
        let request = self.with_auth(self.client.delete(self.url(path)).query(query));
        let response = request.send().await.map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.map_status_error(status.as_u16(), &error_text));
        }
        Ok(())
    }

    /// Handle an HTTP response, parsing JSON or returning an error.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.map_status_error(status.as_u16(), &error_text));
        }

        response.json::<T>().await.map_err(|e| {
            PortalError::Serialization(format!("Failed to parse backend response: {}", e))
        })
    }

    /// Map HTTP status codes to PortalError.
    ///
    /// 401 is surfaced as an auth error so the UI can prompt re-authentication
    /// instead of showing a generic failure.
    fn map_status_error(&self, status: u16, error_text: &str) -> PortalError {
        match status {
            400 => PortalError::InvalidData {
                field: "request".to_string(),
                reason: error_text.to_string(),
            },
            401 => PortalError::Auth(if error_text.is_empty() {
                "missing or expired token".to_string()
            } else {
                error_text.to_string()
            }),
            404 => PortalError::NotFound {
                resource_type: "billing resource".to_string(),
                identifier: error_text.to_string(),
            },
            500..=599 => {
                PortalError::Internal(format!("backend error ({}): {}", status, error_text))
            }
            _ => PortalError::Transport(format!("request failed ({}): {}", status, error_text)),
        }
    }

    /// Map reqwest errors to PortalError.
    fn map_reqwest_error(&self, e: reqwest::Error) -> PortalError {
        if e.is_timeout() {
            PortalError::ConnectionTimeout {
                operation: "billing request".to_string(),
                timeout_ms: self.config.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            PortalError::ConnectionFailed {
                target: self.config.base_url(self.context).to_string(),
                reason: e.to_string(),
            }
        } else {
            PortalError::Transport(format!("request failed: {}", e))
        }
    }
}

/// Explicit factory for [`ApiGateway`] instances.
///
/// `gateway(token)` is idempotent for an unchanged token (returns the cached
/// gateway) and builds a fresh one when the token differs.
pub struct GatewayFactory {
    config: PortalConfig,
    context: ExecutionContext,
    cached: Option<Arc<ApiGateway>>,
}

impl GatewayFactory {
    pub fn new(config: PortalConfig, context: ExecutionContext) -> Self {
        Self {
            config,
            context,
            cached: None,
        }
    }

    /// Get a gateway for the given token, reusing the cached one while the
    /// token is unchanged.
    pub fn gateway(&mut self, token: Option<&str>) -> Result<Arc<ApiGateway>> {
        if let Some(cached) = &self.cached {
            if cached.token() == token {
                return Ok(Arc::clone(cached));
            }
            debug!("token changed, rebuilding API client");
        }

        let gateway = Arc::new(ApiGateway::new(
            self.config.clone(),
            self.context,
            token.map(str::to_string),
        )?);
        self.cached = Some(Arc::clone(&gateway));
        Ok(gateway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PortalConfig {
        PortalConfig::new("https://api.example.com/", "client-id")
            .with_internal_api_url("http://billing.internal:3337")
    }

    #[test]
    fn test_url_building() {
        let gateway =
            ApiGateway::new(test_config(), ExecutionContext::Browser, None).unwrap();
        assert_eq!(gateway.url("billing"), "https://api.example.com/billing");
    }

    #[test]
    fn test_server_context_uses_internal_address() {
        let gateway = ApiGateway::new(test_config(), ExecutionContext::Server, None).unwrap();
        assert_eq!(
            gateway.url("billing"),
            "http://billing.internal:3337/billing"
        );
    }

    #[test]
    fn test_status_mapping() {
        let gateway = ApiGateway::new(test_config(), ExecutionContext::Browser, None).unwrap();

        assert!(gateway.map_status_error(401, "").is_auth_error());
        assert!(matches!(
            gateway.map_status_error(404, "42"),
            PortalError::NotFound { .. }
        ));
        assert!(matches!(
            gateway.map_status_error(503, "down"),
            PortalError::Internal(_)
        ));
    }

    #[test]
    fn test_factory_reuses_gateway_for_same_token() {
        let mut factory = GatewayFactory::new(test_config(), ExecutionContext::Browser);

        let a = factory.gateway(Some("token-1")).unwrap();
        let b = factory.gateway(Some("token-1")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_factory_rebuilds_on_token_change() {
        let mut factory = GatewayFactory::new(test_config(), ExecutionContext::Browser);

        let a = factory.gateway(Some("token-1")).unwrap();
        let b = factory.gateway(Some("token-2")).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b.token(), Some("token-2"));

        let c = factory.gateway(None).unwrap();
        assert!(!Arc::ptr_eq(&b, &c));
        assert_eq!(c.token(), None);
    }
}
