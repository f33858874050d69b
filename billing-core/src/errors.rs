//! Error types for portal client operations.
//!
//! This module provides structured error types for the billing portal client,
//! enabling precise error handling and user-facing error messages.

use std::fmt;

/// Comprehensive error type for portal client operations.
#[derive(Debug)]
pub enum PortalError {
    /// Required configuration is missing or invalid. Fatal at startup.
    Config(String),

    /// Transport/network layer error.
    Transport(String),

    /// Connection failed.
    ConnectionFailed {
        /// Target endpoint or service
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// Connection timeout.
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Authentication or authorization failed (HTTP 401).
    Auth(String),

    /// Session expired, needs re-authentication.
    SessionExpired,

    /// Invalid credentials provided.
    InvalidCredentials(String),

    /// Resource not found (record, session, etc.).
    NotFound {
        /// Type of resource (e.g., "record", "session")
        resource_type: String,
        /// Resource identifier
        identifier: String,
    },

    /// Invalid data provided.
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Serialization/deserialization error.
    Serialization(String),

    /// Token persistence failed.
    Storage(String),

    /// Internal/unexpected error (includes backend 5xx).
    Internal(String),
}

impl PortalError {
    /// Returns true if this error means the user must re-authenticate.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Auth(_) | Self::SessionExpired | Self::InvalidCredentials(_)
        )
    }

    /// The human-readable message stored in a store's error slot.
    ///
    /// Auth failures are surfaced distinctly so the UI can prompt for
    /// re-authentication instead of showing a generic message.
    pub fn user_message(&self) -> String {
        if self.is_auth_error() {
            "Unauthorized: please sign in again".to_string()
        } else {
            self.to_string()
        }
    }

    /// Create a transport error from any error type.
    pub fn transport<E: std::error::Error>(err: E) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create a not found error.
    pub fn not_found(resource_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::ConnectionFailed { target, reason } => {
                write!(f, "connection to {} failed: {}", target, reason)
            }
            Self::ConnectionTimeout {
                operation,
                timeout_ms,
            } => {
                write!(f, "{} timed out after {}ms", operation, timeout_ms)
            }
            Self::Auth(msg) => write!(f, "authentication error: {}", msg),
            Self::SessionExpired => write!(f, "session expired, please re-authenticate"),
            Self::InvalidCredentials(msg) => write!(f, "invalid credentials: {}", msg),
            Self::NotFound {
                resource_type,
                identifier,
            } => {
                write!(f, "{} not found: {}", resource_type, identifier)
            }
            Self::InvalidData { field, reason } => {
                write!(f, "invalid {}: {}", field, reason)
            }
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Self::Storage(msg) => write!(f, "storage error: {}", msg),
            Self::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for PortalError {}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_share_reauth_message() {
        let unauthorized = PortalError::Auth("token rejected".to_string());
        let expired = PortalError::SessionExpired;

        assert!(unauthorized.is_auth_error());
        assert!(expired.is_auth_error());
        assert_eq!(unauthorized.user_message(), "Unauthorized: please sign in again");
        assert_eq!(expired.user_message(), unauthorized.user_message());
    }

    #[test]
    fn test_generic_errors_keep_their_message() {
        let err = PortalError::Transport("connection reset".to_string());
        assert!(!err.is_auth_error());
        assert!(err.user_message().contains("connection reset"));
    }

    #[test]
    fn test_helper_constructors() {
        let err = PortalError::not_found("record", "42");
        assert!(err.to_string().contains("record not found: 42"));

        let err = PortalError::invalid_data("premium", "must be positive");
        assert!(err.to_string().contains("invalid premium"));
    }
}
