//! Session management: sign-in, restore, sign-out, token persistence.
//!
//! The session holds a bearer token and the authenticated email. Both are
//! persisted together through a [`TokenStore`] so a page reload (or a new
//! CLI invocation) can restore the session without re-authenticating; the
//! token's validity is only discovered lazily on the first authenticated
//! API call.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::{ApiGateway, PortalError, Result};

/// The two key-value entries that survive restarts: written together on
/// sign-in, cleared together on sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub access_token: String,
    pub email: String,
}

/// Key-value persistence for the session token and email.
pub trait TokenStore {
    fn load(&self) -> Result<Option<PersistedSession>>;
    fn save(&self, session: &PersistedSession) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// JSON-file-backed token store.
///
/// Not encrypted at rest; suitable for the same trust level as browser
/// local storage, which is what it stands in for.
pub struct FileTokenStore {
    storage_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: storage_dir.as_ref().to_path_buf(),
        }
    }

    fn session_path(&self) -> PathBuf {
        self.storage_dir.join("session.json")
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<PersistedSession>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path)
            .map_err(|e| PortalError::Storage(format!("failed to read session: {}", e)))?;
        let session = serde_json::from_str(&json)?;
        Ok(Some(session))
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        std::fs::create_dir_all(&self.storage_dir)
            .map_err(|e| PortalError::Storage(format!("failed to create storage dir: {}", e)))?;
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(self.session_path(), json)
            .map_err(|e| PortalError::Storage(format!("failed to write session: {}", e)))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| PortalError::Storage(format!("failed to clear session: {}", e)))?;
        }
        Ok(())
    }
}

/// In-memory token store for tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    session: Mutex<Option<PersistedSession>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<PersistedSession>> {
        Ok(self
            .session
            .lock()
            .map_err(|_| PortalError::Storage("token store lock poisoned".to_string()))?
            .clone())
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        *self
            .session
            .lock()
            .map_err(|_| PortalError::Storage("token store lock poisoned".to_string()))? =
            Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self
            .session
            .lock()
            .map_err(|_| PortalError::Storage("token store lock poisoned".to_string()))? = None;
        Ok(())
    }
}

#[derive(Deserialize)]
struct IdentityClaims {
    email: String,
}

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    issue_token: IssuedToken,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssuedToken {
    access_token: String,
}

/// Extract the email claim from an identity credential (a JWT).
///
/// The credential is only split and decoded, never verified - signature
/// verification is the backend's job when it issues the bearer token.
pub fn decode_credential_email(credential: &str) -> Result<String> {
    let payload = credential
        .split('.')
        .nth(1)
        .ok_or_else(|| PortalError::InvalidCredentials("malformed identity token".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| PortalError::InvalidCredentials(format!("bad token encoding: {}", e)))?;

    let claims: IdentityClaims = serde_json::from_slice(&bytes)
        .map_err(|e| PortalError::InvalidCredentials(format!("bad token payload: {}", e)))?;

    Ok(claims.email)
}

/// Client-side session state.
///
/// `Unauthenticated -> Authenticated` via [`sign_in`](Self::sign_in) or
/// [`restore_session`](Self::restore_session) success;
/// `Authenticated -> Unauthenticated` via [`sign_out`](Self::sign_out) or any
/// rejected transition.
pub struct SessionStore<S: TokenStore> {
    access_token: Option<String>,
    email: Option<String>,
    storage: S,
}

impl<S: TokenStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            access_token: None,
            email: None,
            storage,
        }
    }

    /// True iff an access token is held.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Sign in with an external identity credential.
    ///
    /// Decodes the credential to obtain the email, exchanges it with the
    /// backend for a bearer token, and on success persists token and email
    /// together. On any failure the session stays unauthenticated and
    /// nothing is persisted.
    pub async fn sign_in(&mut self, gateway: &ApiGateway, credential: &str) -> Result<()> {
        let email = decode_credential_email(credential)?;
        self.sign_in_with_email(gateway, &email).await
    }

    /// Sign in with an already-extracted email address.
    pub async fn sign_in_with_email(&mut self, gateway: &ApiGateway, email: &str) -> Result<()> {
        let response: SignInResponse = match gateway
            .post("sign-in", &SignInRequest { email })
            .await
        {
            Ok(response) => response,
            Err(e) => {
                // Rejected transition: back to unauthenticated.
                self.access_token = None;
                self.email = None;
                return Err(e);
            }
        };

        let session = PersistedSession {
            access_token: response.issue_token.access_token,
            email: email.to_string(),
        };
        if let Err(e) = self.storage.save(&session) {
            self.access_token = None;
            self.email = None;
            return Err(e);
        }
        self.access_token = Some(session.access_token);
        self.email = Some(session.email);
        debug!(email, "signed in");
        Ok(())
    }

    /// Restore a previously persisted session.
    ///
    /// Transitions to authenticated immediately without re-validating the
    /// token against the backend. Fails, leaving the session
    /// unauthenticated, when nothing is persisted.
    pub fn restore_session(&mut self) -> Result<()> {
        match self.storage.load()? {
            Some(session) => {
                self.access_token = Some(session.access_token);
                self.email = Some(session.email);
                debug!("session restored from storage");
                Ok(())
            }
            None => {
                self.access_token = None;
                self.email = None;
                Err(PortalError::Auth("no saved session found".to_string()))
            }
        }
    }

    /// Sign out: clears in-memory and persisted state unconditionally.
    ///
    /// Always succeeds and is safe to call when already unauthenticated;
    /// persistence failures are logged, not surfaced.
    pub fn sign_out(&mut self) {
        self.access_token = None;
        self.email = None;
        if let Err(e) = self.storage.clear() {
            warn!("failed to clear persisted session: {}", e);
        }
    }
}
