//! Session handling
//!
//! The session is a single bearer token kept under one storage key. Pages
//! get the session through a [`SessionStore`] handed to them explicitly
//! instead of reading global storage.
//!
//! Implementations:
//! - [`MemorySessionStore`]: in-process, used by tests
//! - [`FileSessionStore`]: a JSON file, used by the terminal client (native only)
//! - the browser UI wraps `localStorage` with the same trait

pub mod token;

#[cfg(feature = "native")]
pub mod file;

use std::sync::RwLock;
use thiserror::Error;

pub use token::{TokenClaims, TokenError};

#[cfg(feature = "native")]
pub use file::FileSessionStore;

/// Storage key holding the bearer token
pub const SESSION_KEY: &str = "token";

/// Errors persisting or clearing the session
#[derive(Error, Debug)]
pub enum SessionError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Session file contents could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backing storage is unavailable (e.g. browser storage disabled)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Read/write/clear access to the stored session token
pub trait SessionStore {
    /// Raw stored value. Storage failures are reported as `None`.
    fn read(&self) -> Option<String>;

    /// Persist a new token, replacing any previous one
    fn write(&self, token: &str) -> SessionResult<()>;

    /// Remove the token (logout)
    fn clear(&self) -> SessionResult<()>;

    /// Stored token, if present and non-empty
    fn token(&self) -> Option<String> {
        self.read().filter(|t| !t.trim().is_empty())
    }

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Decoded claims of the stored token.
    ///
    /// An undecodable token is logged and treated as having no claims; it
    /// does not end the session.
    fn claims(&self) -> Option<TokenClaims> {
        let token = self.token()?;
        match TokenClaims::decode(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::warn!(error = %e, "Stored session token could not be decoded");
                None
            }
        }
    }

    /// Email to display for the current session, empty when unknown
    fn identity(&self) -> String {
        self.claims().and_then(|c| c.email).unwrap_or_default()
    }
}

/// In-memory session, the default for tests and short-lived tools
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `token`
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn write(&self, token: &str) -> SessionResult<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn read(&self) -> Option<String> {
        (**self).read()
    }

    fn write(&self, token: &str) -> SessionResult<()> {
        (**self).write(token)
    }

    fn clear(&self) -> SessionResult<()> {
        (**self).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemorySessionStore::new();
        assert!(!store.is_authenticated());

        store.write("abc").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc"));
        assert!(store.is_authenticated());

        store.clear().unwrap();
        assert!(store.token().is_none());
    }

    #[test]
    fn test_blank_token_is_absent() {
        let store = MemorySessionStore::with_token("   ");
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_identity_from_claims() {
        let token = token::encode_unsigned(&TokenClaims {
            email: Some("ana@example.com".to_string()),
            ..Default::default()
        });
        let store = MemorySessionStore::with_token(&token);
        assert_eq!(store.identity(), "ana@example.com");
    }

    #[test]
    fn test_undecodable_token_keeps_session() {
        let store = MemorySessionStore::with_token("opaque-token");
        assert!(store.is_authenticated());
        assert!(store.claims().is_none());
        assert_eq!(store.identity(), "");
    }
}
