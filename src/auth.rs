/// Credential gate for the admin diagnostics view.
///
/// The gate is a plain lookup against the credential table: both fields
/// must match a row exactly. The resulting session is an ordinary value
/// owned by the caller; there is no global login state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use crate::ingest::credentials::{load_credentials, Credential, CredentialError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Admin login required")]
    NotAuthenticated,
    #[error(transparent)]
    Store(#[from] CredentialError),
}

/// Result of checking a username/password pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthOutcome {
    Accepted,
    Rejected,
}

/// The set of accounts allowed into the diagnostics view.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credentials: Vec<Credential>,
}

impl CredentialStore {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let credentials = load_credentials(path)?;
        log::debug!("Loaded {} admin accounts", credentials.len());
        Ok(Self::new(credentials))
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn authenticate(&self, username: &str, password: &str) -> AuthOutcome {
        let matched = self
            .credentials
            .iter()
            .any(|c| c.username == username && c.password == password);
        if matched {
            AuthOutcome::Accepted
        } else {
            AuthOutcome::Rejected
        }
    }
}

/// Per-caller login state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminSession {
    pub authenticated: bool,
    pub user: Option<String>,
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl AdminSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the pair against `store`. On rejection the session is left
    /// exactly as it was.
    pub fn login(
        &mut self,
        store: &CredentialStore,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        match store.authenticate(username, password) {
            AuthOutcome::Accepted => {
                self.authenticated = true;
                self.user = Some(username.to_string());
                self.logged_in_at = Some(Utc::now());
                log::info!("Admin login accepted for {}", username);
                Ok(())
            }
            AuthOutcome::Rejected => {
                log::warn!("Admin login rejected for {}", username);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }

    /// Errors unless a login has succeeded.
    pub fn require(&self) -> Result<&str, AuthError> {
        match (&self.user, self.authenticated) {
            (Some(user), true) => Ok(user),
            _ => Err(AuthError::NotAuthenticated),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
