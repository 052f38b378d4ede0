//! Single-user login gate. It keeps casual eyes out; it is not access control.

use crate::config::Credentials;
use crate::errors::LedgerError;
use crate::storage::StorageBackend;

#[derive(Debug, Clone)]
pub struct CredentialGate {
    credentials: Option<Credentials>,
    unlocked: bool,
}

impl CredentialGate {
    /// Starts locked unless credentials are absent or a previous login was recorded.
    pub fn new(credentials: Option<Credentials>, storage: &dyn StorageBackend) -> Result<Self, LedgerError> {
        let unlocked = credentials.is_none() || storage.is_unlocked()?;
        Ok(Self {
            credentials,
            unlocked,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Username matches case-insensitively, password exactly.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.credentials.as_ref().map_or(true, |expected| {
            expected.username.to_lowercase() == username.trim().to_lowercase()
                && expected.password == password
        })
    }

    /// Checks the pair and records the unlock on success.
    pub fn login(&mut self, storage: &dyn StorageBackend, username: &str, password: &str) -> Result<bool, LedgerError> {
        if !self.matches(username, password) {
            tracing::warn!("login rejected");
            return Ok(false);
        }
        if !self.unlocked {
            storage.record_unlocked()?;
            self.unlocked = true;
            tracing::info!("ledger unlocked");
        }
        Ok(true)
    }
}
