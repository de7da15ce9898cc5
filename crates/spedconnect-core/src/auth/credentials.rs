use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "sped-connect";

/// Login passwords remembered in the OS keychain, keyed by email.
pub struct CredentialStore {
    service: String,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

impl CredentialStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, email: &str) -> Result<Entry> {
        Entry::new(&self.service, email).context("Failed to create keyring entry")
    }

    pub fn store(&self, email: &str, password: &str) -> Result<()> {
        self.entry(email)?
            .set_password(password)
            .context("Failed to store password in keychain")
    }

    /// The remembered password, or `None` if nothing is stored for `email`.
    pub fn password(&self, email: &str) -> Result<Option<String>> {
        match self.entry(email)?.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve password from keychain"),
        }
    }

    /// Forget the password for `email`. Forgetting a missing entry is fine.
    pub fn forget(&self, email: &str) -> Result<()> {
        match self.entry(email)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}
