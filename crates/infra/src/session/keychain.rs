//! Platform keychain session store
//!
//! Each session key becomes one keychain entry under a shared service name
//! (macOS Keychain Access, Windows Credential Manager, Linux kernel keyring).
//! Keychain calls block, so every operation runs on the blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use keyring::Entry;
use parking_lot::Mutex;
use studentportal_core::SessionStore;
use studentportal_domain::{PortalError, Result};
use tracing::debug;

use crate::errors::InfraError;

/// Keychain-backed [`SessionStore`]
#[derive(Clone)]
pub struct KeychainSessionStore {
    inner: Arc<Keychain>,
}

struct Keychain {
    service_name: String,
    // Serialises read-modify-write sequences; the keychain itself has no CAS.
    lock: Mutex<()>,
}

impl KeychainSessionStore {
    /// Create a store for a keychain service (e.g. `StudentPortal.session`)
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Keychain { service_name: service_name.into(), lock: Mutex::new(()) }),
        }
    }

    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.inner.service_name
    }

    /// Run `op` on the blocking pool while holding the store lock
    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Keychain) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let _guard = inner.lock.lock();
            op(&inner)
        })
        .await
        .map_err(|e| PortalError::Storage(format!("keychain task failed: {e}")))?
    }
}

impl Keychain {
    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service_name, key).map_err(|e| InfraError::from(e).into())
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?.set_password(value).map_err(|e| PortalError::from(InfraError::from(e)))?;
        ensure_retained(key, self.read(key)?.as_deref(), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }
}

/// A write the keychain did not keep must fail rather than leave the
/// session silently empty.
fn ensure_retained(key: &str, read_back: Option<&str>, written: &str) -> Result<()> {
    if read_back == Some(written) {
        Ok(())
    } else {
        Err(PortalError::Storage(format!(
            "keychain did not retain '{key}'; choose the file or memory session backend"
        )))
    }
}

#[async_trait]
impl SessionStore for KeychainSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        debug!(service = %self.service_name(), key = %key, "Retrieving secret from keychain");
        let key = key.to_string();
        self.run(move |keychain| keychain.read(&key)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        debug!(service = %self.service_name(), key = %key, "Storing secret in keychain");
        let (key, value) = (key.to_string(), value.to_string());
        self.run(move |keychain| keychain.write(&key, &value)).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        debug!(service = %self.service_name(), key = %key, "Deleting secret from keychain");
        let key = key.to_string();
        self.run(move |keychain| keychain.remove(&key)).await
    }

    async fn delete_if(&self, key: &str, expected: &str) -> Result<bool> {
        let (key, expected) = (key.to_string(), expected.to_string());
        self.run(move |keychain| {
            if keychain.read(&key)?.as_deref() != Some(expected.as_str()) {
                return Ok(false);
            }
            keychain.remove(&key)?;
            Ok(true)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name() {
        let store = KeychainSessionStore::new("StudentPortal.test");
        assert_eq!(store.service_name(), "StudentPortal.test");
    }

    #[test]
    fn test_lost_write_is_a_storage_error() {
        assert!(ensure_retained("token", Some("tok123"), "tok123").is_ok());

        let err = ensure_retained("token", None, "tok123").unwrap_err();
        assert!(matches!(err, PortalError::Storage(ref msg) if msg.contains("did not retain")));
        assert!(ensure_retained("token", Some("older"), "tok123").is_err());
    }

    #[tokio::test]
    #[ignore = "needs an unlocked platform keychain; containers usually block keyctl"]
    async fn test_keychain_round_trip() {
        let store = KeychainSessionStore::new("StudentPortal.roundtrip-test");
        store.delete("token").await.unwrap();

        store.set("token", "tok123").await.unwrap();
        assert_eq!(store.get("token").await.unwrap(), Some("tok123".to_string()));

        assert!(!store.delete_if("token", "other").await.unwrap());
        assert!(store.delete_if("token", "tok123").await.unwrap());
        assert_eq!(store.get("token").await.unwrap(), None);

        store.delete("token").await.unwrap();
    }
}
