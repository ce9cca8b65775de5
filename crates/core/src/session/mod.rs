//! Session state on top of a [`SessionStore`]
//!
//! The session is binary: a credential is stored under [`TOKEN_KEY`] or it is
//! not. Absence means the same thing whether it came from an explicit logout
//! or from a 401 seen by the [`SessionGuard`].

pub mod guard;
pub mod ports;

use std::sync::Arc;

pub use guard::SessionGuard;
pub use ports::SessionStore;
use studentportal_domain::constants::{REFRESH_TOKEN_KEY, TOKEN_KEY};
use studentportal_domain::{Credential, Result, TokenPair};
use tracing::{debug, info};

/// Credential accessors over an injected store
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Current bearer credential, if any
    pub async fn credential(&self) -> Result<Option<Credential>> {
        Ok(self.store.get(TOKEN_KEY).await?.map(Credential::from))
    }

    /// Stored refresh token, if any
    pub async fn refresh_token(&self) -> Result<Option<Credential>> {
        Ok(self.store.get(REFRESH_TOKEN_KEY).await?.map(Credential::from))
    }

    /// Persist a freshly issued token pair.
    ///
    /// A pair without a refresh token keeps the one already stored.
    pub async fn establish(&self, tokens: &TokenPair) -> Result<()> {
        self.store.set(TOKEN_KEY, tokens.access.expose()).await?;
        if let Some(refresh) = &tokens.refresh {
            self.store.set(REFRESH_TOKEN_KEY, refresh.expose()).await?;
        }
        info!(rotated_refresh = tokens.refresh.is_some(), "session established");
        Ok(())
    }

    /// Forget every session secret
    pub async fn clear(&self) -> Result<()> {
        self.store.delete(TOKEN_KEY).await?;
        self.store.delete(REFRESH_TOKEN_KEY).await?;
        info!("session cleared");
        Ok(())
    }

    /// Drop the access credential after the backend rejected `sent`.
    ///
    /// Only the credential the rejected request carried is removed; one stored
    /// by a concurrent login survives. The refresh token is kept so the caller
    /// may renew the session explicitly. Returns whether anything was removed.
    pub async fn expire(&self, sent: Option<&Credential>) -> Result<bool> {
        let Some(sent) = sent else {
            debug!("rejected request carried no credential; nothing to expire");
            return Ok(false);
        };

        let removed = self.store.delete_if(TOKEN_KEY, sent.expose()).await?;
        debug!(removed, "expired session credential");
        Ok(removed)
    }

    /// Whether a credential is currently stored
    pub async fn is_active(&self) -> Result<bool> {
        Ok(self.credential().await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryStore;

    fn session() -> (Session, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::default());
        (Session::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_establish_and_clear() {
        let (session, store) = session();
        let pair = TokenPair {
            access: Credential::from("access-1"),
            refresh: Some(Credential::from("refresh-1")),
        };

        session.establish(&pair).await.unwrap();
        assert_eq!(session.credential().await.unwrap(), Some(Credential::from("access-1")));
        assert_eq!(store.value(REFRESH_TOKEN_KEY), Some("refresh-1".to_string()));

        session.clear().await.unwrap();
        assert!(!session.is_active().await.unwrap());
        assert!(session.refresh_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_establish_without_refresh_keeps_existing() {
        let (session, _store) = session();
        session
            .establish(&TokenPair {
                access: Credential::from("a1"),
                refresh: Some(Credential::from("r1")),
            })
            .await
            .unwrap();
        session
            .establish(&TokenPair { access: Credential::from("a2"), refresh: None })
            .await
            .unwrap();

        assert_eq!(session.credential().await.unwrap(), Some(Credential::from("a2")));
        assert_eq!(session.refresh_token().await.unwrap(), Some(Credential::from("r1")));
    }

    #[tokio::test]
    async fn test_expire_only_removes_matching_credential() {
        let (session, store) = session();
        store.insert(TOKEN_KEY, "newer");

        let removed = session.expire(Some(&Credential::from("older"))).await.unwrap();
        assert!(!removed);
        assert_eq!(session.credential().await.unwrap(), Some(Credential::from("newer")));

        let removed = session.expire(Some(&Credential::from("newer"))).await.unwrap();
        assert!(removed);
        assert!(session.credential().await.unwrap().is_none());
    }
}
