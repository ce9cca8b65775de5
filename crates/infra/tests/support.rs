//! Shared helpers for infra integration tests.

use std::sync::Arc;
use std::time::Duration;

use studentportal_core::{PortalClient, SessionStore, StudentPortalApi};
use studentportal_domain::constants::TOKEN_KEY;
use studentportal_infra::{HttpClient, MemorySessionStore};
use wiremock::MockServer;

/// API surface wired to a mock server with an in-memory session.
pub struct TestPortal {
    pub api: StudentPortalApi,
    pub store: Arc<MemorySessionStore>,
}

impl TestPortal {
    /// Portal pointed at `<server>/api` with no stored credential.
    pub fn new(server: &MockServer) -> Self {
        Self::with_timeout(server, Duration::from_secs(5))
    }

    pub fn with_timeout(server: &MockServer, timeout: Duration) -> Self {
        let transport = HttpClient::builder()
            .base_url(format!("{}/api", server.uri()))
            .timeout(timeout)
            .build()
            .expect("http client should build");
        let store = Arc::new(MemorySessionStore::new());
        let client = PortalClient::new(Arc::new(transport), store.clone());

        Self { api: StudentPortalApi::new(Arc::new(client)), store }
    }

    /// Portal that already holds `token`.
    pub async fn logged_in(server: &MockServer, token: &str) -> Self {
        let portal = Self::new(server);
        portal.store.set(TOKEN_KEY, token).await.expect("memory store should accept writes");
        portal
    }

    pub async fn stored_token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).await.expect("memory store should be readable")
    }
}
