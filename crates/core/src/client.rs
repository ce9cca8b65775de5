//! Session-bound API client
//!
//! Every endpoint wrapper funnels through [`PortalClient::request`], which runs
//! the [`SessionGuard`]. Login and token refresh bypass the guard: they must
//! not carry a bearer header and their 401 means "bad credentials", not
//! "session expired".

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use studentportal_domain::{
    ApiError, Credential, LoginRequest, RefreshRequest, TokenPair,
};
use tracing::{info, instrument, warn};

use crate::endpoints::paths;
use crate::session::{Session, SessionGuard, SessionStore};
use crate::transport::{HttpMethod, RawResponse, RequestEnvelope, Transport};

/// API client holding the process-wide session
pub struct PortalClient {
    guard: SessionGuard<Arc<dyn Transport>>,
}

impl PortalClient {
    /// Create a client over a base transport and an injected session store
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn SessionStore>) -> Self {
        Self { guard: SessionGuard::new(transport, Session::new(store)) }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> PortalClientBuilder {
        PortalClientBuilder::default()
    }

    pub const fn session(&self) -> &Session {
        self.guard.session()
    }

    /// Exchange username and password for a credential and persist it.
    ///
    /// # Errors
    ///
    /// `AuthenticationFailed` when the backend rejects the credentials (400 or
    /// 401), `RequestFailed` for any other non-2xx, `TransportFailed` when no
    /// response arrives. A failed login leaves the stored session untouched.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Credential, ApiError> {
        let body = serde_json::to_value(LoginRequest { username, password })
            .map_err(|e| ApiError::Config(format!("Failed to serialize login body: {e}")))?;
        let request = RequestEnvelope::new(HttpMethod::Post, paths::TOKEN).with_json(body);

        let response = self.guard.inner().send(request).await?;
        if !response.is_success() {
            return Err(Self::map_login_failure(response));
        }

        let tokens: TokenPair = response.json()?;
        self.session().establish(&tokens).await?;

        info!("authenticated");
        Ok(tokens.access)
    }

    /// Renew the access credential with the stored refresh token.
    ///
    /// Never called implicitly. A missing or rejected refresh token clears the
    /// session and yields `SessionExpired`.
    ///
    /// # Errors
    ///
    /// `SessionExpired`, `RequestFailed`, `TransportFailed`, `Decode` or
    /// `Storage`.
    #[instrument(skip(self))]
    pub async fn refresh_session(&self) -> Result<Credential, ApiError> {
        let Some(refresh) = self.session().refresh_token().await? else {
            self.session().clear().await?;
            return Err(ApiError::SessionExpired);
        };

        let body = serde_json::to_value(RefreshRequest { refresh: refresh.expose() })
            .map_err(|e| ApiError::Config(format!("Failed to serialize refresh body: {e}")))?;
        let request = RequestEnvelope::new(HttpMethod::Post, paths::TOKEN_REFRESH).with_json(body);

        let response = self.guard.inner().send(request).await?;
        if !response.is_success() {
            if matches!(response.status, 400 | 401) {
                warn!(status = response.status, "refresh token rejected");
                self.session().clear().await?;
                return Err(ApiError::SessionExpired);
            }
            return Err(ApiError::RequestFailed { status: response.status, body: response.body });
        }

        let tokens: TokenPair = response.json()?;
        self.session().establish(&tokens).await?;

        info!("session refreshed");
        Ok(tokens.access)
    }

    /// Forget the stored session
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store cannot delete the secrets
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session().clear().await?;
        info!("logged out");
        Ok(())
    }

    /// Whether a credential is stored; store failures count as "no"
    pub async fn is_authenticated(&self) -> bool {
        match self.session().is_active().await {
            Ok(active) => active,
            Err(err) => {
                warn!(error = %err, "failed to read session store");
                false
            }
        }
    }

    /// Currently stored credential
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store cannot be read
    pub async fn credential(&self) -> Result<Option<Credential>, ApiError> {
        Ok(self.session().credential().await?)
    }

    /// The single chokepoint for authenticated calls.
    ///
    /// # Errors
    ///
    /// `SessionExpired` on 401 (after the credential is deleted),
    /// `RequestFailed` on any other non-2xx, `TransportFailed` when no
    /// response arrives, `Decode` when the body does not fit `R`.
    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<R, ApiError> {
        let mut request = RequestEnvelope::new(method, path);
        if let Some(body) = body {
            request = request.with_json(body);
        }

        let response: RawResponse = self.guard.dispatch(request).await?;
        response.json()
    }

    /// Execute a GET request
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(HttpMethod::Get, path, None).await
    }

    /// Execute a POST request with a JSON body
    pub async fn post<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let body = Self::to_body(body)?;
        self.request(HttpMethod::Post, path, Some(body)).await
    }

    /// Execute a POST request without a body
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(HttpMethod::Post, path, None).await
    }

    /// Execute a PATCH request with a JSON body
    pub async fn patch<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let body = Self::to_body(body)?;
        self.request(HttpMethod::Patch, path, Some(body)).await
    }

    /// Execute a DELETE request
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(HttpMethod::Delete, path, None).await
    }

    fn to_body<T: Serialize>(body: &T) -> Result<Value, ApiError> {
        serde_json::to_value(body)
            .map_err(|e| ApiError::Decode(format!("Failed to serialize body: {e}")))
    }

    fn map_login_failure(response: RawResponse) -> ApiError {
        if matches!(response.status, 400 | 401) {
            warn!(status = response.status, "login rejected");
            ApiError::AuthenticationFailed { status: response.status, body: response.body }
        } else {
            ApiError::RequestFailed { status: response.status, body: response.body }
        }
    }
}

/// Builder for [`PortalClient`]
#[derive(Default)]
pub struct PortalClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    store: Option<Arc<dyn SessionStore>>,
}

impl PortalClientBuilder {
    /// Set the base transport
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the session store
    #[must_use]
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `Config` if the transport or the store is missing
    pub fn build(self) -> Result<PortalClient, ApiError> {
        let transport =
            self.transport.ok_or_else(|| ApiError::Config("Transport not set".to_string()))?;
        let store =
            self.store.ok_or_else(|| ApiError::Config("Session store not set".to_string()))?;

        Ok(PortalClient::new(transport, store))
    }
}
