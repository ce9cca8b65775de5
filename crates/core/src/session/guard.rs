//! Session middleware around a base transport
//!
//! `SessionGuard` is the single chokepoint every authenticated call goes
//! through. It attaches the stored credential, dispatches, and interprets the
//! status code:
//!
//! - 2xx: the response is returned untouched
//! - 401: the credential that was sent is deleted, then `SessionExpired`
//! - anything else: `RequestFailed { status, body }`

use async_trait::async_trait;
use studentportal_domain::ApiError;
use tracing::{debug, error, warn};

use super::Session;
use crate::transport::{RawResponse, RequestEnvelope, Transport};

pub const STATUS_UNAUTHORIZED: u16 = 401;

/// Decorator adding credential injection and expiry handling to `T`
pub struct SessionGuard<T> {
    inner: T,
    session: Session,
}

impl<T: Transport> SessionGuard<T> {
    pub fn new(inner: T, session: Session) -> Self {
        Self { inner, session }
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Undecorated transport, for calls that must not carry a credential
    pub const fn inner(&self) -> &T {
        &self.inner
    }

    /// Attach the credential (if any), send, and classify the response
    pub async fn dispatch(&self, request: RequestEnvelope) -> Result<RawResponse, ApiError> {
        let credential = self.session.credential().await?;
        let request = match &credential {
            Some(credential) => request.with_bearer(credential),
            None => request,
        };

        let method = request.method;
        let path = request.path.clone();
        debug!(%method, path = %path, authenticated = credential.is_some(), "dispatching request");

        let response = self.inner.send(request).await?;

        if response.is_success() {
            return Ok(response);
        }

        if response.status == STATUS_UNAUTHORIZED {
            // The signal must reach the caller even if the store misbehaves.
            if let Err(err) = self.session.expire(credential.as_ref()).await {
                error!(error = %err, "failed to delete expired credential");
            }
            warn!(%method, path = %path, "session expired");
            return Err(ApiError::SessionExpired);
        }

        debug!(%method, path = %path, status = response.status, "request failed");
        Err(ApiError::RequestFailed { status: response.status, body: response.body })
    }
}

#[async_trait]
impl<T: Transport> Transport for SessionGuard<T> {
    async fn send(&self, request: RequestEnvelope) -> Result<RawResponse, ApiError> {
        self.dispatch(request).await
    }
}
