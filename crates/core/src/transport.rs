//! Transport port and request envelope
//!
//! A `Transport` performs one HTTP exchange and nothing else: no credential
//! handling, no status interpretation, no retries. Session behaviour is layered
//! on top by [`crate::session::SessionGuard`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use studentportal_domain::{ApiError, Credential};

pub const AUTHORIZATION: &str = "Authorization";

/// HTTP methods used by the backend catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound request, relative to the configured base address
#[derive(Clone, PartialEq)]
pub struct RequestEnvelope {
    pub method: HttpMethod,
    /// Path starting with `/`, e.g. `/opportunities/42/`
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestEnvelope {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, headers: Vec::new() }
    }

    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Attach `Authorization: Bearer <credential>`
    #[must_use]
    pub fn with_bearer(self, credential: &Credential) -> Self {
        self.with_header(AUTHORIZATION, credential.bearer())
    }

    /// Case-insensitive header lookup
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for RequestEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case(AUTHORIZATION) {
                    (name.as_str(), "***")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("RequestEnvelope")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("body", &self.body)
            .field("headers", &headers)
            .finish()
    }
}

/// Status and raw body of a received response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decode the body. An empty body (204/205 or a bare 200) decodes as JSON
    /// `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.body.trim().is_empty() {
            return serde_json::from_value(Value::Null).map_err(|_| {
                ApiError::Decode(format!(
                    "empty response body (status {}) cannot be decoded into the expected type",
                    self.status
                ))
            });
        }

        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Base HTTP exchange
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return whatever response arrives.
    ///
    /// Only failures where no response was received are errors
    /// (`ApiError::TransportFailed`); every status code is returned as-is.
    async fn send(&self, request: RequestEnvelope) -> Result<RawResponse, ApiError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: RequestEnvelope) -> Result<RawResponse, ApiError> {
        (**self).send(request).await
    }
}
