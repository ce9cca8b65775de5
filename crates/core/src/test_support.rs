//! In-process doubles for the transport and session ports

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use studentportal_domain::constants::TOKEN_KEY;
use studentportal_domain::{ApiError, PortalError, Result};

use crate::session::SessionStore;
use crate::transport::{RawResponse, RequestEnvelope, Transport};

/// Replays queued responses and records every request it receives
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<std::result::Result<RawResponse, ApiError>>>,
    requests: Mutex<Vec<RequestEnvelope>>,
}

impl ScriptedTransport {
    pub fn push_response(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(RawResponse::new(status, body)));
    }

    pub fn push_error(&self, error: ApiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<RequestEnvelope> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: RequestEnvelope) -> std::result::Result<RawResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::TransportFailed("no scripted response".into())))
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn insert(&self, key: &str, value: &str) {
        self.values.lock().unwrap().insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Store that can be read but rejects every write
pub struct FailingStore {
    token: String,
}

impl FailingStore {
    pub fn with_token(token: &str) -> Self {
        Self { token: token.to_string() }
    }
}

#[async_trait]
impl SessionStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok((key == TOKEN_KEY).then(|| self.token.clone()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(PortalError::Storage("read-only store".into()))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(PortalError::Storage("read-only store".into()))
    }
}
