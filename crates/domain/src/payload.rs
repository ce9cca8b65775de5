//! Request payloads and response helpers
//!
//! Domain entities (opportunities, applications, grades, notifications,
//! profiles, reports) are owned by the backend and pass through the client as
//! raw JSON. Only the shapes the client itself builds are typed here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque JSON payload exchanged with the backend
pub type Payload = Value;

/// Body of `POST /opportunities/{id}/apply/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    /// Empty when the student did not write one; the backend receives `""`
    pub cover_letter: String,
}

impl ApplicationRequest {
    #[must_use]
    pub fn new(cover_letter: Option<&str>) -> Self {
        Self { cover_letter: cover_letter.unwrap_or_default().to_string() }
    }
}

/// Items of a list response.
///
/// List endpoints answer either with a bare array or with a paginated
/// envelope `{count, next, previous, results}`. Anything else yields no items.
#[must_use]
pub fn list_items(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
