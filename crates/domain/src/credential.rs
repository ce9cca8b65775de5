//! Credential types
//!
//! The backend issues a bearer access token plus an optional refresh token.
//! Both are opaque strings; the client never inspects their contents.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bearer token proving an authenticated session.
///
/// `Debug` output is redacted so credentials never reach logs by accident.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Body returned by the login and refresh endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access: Credential,
    /// Absent on refresh responses unless the backend rotates refresh tokens
    #[serde(default)]
    pub refresh: Option<Credential>,
}

/// Body of `POST /token/`
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Body of `POST /token/refresh/`
#[derive(Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new("tok123");
        assert_eq!(format!("{credential:?}"), "Credential(***)");

        let login = LoginRequest { username: "student", password: "hunter2" };
        let rendered = format!("{login:?}");
        assert!(rendered.contains("student"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_bearer_header_value() {
        assert_eq!(Credential::from("abc").bearer(), "Bearer abc");
    }

    #[test]
    fn test_token_pair_from_login_response() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"access": "tok123", "refresh": "ref456"}"#).unwrap();
        assert_eq!(pair.access.expose(), "tok123");
        assert_eq!(pair.refresh.as_ref().map(Credential::expose), Some("ref456"));

        let access_only: TokenPair = serde_json::from_str(r#"{"access": "tok789"}"#).unwrap();
        assert!(access_only.refresh.is_none());
    }

    #[test]
    fn test_login_request_shape() {
        let body =
            serde_json::to_value(LoginRequest { username: "valid_user", password: "valid_pass" })
                .unwrap();
        assert_eq!(body, serde_json::json!({"username": "valid_user", "password": "valid_pass"}));
    }
}
