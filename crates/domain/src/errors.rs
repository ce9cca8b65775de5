//! Error types used throughout the client

use thiserror::Error;

/// Local failures that happen before or outside an HTTP exchange
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for local operations
pub type Result<T> = std::result::Result<T, PortalError>;

/// Categories of API errors, used as stable log and exit-code labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Rejected credentials at login
    Authentication,
    /// Backend invalidated the current credential (401)
    Session,
    /// Any other non-2xx response
    Request,
    /// No response was received
    Transport,
    /// Response body could not be decoded
    Decode,
    /// Session store failure
    Storage,
    /// Client construction or configuration failure
    Config,
}

impl ApiErrorCategory {
    /// Stable lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Session => "session",
            Self::Request => "request",
            Self::Transport => "transport",
            Self::Decode => "decode",
            Self::Storage => "storage",
            Self::Config => "config",
        }
    }
}

/// Failures surfaced by the session-bound API client.
///
/// None of these are retried inside the client. The only side effect attached
/// to any of them is the credential deletion that precedes `SessionExpired`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Authentication failed with status {status}: {body}")]
    AuthenticationFailed { status: u16, body: String },

    #[error("Session expired")]
    SessionExpired,

    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Transport error: {0}")]
    TransportFailed(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    #[must_use]
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::AuthenticationFailed { .. } => ApiErrorCategory::Authentication,
            Self::SessionExpired => ApiErrorCategory::Session,
            Self::RequestFailed { .. } => ApiErrorCategory::Request,
            Self::TransportFailed(_) => ApiErrorCategory::Transport,
            Self::Decode(_) => ApiErrorCategory::Decode,
            Self::Storage(_) => ApiErrorCategory::Storage,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// HTTP status carried by the failure, if a response was received
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed { status, .. } | Self::RequestFailed { status, .. } => {
                Some(*status)
            }
            Self::SessionExpired => Some(401),
            _ => None,
        }
    }

    /// Whether the caller should route to its login flow
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Short message suitable for presenting to a user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthenticationFailed { .. } => "Invalid username or password".to_string(),
            Self::SessionExpired => "Your session has expired. Please log in again".to_string(),
            Self::RequestFailed { status, .. } if *status == 404 => {
                "The requested item could not be found".to_string()
            }
            Self::RequestFailed { status, .. } if *status >= 500 => {
                "The server is unavailable. Please try again later".to_string()
            }
            Self::RequestFailed { status, .. } => format!("Request was rejected ({status})"),
            Self::TransportFailed(_) => "Unable to reach the server".to_string(),
            Self::Decode(_) => "The server sent an unexpected response".to_string(),
            Self::Storage(_) => "Unable to access the saved session".to_string(),
            Self::Config(message) => format!("Client is misconfigured: {message}"),
        }
    }
}

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Config(message) => Self::Config(message),
            PortalError::Storage(message) => Self::Storage(message),
            PortalError::Serialization(message) => Self::Decode(message),
        }
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::AuthenticationFailed { status: 401, body: String::new() }.category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(ApiError::SessionExpired.category(), ApiErrorCategory::Session);
        assert_eq!(
            ApiError::RequestFailed { status: 404, body: String::new() }.category(),
            ApiErrorCategory::Request
        );
        assert_eq!(
            ApiError::TransportFailed("timeout".into()).category(),
            ApiErrorCategory::Transport
        );
        assert_eq!(ApiErrorCategory::Session.as_str(), "session");
    }

    #[test]
    fn test_status_only_for_responses() {
        assert_eq!(ApiError::RequestFailed { status: 503, body: String::new() }.status(), Some(503));
        assert_eq!(ApiError::SessionExpired.status(), Some(401));
        assert_eq!(ApiError::TransportFailed("dns".into()).status(), None);
        assert_eq!(ApiError::Decode("eof".into()).status(), None);
    }

    #[test]
    fn test_user_messages() {
        assert!(ApiError::SessionExpired.user_message().contains("log in"));
        assert!(ApiError::RequestFailed { status: 404, body: String::new() }
            .user_message()
            .contains("not be found"));
        assert!(ApiError::RequestFailed { status: 502, body: String::new() }
            .user_message()
            .contains("unavailable"));
        assert_eq!(
            ApiError::RequestFailed { status: 409, body: String::new() }.user_message(),
            "Request was rejected (409)"
        );
    }

    #[test]
    fn test_portal_error_conversion() {
        assert_eq!(
            ApiError::from(PortalError::Storage("locked".into())),
            ApiError::Storage("locked".into())
        );
        assert_eq!(
            ApiError::from(PortalError::Serialization("bad".into())),
            ApiError::Decode("bad".into())
        );
        assert!(ApiError::SessionExpired.is_session_expired());
        assert!(!ApiError::Config("x".into()).is_session_expired());
    }
}
