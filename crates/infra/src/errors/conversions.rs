//! Conversions from external infrastructure errors into domain errors.

use keyring::Error as KeyringError;
use reqwest::Error as HttpError;
use studentportal_domain::{ApiError, PortalError};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain errors.
#[derive(Debug)]
pub struct InfraError(pub ApiError);

impl From<InfraError> for ApiError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ApiError> for InfraError {
    fn from(value: ApiError) -> Self {
        Self(value)
    }
}

/// Session stores speak `PortalError`; anything that is not a local failure
/// is reported as a storage problem.
impl From<InfraError> for PortalError {
    fn from(value: InfraError) -> Self {
        match value.0 {
            ApiError::Config(message) => Self::Config(message),
            ApiError::Decode(message) => Self::Serialization(message),
            ApiError::Storage(message) => Self::Storage(message),
            other => Self::Storage(other.to_string()),
        }
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoApiError {
    fn into_api_error(self) -> ApiError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl IntoApiError for KeyringError {
    fn into_api_error(self) -> ApiError {
        let description = self.to_string();

        match self {
            Self::NoEntry => ApiError::Storage("keychain entry not found".into()),
            Self::BadEncoding(_) => {
                ApiError::Storage("credential in keychain is not valid UTF-8".into())
            }
            Self::TooLong(name, limit) => ApiError::Storage(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Self::Invalid(attr, reason) => {
                ApiError::Storage(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            Self::Ambiguous(entries) => ApiError::Storage(format!(
                "multiple keychain entries matched request ({} results)",
                entries.len()
            )),
            Self::PlatformFailure(err) => {
                ApiError::Storage(format!("keychain platform error: {err}"))
            }
            Self::NoStorageAccess(err) => {
                ApiError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => ApiError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        Self(value.into_api_error())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

/// Only failures without a usable response reach this conversion; statuses
/// are interpreted by the session guard.
impl IntoApiError for HttpError {
    fn into_api_error(self) -> ApiError {
        if self.is_timeout() {
            return ApiError::TransportFailed("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ApiError::TransportFailed(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return ApiError::Config(format!("invalid HTTP request: {self}"));
        }

        ApiError::TransportFailed(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_api_error())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error / serde_json::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(ApiError::Storage(format!("session file I/O failed: {value}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(ApiError::Storage(format!("session file is corrupted: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
