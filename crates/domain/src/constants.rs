//! Client-wide constants.

/// Production backend, without a trailing slash.
pub const DEFAULT_API_BASE_URL: &str = "https://studentappmobile.onrender.com/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_USER_AGENT: &str = concat!("studentportal/", env!("CARGO_PKG_VERSION"));

// Session store keys
pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refresh";

pub const DEFAULT_KEYCHAIN_SERVICE: &str = "StudentPortal.session";
pub const SESSION_FILE_NAME: &str = "session.json";

pub const DEFAULT_LOG_LEVEL: &str = "info";
