//! Application context - dependency injection container

use std::path::PathBuf;

use studentportal_core::StudentPortalApi;
use studentportal_domain::{ApiError, Config, Result};
use studentportal_infra::{config, connect};
use tracing::info;

/// Application context - holds the configuration and the wired client
pub struct AppContext {
    pub config: Config,
    pub api: StudentPortalApi,
}

impl AppContext {
    /// Build the context from the standard config locations and environment
    ///
    /// # Errors
    ///
    /// Returns `Config` when configuration is invalid or the client cannot be
    /// built
    pub fn new() -> std::result::Result<Self, ApiError> {
        Self::from_config(load_config(None, None)?)
    }

    /// Build the context from an already loaded configuration
    ///
    /// # Errors
    ///
    /// Returns `Config` when the client cannot be built
    pub fn from_config(config: Config) -> std::result::Result<Self, ApiError> {
        let api = connect(&config)?;
        info!(
            base_url = %config.api.base_url,
            session_backend = %config.session.backend,
            "application context initialised"
        );
        Ok(Self { config, api })
    }
}

/// Load configuration, honouring an explicit file and a base URL override
///
/// # Errors
///
/// Returns `PortalError::Config` for unreadable or invalid configuration
pub fn load_config(path: Option<PathBuf>, base_url: Option<String>) -> Result<Config> {
    let mut loaded = match path {
        Some(path) => config::apply_env_overrides(config::load_from_file(Some(path))?)?,
        None => config::load()?,
    };

    if let Some(base_url) = base_url {
        loaded.api.base_url = base_url;
        loaded.api = loaded.api.normalized();
    }

    Ok(loaded)
}
