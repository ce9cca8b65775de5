//! # Student Portal Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed HTTP transport
//! - Session stores (memory, platform keychain, JSON file)
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `studentportal-core`
//! - Contains all "impure" code (network, keychain, filesystem)

pub mod config;
pub mod errors;
pub mod http;
pub mod session;

use std::sync::Arc;

pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use session::{
    build_session_store, FileSessionStore, KeychainSessionStore, MemorySessionStore,
};
use studentportal_core::{PortalClient, StudentPortalApi};
use studentportal_domain::{ApiError, Config};

/// Wire the configured transport and session store into a ready API surface
///
/// # Errors
///
/// Returns `ApiError::Config` for an unusable base URL or session location
pub fn connect(config: &Config) -> Result<StudentPortalApi, ApiError> {
    let transport = HttpClient::from_config(&config.api)?;
    let store = build_session_store(&config.session)?;

    tracing::info!(base_url = %transport.base_url(), "student portal client ready");

    let client = PortalClient::new(Arc::new(transport), store);
    Ok(StudentPortalApi::new(Arc::new(client)))
}
