//! Session store implementations
//!
//! Selected at startup from `[session] backend`:
//!
//! - `memory`: process-local, gone on exit
//! - `keychain`: platform credential store
//! - `file`: JSON file in the user's data directory (default)

pub mod file;
pub mod keychain;
pub mod memory;

use std::sync::Arc;

pub use file::{default_session_path, FileSessionStore};
pub use keychain::KeychainSessionStore;
pub use memory::MemorySessionStore;
use studentportal_core::SessionStore;
use studentportal_domain::{Result, SessionBackend, SessionConfig};
use tracing::info;

/// Build the configured session store
///
/// # Errors
///
/// Returns `PortalError::Config` when the file backend has no explicit path
/// and no data directory can be determined
pub fn build_session_store(config: &SessionConfig) -> Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        SessionBackend::Keychain => {
            Arc::new(KeychainSessionStore::new(config.keychain_service.clone()))
        }
        SessionBackend::File => match &config.path {
            Some(path) => Arc::new(FileSessionStore::new(path.clone())),
            None => Arc::new(FileSessionStore::at_default_location()?),
        },
    };

    info!(backend = %config.backend, "session store ready");
    Ok(store)
}
