//! JSON file session store
//!
//! The whole session is one small JSON object (`{"token": "...", "refresh":
//! "..."}`) rewritten on every change. A missing file is an empty session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use directories::ProjectDirs;
use studentportal_core::SessionStore;
use studentportal_domain::constants::SESSION_FILE_NAME;
use studentportal_domain::{PortalError, Result};
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::InfraError;

type Entries = BTreeMap<String, String>;

/// File-backed [`SessionStore`]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Store at `<data dir>/studentportal/session.json`
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Config` when no home directory can be determined
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(default_session_path()?))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Entries::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| InfraError::from(e).into()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn save(&self, entries: &Entries) -> Result<()> {
        if entries.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(InfraError::from(e).into()),
            };
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }

        let contents = serde_json::to_vec_pretty(entries).map_err(InfraError::from)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, contents).await.map_err(InfraError::from)?;
        restrict_permissions(&staging).await?;
        tokio::fs::rename(&staging, &self.path).await.map_err(InfraError::from)?;

        debug!(path = %self.path.display(), keys = entries.len(), "session file written");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }

    async fn delete_if(&self, key: &str, expected: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.get(key).map(String::as_str) != Some(expected) {
            return Ok(false);
        }
        entries.remove(key);
        self.save(&entries).await?;
        Ok(true)
    }
}

/// Default location of the session file
///
/// # Errors
///
/// Returns `PortalError::Config` when no home directory can be determined
pub fn default_session_path() -> Result<PathBuf> {
    ProjectDirs::from("", "", "studentportal")
        .map(|dirs| dirs.data_dir().join(SESSION_FILE_NAME))
        .ok_or_else(|| PortalError::Config("unable to determine a data directory".to_string()))
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .map_err(|e| InfraError::from(e).into())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
