//! Port interface for credential persistence
//!
//! Replaces a hidden global key-value store with an explicit dependency that
//! is handed to the client at construction.

use async_trait::async_trait;
use studentportal_domain::Result;

/// Key-value storage for session secrets.
///
/// Implementations must serialise their own reads and writes so a reader never
/// observes a value mid-deletion.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value (idempotent)
    async fn delete(&self, key: &str) -> Result<()>;

    /// Remove `key` only while it still holds `expected`.
    ///
    /// Returns whether the value was removed. The provided implementation is
    /// not atomic; stores that hold a lock override it.
    async fn delete_if(&self, key: &str, expected: &str) -> Result<bool> {
        match self.get(key).await? {
            Some(current) if current == expected => {
                self.delete(key).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
