//! Process-local session store

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use studentportal_core::SessionStore;
use studentportal_domain::Result;

/// Session store that lives as long as the process.
///
/// Every operation holds the lock for its whole duration, so `delete_if` is
/// atomic here.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.values.write().remove(key);
        Ok(())
    }

    async fn delete_if(&self, key: &str, expected: &str) -> Result<bool> {
        let mut values = self.values.write();
        if values.get(key).is_some_and(|current| current == expected) {
            values.remove(key);
            return Ok(true);
        }
        Ok(false)
    }
}
