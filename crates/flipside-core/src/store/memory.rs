//! In-memory [`Store`] implementation for tests and embedding.
//!
//! Uses a `HashMap` behind `std::sync::RwLock` for thread safety.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::Store;

pub struct InMemoryStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("in-memory store lock poisoned")
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_blob(&self, key: &str) -> Result<Option<String>> {
        let blobs = self.blobs.read().map_err(poisoned)?;
        Ok(blobs.get(key).cloned())
    }

    async fn put_blob(&self, key: &str, value: &str) -> Result<()> {
        let mut blobs = self.blobs.write().map_err(poisoned)?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_blob(&self, key: &str) -> Result<bool> {
        let mut blobs = self.blobs.write().map_err(poisoned)?;
        Ok(blobs.remove(key).is_some())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let blobs = self.blobs.read().map_err(poisoned)?;
        let mut keys: Vec<String> = blobs.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
