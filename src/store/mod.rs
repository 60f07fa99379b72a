//! Key/value storage for overlay state
//!
//! The overlay keeps four independent string records (CSS text, open flag,
//! position, size). A store only has to load, save and clear single keys.
//! Two backends ship with the crate:
//! - **MemoryStore**: process-local map, used by tests and ephemeral hosts
//! - **FileStore**: JSON object file under the user config directory

use anyhow::Result;
use std::collections::BTreeMap;

mod file;

pub use file::FileStore;

/// Namespaced key -> string storage
pub trait ConfigStore {
    /// Stored value for `key`, or `None` when the record does not exist
    fn load(&self, key: &str) -> Option<String>;

    /// Create or overwrite the record for `key`
    fn save(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the record for `key`. Clearing a missing key is not an error.
    fn clear(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip_and_clear() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("a"), None);

        store.save("a", "1").unwrap();
        store.save("a", "2").unwrap();
        assert_eq!(store.load("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.clear("a").unwrap();
        assert_eq!(store.load("a"), None);
        // Clearing again is a no-op
        store.clear("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_keys_are_independent() {
        let mut store = MemoryStore::new();
        store.save("css", "body{}").unwrap();
        store.save("open", "1").unwrap();
        store.clear("open").unwrap();
        assert_eq!(store.load("css").as_deref(), Some("body{}"));
    }
}
