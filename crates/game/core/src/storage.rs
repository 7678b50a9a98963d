//! Namespaced key-value persistence contract.
//!
//! The core never reads or writes storage; module-specific business logic
//! may, through this interface. [`MemoryStorage`] backs tests and
//! persistence-free hosts.

use std::collections::HashMap;
use std::sync::Mutex;

/// Namespaced get/set/remove keyed by string. Values are serialized blobs;
/// the storage layer never interprets them.
pub trait Storage: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Option<String>;
    fn set(&self, namespace: &str, key: &str, value: String);
    fn remove(&self, namespace: &str, key: &str) -> Option<String>;
}

/// In-memory storage, keyed by `(namespace, key)`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, namespace: &str, key: &str) -> Option<String> {
        let entries = self.entries.lock().expect("storage lock poisoned");
        entries.get(&(namespace.to_owned(), key.to_owned())).cloned()
    }

    fn set(&self, namespace: &str, key: &str, value: String) {
        let mut entries = self.entries.lock().expect("storage lock poisoned");
        entries.insert((namespace.to_owned(), key.to_owned()), value);
    }

    fn remove(&self, namespace: &str, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().expect("storage lock poisoned");
        entries.remove(&(namespace.to_owned(), key.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_are_isolated() {
        let storage = MemoryStorage::new();
        storage.set("trivia", "score", "10".into());
        storage.set("karaoke", "score", "99".into());

        assert_eq!(storage.get("trivia", "score").as_deref(), Some("10"));
        assert_eq!(storage.get("karaoke", "score").as_deref(), Some("99"));
        assert_eq!(storage.get("other", "score"), None);
    }

    #[test]
    fn remove_returns_previous_value() {
        let storage = MemoryStorage::new();
        storage.set("ns", "k", "v".into());
        assert_eq!(storage.remove("ns", "k").as_deref(), Some("v"));
        assert_eq!(storage.remove("ns", "k"), None);
    }
}
