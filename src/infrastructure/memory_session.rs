// In-memory session store
use crate::application::session_store::{SessionStore, AUTH_TOKEN_KEY};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        store.set(AUTH_TOKEN_KEY, token.into());
        store
    }

    // Entries are plain strings, so a poisoned lock still holds usable data.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.write().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let store = InMemorySessionStore::default();
        assert_eq!(store.get("token"), None);

        store.set("token", "abc".to_string());
        assert_eq!(store.get("token"), Some("abc".to_string()));

        store.set("token", "def".to_string());
        assert_eq!(store.get("token"), Some("def".to_string()));

        store.remove("token");
        assert_eq!(store.get("token"), None);
        store.remove("token");
    }

    #[test]
    fn test_with_token_seeds_auth_key() {
        let store = InMemorySessionStore::with_token("seed");
        assert_eq!(store.get(AUTH_TOKEN_KEY), Some("seed".to_string()));
    }
}
