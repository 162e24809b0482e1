//! Conversation and session stores
//!
//! Each store is a single JSON-serialized record living under a fixed key
//! in [`SessionStorage`]. Writes overwrite, reads never fail: absent or
//! malformed content reads as `None` and the caller decides whether that is
//! fatal.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use authkit_domain::constants::{CONVERSATION_STORAGE_KEY, SESSION_STORAGE_KEY};
use authkit_domain::{ConversationState, Result, SessionState};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::ports::SessionStorage;

/// One typed record in session storage.
pub struct JsonSlot<T> {
    storage: Arc<dyn SessionStorage>,
    key: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonSlot<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Slot for the record stored under `key`.
    pub fn new(storage: Arc<dyn SessionStorage>, key: &'static str) -> Self {
        Self { storage, key, _record: PhantomData }
    }

    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Read the record, treating malformed JSON as absent.
    pub fn read(&self) -> Option<T> {
        let raw = self.storage.get_item(self.key)?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(key = self.key, error = %err, "ignoring malformed storage slot");
                None
            }
        }
    }

    /// Overwrite the record.
    ///
    /// # Errors
    /// Returns `AuthKitError::Internal` if the record cannot be serialized, or
    /// the storage backend's error if the write is rejected.
    pub fn write(&self, record: &T) -> Result<()> {
        let raw = serde_json::to_string(record)?;
        self.storage.set_item(self.key, &raw)
    }

    /// Remove the record.
    pub fn clear(&self) {
        self.storage.remove_item(self.key);
    }
}

impl<T> fmt::Debug for JsonSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSlot").field("key", &self.key).finish_non_exhaustive()
    }
}

/// Pending conversation slot.
pub type ConversationStore = JsonSlot<ConversationState>;

/// Authenticated session slot.
pub type SessionStore = JsonSlot<SessionState>;

/// Conversation store bound to its well-known key.
pub fn conversation_store(storage: Arc<dyn SessionStorage>) -> ConversationStore {
    JsonSlot::new(storage, CONVERSATION_STORAGE_KEY)
}

/// Session store bound to its well-known key.
pub fn session_store(storage: Arc<dyn SessionStorage>) -> SessionStore {
    JsonSlot::new(storage, SESSION_STORAGE_KEY)
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::store.
    use std::collections::HashMap;

    use authkit_domain::{AuthKitError, Tokens};
    use parking_lot::Mutex;

    use super::*;

    #[derive(Default)]
    struct MapStorage {
        items: Mutex<HashMap<String, String>>,
        reject_writes: bool,
    }

    impl SessionStorage for MapStorage {
        fn get_item(&self, key: &str) -> Option<String> {
            self.items.lock().get(key).cloned()
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            if self.reject_writes {
                return Err(AuthKitError::Storage("quota exceeded".into()));
            }
            self.items.lock().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove_item(&self, key: &str) {
            self.items.lock().remove(key);
        }
    }

    /// Validates `JsonSlot` behavior for the overwrite and clear scenario.
    ///
    /// Assertions:
    /// - Confirms a written record reads back equal.
    /// - Confirms a second write replaces the first.
    /// - Confirms `clear` empties the slot.
    #[test]
    fn test_write_read_overwrite_clear() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MapStorage::default());
        let store = conversation_store(Arc::clone(&storage));

        assert!(store.read().is_none());

        store.write(&ConversationState::new("n1", "v1", "https://app.example/a")).unwrap();
        store.write(&ConversationState::new("n2", "v2", "https://app.example/b")).unwrap();
        assert_eq!(store.read(), Some(ConversationState::new("n2", "v2", "https://app.example/b")));

        store.clear();
        assert!(store.read().is_none());
        assert!(storage.get_item(CONVERSATION_STORAGE_KEY).is_none());
    }

    /// Validates `JsonSlot::read` behavior for the malformed content scenario.
    ///
    /// Assertions:
    /// - Ensures invalid JSON reads as empty instead of failing.
    /// - Ensures JSON of the wrong shape reads as empty.
    #[test]
    fn test_malformed_content_reads_as_empty() {
        let storage = Arc::new(MapStorage::default());
        storage.set_item(SESSION_STORAGE_KEY, "{not json").unwrap();
        let store = session_store(storage.clone());
        assert!(store.read().is_none());

        storage.set_item(SESSION_STORAGE_KEY, r#"{"unexpected":true}"#).unwrap();
        assert!(store.read().is_none());
    }

    #[test]
    fn test_slots_use_distinct_keys() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MapStorage::default());
        let conversations = conversation_store(Arc::clone(&storage));
        let sessions = session_store(Arc::clone(&storage));

        conversations.write(&ConversationState::new("n", "v", "o")).unwrap();
        sessions
            .write(&SessionState::from_tokens(Tokens::new("T", 3600), 0, 30, None))
            .unwrap();
        sessions.clear();

        assert!(conversations.read().is_some());
        assert!(sessions.read().is_none());
        assert_ne!(conversations.key(), sessions.key());
    }

    #[test]
    fn test_write_surfaces_storage_errors() {
        let storage = Arc::new(MapStorage { reject_writes: true, ..MapStorage::default() });
        let store = conversation_store(storage);

        let err = store.write(&ConversationState::new("n", "v", "o")).unwrap_err();
        assert_eq!(err, AuthKitError::Storage("quota exceeded".into()));
    }
}
