//! # In-Memory Stores
//!
//! A generic, clonable, thread-safe store over `Arc<RwLock<HashMap>>`.
//! Persistence technology is an external concern of this system; the
//! engine is written against this minimal surface, and the conditional
//! mutation primitives ([`Store::try_update`], [`Store::remove_if`]) are
//! the contract a database-backed replacement must honor: decision and
//! write happen against the same observed record.
//!
//! Cloning a store clones the handle, not the data — all clones share
//! the same underlying map.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use hse_core::User;
use hse_state::{Attachment, Session};

/// Generic keyed store for records with UUID identity.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace the record under `id`.
    pub fn insert(&self, id: Uuid, value: T) {
        self.data.write().insert(id, value);
    }

    /// Fetch a clone of the record under `id`.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// Clones of all records, in map order.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Mutate the record under `id` in place. Returns the updated record,
    /// or `None` if absent.
    pub fn update<F>(&self, id: &Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut guard = self.data.write();
        let value = guard.get_mut(id)?;
        f(value);
        Some(value.clone())
    }

    /// Validate-and-mutate under one write lock.
    ///
    /// The closure observes the current record and may refuse the update
    /// by returning `Err`; the record is then left exactly as observed.
    /// Because decision and write share the lock, no other writer can
    /// slip between them — the in-memory form of an atomic conditional
    /// update.
    ///
    /// Returns `None` if no record exists under `id`.
    pub fn try_update<R, E, F>(&self, id: &Uuid, f: F) -> Option<Result<R, E>>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let mut guard = self.data.write();
        let value = guard.get_mut(id)?;
        // On Err the closure must not have left partial writes behind;
        // engine closures validate before touching the record.
        Some(f(value))
    }

    /// Validate-and-remove under one write lock.
    ///
    /// The predicate decides against the current record; on `Ok` the
    /// record is removed and returned, on `Err` it stays untouched.
    /// Returns `None` if no record exists under `id`.
    pub fn remove_if<E, F>(&self, id: &Uuid, f: F) -> Option<Result<T, E>>
    where
        F: FnOnce(&T) -> Result<(), E>,
    {
        let mut guard = self.data.write();
        let value = guard.get(id)?;
        match f(value) {
            Ok(()) => {
                let removed = guard.remove(id);
                removed.map(Ok)
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Remove the record under `id`, returning it.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Whether a record exists under `id`.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.data.read().contains_key(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

// Manual impl: `#[derive(Clone)]` would require `T: Clone` on the handle
// clone, which only copies the Arc.
impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Store of declared sessions, keyed by session id.
pub type SessionStore = Store<Session>;

/// Store of user accounts, keyed by user id.
pub type UserStore = Store<User>;

/// Store of attachment metadata, keyed by attachment id.
pub type AttachmentStore = Store<Attachment>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let store: Store<String> = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, "hello".to_string());
        assert_eq!(store.get(&id), Some("hello".to_string()));
        assert!(store.contains(&id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store: Store<String> = Store::new();
        assert_eq!(store.get(&Uuid::new_v4()), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_mutates_in_place() {
        let store: Store<u32> = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, 1);
        let updated = store.update(&id, |v| *v += 10);
        assert_eq!(updated, Some(11));
        assert_eq!(store.get(&id), Some(11));
    }

    #[test]
    fn test_update_missing_returns_none() {
        let store: Store<u32> = Store::new();
        assert_eq!(store.update(&Uuid::new_v4(), |v| *v += 1), None);
    }

    // ── try_update ───────────────────────────────────────────────

    #[test]
    fn test_try_update_ok_applies() {
        let store: Store<u32> = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, 5);
        let result: Option<Result<u32, &str>> = store.try_update(&id, |v| {
            *v += 1;
            Ok(*v)
        });
        assert_eq!(result, Some(Ok(6)));
        assert_eq!(store.get(&id), Some(6));
    }

    #[test]
    fn test_try_update_err_propagates() {
        let store: Store<u32> = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, 5);
        let result: Option<Result<(), &str>> = store.try_update(&id, |_| Err("refused"));
        assert_eq!(result, Some(Err("refused")));
        assert_eq!(store.get(&id), Some(5));
    }

    #[test]
    fn test_try_update_missing_returns_none() {
        let store: Store<u32> = Store::new();
        let result: Option<Result<(), &str>> = store.try_update(&Uuid::new_v4(), |_| Ok(()));
        assert!(result.is_none());
    }

    // ── remove_if ────────────────────────────────────────────────

    #[test]
    fn test_remove_if_ok_removes() {
        let store: Store<u32> = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, 7);
        let result: Option<Result<u32, &str>> = store.remove_if(&id, |_| Ok(()));
        assert_eq!(result, Some(Ok(7)));
        assert!(!store.contains(&id));
    }

    #[test]
    fn test_remove_if_err_keeps_record() {
        let store: Store<u32> = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, 7);
        let result: Option<Result<u32, &str>> = store.remove_if(&id, |_| Err("locked"));
        assert_eq!(result, Some(Err("locked")));
        assert_eq!(store.get(&id), Some(7));
    }

    #[test]
    fn test_remove_if_missing_returns_none() {
        let store: Store<u32> = Store::new();
        let result: Option<Result<u32, &str>> = store.remove_if(&Uuid::new_v4(), |_| Ok(()));
        assert!(result.is_none());
    }

    // ── Handle semantics ─────────────────────────────────────────

    #[test]
    fn test_clones_share_data() {
        let store: Store<u32> = Store::new();
        let clone = store.clone();
        let id = Uuid::new_v4();
        store.insert(id, 42);
        assert_eq!(clone.get(&id), Some(42));
        clone.remove(&id);
        assert!(!store.contains(&id));
    }
}
