//! In-memory document store.
//!
//! The zero-setup backing store: tests run against it, and it serves
//! ephemeral configuration that never needs to survive the process. The
//! committed map is shared between the store handle and every session
//! opened from it.

use crate::entry::Entry;
use crate::error::KvResult;
use crate::session::DocumentSession;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory document store holding committed entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a unit of work against this store.
    #[must_use]
    pub fn session(&self) -> MemorySession {
        MemorySession {
            entries: Arc::clone(&self.entries),
            pending: HashMap::new(),
        }
    }

    /// Number of committed entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

/// A unit of work over a [`MemoryStore`].
///
/// Changes are staged in the session and only become visible to other
/// sessions on [`commit`](MemorySession::commit). The session's own fetches
/// see its staged changes.
pub struct MemorySession {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    /// Key → staged upsert, or `None` for a staged delete.
    pending: HashMap<String, Option<Entry>>,
}

impl MemorySession {
    /// Applies all staged changes to the store and clears the staging area.
    pub fn commit(&mut self) {
        let mut entries = self.entries.lock().unwrap();
        for (key, op) in self.pending.drain() {
            match op {
                Some(entry) => {
                    entries.insert(key, entry);
                }
                None => {
                    entries.remove(&key);
                }
            }
        }
    }

    /// Discards all staged changes.
    pub fn rollback(&mut self) {
        self.pending.clear();
    }
}

impl DocumentSession for MemorySession {
    fn fetch_by_key(&mut self, key: &str) -> KvResult<Option<Entry>> {
        if let Some(staged) = self.pending.get(key) {
            return Ok(staged.clone());
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn stage_upsert(&mut self, entry: Entry) -> KvResult<()> {
        self.pending.insert(entry.key.clone(), Some(entry));
        Ok(())
    }

    fn stage_delete(&mut self, entry: Entry) -> KvResult<()> {
        self.pending.insert(entry.key.clone(), None);
        Ok(())
    }
}
