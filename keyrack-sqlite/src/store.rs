//! Document store and sessions over a SQLite database.

use crate::error::{SqliteStoreError, SqliteStoreResult};
use keyrack_core::{DocumentSession, Entry, EntryId, KvError, KvResult};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// SQLite-backed document store holding committed entries.
///
/// The connection is shared between the store handle and every session
/// opened from it; SQLite serializes access through the mutex.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> SqliteStoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened keyrack store");
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> SqliteStoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> SqliteStoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv_entries (
                id TEXT PRIMARY KEY,
                key TEXT NOT NULL UNIQUE,
                type_tag TEXT NOT NULL,
                value TEXT
            );
            ",
        )?;
        debug!("keyrack schema ready");
        Ok(())
    }

    /// Opens a unit of work against this store.
    #[must_use]
    pub fn session(&self) -> SqliteSession {
        SqliteSession {
            conn: Arc::clone(&self.conn),
            pending: HashMap::new(),
        }
    }

    /// Number of committed entries.
    pub fn entry_count(&self) -> SqliteStoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// One staged operation, keyed by entry key in the session.
enum Staged {
    Upsert(Entry),
    Delete(EntryId),
}

/// A unit of work over a [`SqliteStore`].
///
/// Staged changes are visible to this session's own fetches and become
/// durable only when [`commit`](SqliteSession::commit) applies them in a
/// single transaction.
pub struct SqliteSession {
    conn: Arc<Mutex<Connection>>,
    pending: HashMap<String, Staged>,
}

impl SqliteSession {
    /// Applies all staged changes in one transaction and clears the staging
    /// area. Upserts preserve the row id of an existing key; deletes remove
    /// the row outright.
    pub fn commit(&mut self) -> SqliteStoreResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        for (_, staged) in self.pending.drain() {
            match staged {
                Staged::Upsert(entry) => {
                    tx.execute(
                        "INSERT INTO kv_entries (id, key, type_tag, value) VALUES (?1, ?2, ?3, ?4)
                         ON CONFLICT(key) DO UPDATE SET type_tag = excluded.type_tag, value = excluded.value",
                        params![entry.id.to_string(), entry.key, entry.type_tag, entry.value],
                    )?;
                }
                Staged::Delete(id) => {
                    tx.execute(
                        "DELETE FROM kv_entries WHERE id = ?1",
                        params![id.to_string()],
                    )?;
                }
            }
        }
        tx.commit()?;
        debug!("committed keyrack session");
        Ok(())
    }

    /// Discards all staged changes.
    pub fn rollback(&mut self) {
        self.pending.clear();
    }

    fn fetch_committed(&self, key: &str) -> SqliteStoreResult<Option<Entry>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT id, key, type_tag, value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| {
                    let id: String = row.get(0)?;
                    let key: String = row.get(1)?;
                    let type_tag: String = row.get(2)?;
                    let value: Option<String> = row.get(3)?;
                    Ok((id, key, type_tag, value))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((id, key, type_tag, value)) => {
                let id = EntryId::parse(&id)
                    .map_err(|e| SqliteStoreError::InvalidData(format!("invalid entry id: {e}")))?;
                Ok(Some(Entry {
                    id,
                    key,
                    type_tag,
                    value,
                }))
            }
        }
    }
}

impl DocumentSession for SqliteSession {
    fn fetch_by_key(&mut self, key: &str) -> KvResult<Option<Entry>> {
        match self.pending.get(key) {
            Some(Staged::Upsert(entry)) => return Ok(Some(entry.clone())),
            Some(Staged::Delete(_)) => return Ok(None),
            None => {}
        }
        self.fetch_committed(key).map_err(KvError::session)
    }

    fn stage_upsert(&mut self, entry: Entry) -> KvResult<()> {
        self.pending.insert(entry.key.clone(), Staged::Upsert(entry));
        Ok(())
    }

    fn stage_delete(&mut self, entry: Entry) -> KvResult<()> {
        self.pending.insert(entry.key.clone(), Staged::Delete(entry.id));
        Ok(())
    }
}
