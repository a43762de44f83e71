//! The unit-of-work seam between the facade and a backing document store.

use crate::entry::Entry;
use crate::error::KvResult;

/// A caller-owned unit of work against the backing document store.
///
/// The facade only ever fetches single entries by exact key and stages
/// writes or deletes; committing — and therefore durability — belongs to
/// whoever owns the session. The facade adds no transaction management and
/// no retries on top of this contract.
///
/// Implementations should surface staged, uncommitted changes to later
/// `fetch_by_key` calls in the same session, so repeated writes to one key
/// within a unit of work mutate a single entry instead of staging entries
/// with colliding keys.
pub trait DocumentSession {
    /// Fetches the unique entry for `key`, if one exists.
    fn fetch_by_key(&mut self, key: &str) -> KvResult<Option<Entry>>;

    /// Stages `entry` (new or existing) for write. Not durable until the
    /// session owner commits.
    fn stage_upsert(&mut self, entry: Entry) -> KvResult<()>;

    /// Stages `entry` for permanent removal. Not durable until the session
    /// owner commits.
    fn stage_delete(&mut self, entry: Entry) -> KvResult<()>;
}
