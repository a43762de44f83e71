//! SQLite-backed document store for keyrack.
//!
//! Plays the backing-store role behind `keyrack-core`'s session seam:
//! entries live in a single `kv_entries` table with a unique key column,
//! and sessions stage their changes in memory until `commit()` applies
//! them in one transaction.

mod error;
mod store;

pub use error::{SqliteStoreError, SqliteStoreResult};
pub use store::{SqliteSession, SqliteStore};
