//! Typed key-value storage over a document-oriented backing store.
//!
//! Keyrack keeps exactly one record per string key. Every record carries a
//! type tag alongside its encoded value; typed reads validate the tag
//! before decoding, and every miss resolves to a caller-supplied default.
//!
//! - [`KeyValueStore`] — the facade: per-kind get/set, presence, deletion
//! - [`DocumentSession`] — the caller-owned unit of work the facade stages
//!   reads and writes against; commit and durability stay with the caller
//! - [`TypeRegistry`] — closed-world mapping from stored tags to concrete
//!   object types and the views they may be read back as
//! - [`ObjectCodec`] / [`JsonCodec`] — pluggable object text encoding
//! - [`MemoryStore`] — in-memory backing store
//!
//! SQLite persistence lives in the companion `keyrack-sqlite` crate.
//!
//! # Example
//!
//! ```
//! use keyrack_core::{KeyValueStore, MemoryStore, TypeRegistry};
//!
//! # fn main() -> keyrack_core::KvResult<()> {
//! let store = KeyValueStore::new(TypeRegistry::new());
//! let backing = MemoryStore::new();
//! let mut session = backing.session();
//!
//! store.set_i64(&mut session, "retries", 3)?;
//! session.commit();
//!
//! assert_eq!(store.get_i64(&mut session, "retries", 0)?, 3);
//! assert_eq!(store.get_i64(&mut session, "missing", 42)?, 42);
//! # Ok(())
//! # }
//! ```

mod codec;
mod entry;
mod error;
mod memory;
mod registry;
mod session;
mod store;

pub use codec::{JsonCodec, ObjectCodec, tags};
pub use entry::{Entry, EntryId};
pub use error::{KvError, KvResult};
pub use memory::{MemorySession, MemoryStore};
pub use registry::TypeRegistry;
pub use session::DocumentSession;
pub use store::KeyValueStore;
