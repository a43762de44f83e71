//! The persisted record shape.
//!
//! One [`Entry`] exists per distinct key. The backing store owns the
//! persisted copy; the facade only ever holds an in-memory copy for the
//! duration of a single fetch-then-stage operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a stored entry.
///
/// Uses UUID v7, which embeds a timestamp for database-friendly ordering.
/// Ids are generated once at entry creation and never used for key lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Creates a new entry ID with the current timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates an entry ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses an entry ID from a string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The single persisted record for one key.
///
/// `type_tag` names the kind `value` was encoded under; the two are always
/// written together. A `value` of `None` is a legal stored state — it
/// represents an explicitly stored null string value, not a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub key: String,
    pub type_tag: String,
    pub value: Option<String>,
}

impl Entry {
    /// Creates a blank entry bound to `key`, tagged but with no value yet.
    #[must_use]
    pub fn new(key: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            key: key.into(),
            type_tag: type_tag.into(),
            value: None,
        }
    }
}
