//! The key-value facade: typed get/set over a caller-supplied session.
//!
//! Every read validates the stored type tag before decoding; every miss
//! resolves to the caller's default. Writes fetch-or-create the key's
//! entry, re-encode it, overwrite its tag with the value's concrete kind,
//! and stage the upsert — the session owner decides when any of it becomes
//! durable.

use crate::codec::{JsonCodec, ObjectCodec, Primitive, tags};
use crate::entry::Entry;
use crate::error::{KvError, KvResult};
use crate::registry::TypeRegistry;
use crate::session::DocumentSession;
use serde::Serialize;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

/// Typed key-value accessor over a document-oriented backing store.
///
/// Holds the type registry and the default object codec; all storage I/O
/// goes through the [`DocumentSession`] passed to each call.
pub struct KeyValueStore {
    registry: Arc<TypeRegistry>,
    codec: Arc<dyn ObjectCodec>,
}

impl KeyValueStore {
    /// Creates a store using the default JSON object codec.
    #[must_use]
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_codec(registry, Arc::new(JsonCodec))
    }

    /// Creates a store with a substitute object codec.
    #[must_use]
    pub fn with_codec(registry: TypeRegistry, codec: Arc<dyn ObjectCodec>) -> Self {
        Self {
            registry: Arc::new(registry),
            codec,
        }
    }

    // ── Presence & deletion ──────────────────────────────────────

    /// Whether an entry exists for `key`. No type checking.
    pub fn has_key(&self, session: &mut dyn DocumentSession, key: &str) -> KvResult<bool> {
        Ok(session.fetch_by_key(key)?.is_some())
    }

    /// Stages a hard delete of `key`'s entry. Deleting a missing key is a
    /// silent no-op.
    pub fn delete_key(&self, session: &mut dyn DocumentSession, key: &str) -> KvResult<()> {
        if let Some(entry) = session.fetch_by_key(key)? {
            session.stage_delete(entry)?;
        }
        Ok(())
    }

    // ── Strings ──────────────────────────────────────────────────

    /// Reads a string value.
    ///
    /// Strings bypass the registry and the codec entirely: the stored tag
    /// must be exactly `"string"` (anything else is a
    /// [`KvError::TypeMismatch`], even a tag that would not resolve) and the
    /// raw stored text comes back as-is. A stored null string is returned as
    /// `None`; only a missing key yields `default`.
    pub fn get_string(
        &self,
        session: &mut dyn DocumentSession,
        key: &str,
        default: Option<&str>,
    ) -> KvResult<Option<String>> {
        let Some(entry) = session.fetch_by_key(key)? else {
            return Ok(default.map(str::to_owned));
        };
        if entry.type_tag != tags::STRING {
            return Err(Self::mismatch(key, &entry.type_tag, tags::STRING));
        }
        Ok(entry.value)
    }

    /// Writes a string value. `None` stores an explicit null.
    pub fn set_string(
        &self,
        session: &mut dyn DocumentSession,
        key: &str,
        value: Option<&str>,
    ) -> KvResult<()> {
        let mut entry = Self::fetch_or_create(session, key, tags::STRING)?;
        entry.type_tag = tags::STRING.to_owned();
        entry.value = value.map(str::to_owned);
        session.stage_upsert(entry)
    }

    // ── Primitives ───────────────────────────────────────────────

    pub fn get_bool(
        &self,
        session: &mut dyn DocumentSession,
        key: &str,
        default: bool,
    ) -> KvResult<bool> {
        self.get_primitive(session, key, default)
    }

    pub fn set_bool(
        &self,
        session: &mut dyn DocumentSession,
        key: &str,
        value: bool,
    ) -> KvResult<()> {
        Self::set_primitive(session, key, value)
    }

    pub fn get_i32(
        &self,
        session: &mut dyn DocumentSession,
        key: &str,
        default: i32,
    ) -> KvResult<i32> {
        self.get_primitive(session, key, default)
    }

    pub fn set_i32(&self, session: &mut dyn DocumentSession, key: &str, value: i32) -> KvResult<()> {
        Self::set_primitive(session, key, value)
    }

    pub fn get_i64(
        &self,
        session: &mut dyn DocumentSession,
        key: &str,
        default: i64,
    ) -> KvResult<i64> {
        self.get_primitive(session, key, default)
    }

    pub fn set_i64(&self, session: &mut dyn DocumentSession, key: &str, value: i64) -> KvResult<()> {
        Self::set_primitive(session, key, value)
    }

    pub fn get_f32(
        &self,
        session: &mut dyn DocumentSession,
        key: &str,
        default: f32,
    ) -> KvResult<f32> {
        self.get_primitive(session, key, default)
    }

    pub fn set_f32(&self, session: &mut dyn DocumentSession, key: &str, value: f32) -> KvResult<()> {
        Self::set_primitive(session, key, value)
    }

    pub fn get_f64(
        &self,
        session: &mut dyn DocumentSession,
        key: &str,
        default: f64,
    ) -> KvResult<f64> {
        self.get_primitive(session, key, default)
    }

    pub fn set_f64(&self, session: &mut dyn DocumentSession, key: &str, value: f64) -> KvResult<()> {
        Self::set_primitive(session, key, value)
    }

    /// Shared read path for the primitive kinds: fetch, validate the stored
    /// tag, parse. A missing key, a stored null, and unparseable text all
    /// resolve to `default`; only tag trouble is an error.
    fn get_primitive<P: Primitive>(
        &self,
        session: &mut dyn DocumentSession,
        key: &str,
        default: P,
    ) -> KvResult<P> {
        let Some(entry) = session.fetch_by_key(key)? else {
            return Ok(default);
        };
        if entry.type_tag != P::TAG {
            return Err(self.classify_foreign_tag(key, &entry.type_tag, P::TAG));
        }
        Ok(entry.value.as_deref().and_then(P::decode).unwrap_or(default))
    }

    fn set_primitive<P: Primitive>(
        session: &mut dyn DocumentSession,
        key: &str,
        value: P,
    ) -> KvResult<()> {
        let mut entry = Self::fetch_or_create(session, key, P::TAG)?;
        entry.type_tag = P::TAG.to_owned();
        entry.value = Some(value.encode());
        session.stage_upsert(entry)
    }

    // ── Objects ──────────────────────────────────────────────────

    /// Reads an object value using the store's default codec.
    ///
    /// The stored tag must resolve in the registry, and the registered type
    /// must be `T` itself or carry a view to `T`. A view read returns the
    /// original concrete subtype behind the view type. A missing key, a
    /// stored null, and a null document all resolve to `default`.
    pub fn get_object<T: Any>(
        &self,
        session: &mut dyn DocumentSession,
        key: &str,
        default: Option<T>,
    ) -> KvResult<Option<T>> {
        self.get_object_with(&*self.codec, session, key, default)
    }

    /// Reads an object value through `codec` instead of the store default.
    pub fn get_object_with<T: Any>(
        &self,
        codec: &dyn ObjectCodec,
        session: &mut dyn DocumentSession,
        key: &str,
        default: Option<T>,
    ) -> KvResult<Option<T>> {
        let Some(entry) = session.fetch_by_key(key)? else {
            return Ok(default);
        };
        let requested = type_name::<T>();
        if tags::is_primitive(&entry.type_tag) {
            return Err(Self::mismatch(key, &entry.type_tag, requested));
        }
        let Some(registration) = self.registry.by_tag(&entry.type_tag) else {
            return Err(KvError::UnknownTag {
                key: key.to_owned(),
                tag: entry.type_tag,
            });
        };

        let target = TypeId::of::<T>();
        let direct = registration.type_id() == target;
        if !direct && !registration.has_view(target) {
            return Err(Self::mismatch(key, &entry.type_tag, requested));
        }

        let Some(text) = entry.value.as_deref() else {
            return Ok(default);
        };
        let Some(decoded) = registration.decode(codec, text)? else {
            return Ok(default);
        };
        let boxed = if direct {
            decoded
        } else {
            registration.apply_view(target, decoded)
        };
        match boxed.downcast::<T>() {
            Ok(value) => Ok(Some(*value)),
            Err(_) => Err(Self::mismatch(key, &entry.type_tag, requested)),
        }
    }

    /// Writes an object value using the store's default codec.
    ///
    /// The entry is tagged with the registry tag of `T` — the value's
    /// concrete type — which is what lets a later read through a view
    /// recover the subtype.
    pub fn set_object<T: Serialize + Any>(
        &self,
        session: &mut dyn DocumentSession,
        key: &str,
        value: &T,
    ) -> KvResult<()> {
        self.set_object_with(&*self.codec, session, key, value)
    }

    /// Writes an object value through `codec` instead of the store default.
    pub fn set_object_with<T: Serialize + Any>(
        &self,
        codec: &dyn ObjectCodec,
        session: &mut dyn DocumentSession,
        key: &str,
        value: &T,
    ) -> KvResult<()> {
        let Some(tag) = self.registry.tag_for(TypeId::of::<T>()) else {
            return Err(KvError::UnregisteredType {
                type_name: type_name::<T>(),
            });
        };
        let document = serde_json::to_value(value)?;
        if document.is_null() {
            return Err(KvError::NullEncoding {
                key: key.to_owned(),
            });
        }
        let text = codec.encode(&document)?;

        let mut entry = Self::fetch_or_create(session, key, tag)?;
        entry.type_tag = tag.to_owned();
        entry.value = Some(text);
        session.stage_upsert(entry)
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn fetch_or_create(
        session: &mut dyn DocumentSession,
        key: &str,
        tag: &str,
    ) -> KvResult<Entry> {
        Ok(session
            .fetch_by_key(key)?
            .unwrap_or_else(|| Entry::new(key, tag)))
    }

    /// A foreign stored tag is a mismatch when something in the process
    /// could resolve it, and an unknown-tag failure when nothing can.
    fn classify_foreign_tag(&self, key: &str, stored: &str, requested: &str) -> KvError {
        if tags::is_primitive(stored) || self.registry.contains_tag(stored) {
            Self::mismatch(key, stored, requested)
        } else {
            KvError::UnknownTag {
                key: key.to_owned(),
                tag: stored.to_owned(),
            }
        }
    }

    fn mismatch(key: &str, stored: &str, requested: &str) -> KvError {
        KvError::TypeMismatch {
            key: key.to_owned(),
            stored: stored.to_owned(),
            requested: requested.to_owned(),
        }
    }
}
