//! Closed-world mapping from stored type tags to concrete Rust types.
//!
//! Object reads must materialize the concrete type a value was stored
//! under, even when the caller asks for a broader view of it. The registry
//! is the source of that knowledge: callers declare, at configuration time,
//! every concrete type that may appear in the store and every view (such as
//! a boxed trait object) a stored type may be read back as. A stored tag
//! with no registration cannot be read, and a concrete type with no
//! registration cannot be written.

use crate::codec::ObjectCodec;
use crate::error::{KvError, KvResult};
use serde::de::DeserializeOwned;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

pub(crate) type BoxedValue = Box<dyn Any + Send>;

type DecodeFn = Box<dyn Fn(&dyn ObjectCodec, &str) -> KvResult<Option<BoxedValue>> + Send + Sync>;
type UpcastFn = Box<dyn Fn(BoxedValue) -> BoxedValue + Send + Sync>;

/// One registered concrete type: its tag, its decoder, and the views it may
/// be read back as.
pub(crate) struct Registration {
    tag: String,
    type_id: TypeId,
    decode: DecodeFn,
    views: HashMap<TypeId, UpcastFn>,
}

impl Registration {
    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn has_view(&self, target: TypeId) -> bool {
        self.views.contains_key(&target)
    }

    pub(crate) fn decode(
        &self,
        codec: &dyn ObjectCodec,
        text: &str,
    ) -> KvResult<Option<BoxedValue>> {
        (self.decode)(codec, text)
    }

    pub(crate) fn apply_view(&self, target: TypeId, value: BoxedValue) -> BoxedValue {
        match self.views.get(&target) {
            Some(upcast) => upcast(value),
            None => value,
        }
    }
}

/// Registry of object types, keyed by stored tag.
///
/// Built once at configuration time and handed to the facade. Registering a
/// tag or type again replaces the earlier registration.
#[derive(Default)]
pub struct TypeRegistry {
    by_type: HashMap<TypeId, Registration>,
    tag_to_type: HashMap<String, TypeId>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers concrete type `T` under `tag`.
    ///
    /// `tag` is what gets written to storage when a `T` is stored, and what
    /// resolves back to `T` on read. Decoding runs the object codec and then
    /// deserializes the document into `T`; a null document decodes to "no
    /// value" so the facade can fall back to the caller's default.
    pub fn register<T>(&mut self, tag: impl Into<String>)
    where
        T: DeserializeOwned + Any + Send + 'static,
    {
        let tag = tag.into();
        if let Some(old_type) = self.tag_to_type.remove(&tag) {
            self.by_type.remove(&old_type);
        }
        if let Some(old) = self.by_type.remove(&TypeId::of::<T>()) {
            self.tag_to_type.remove(&old.tag);
        }

        let decode: DecodeFn = Box::new(|codec, text| {
            let document = codec.decode(text)?;
            if document.is_null() {
                return Ok(None);
            }
            let value: T = serde_json::from_value(document)?;
            Ok(Some(Box::new(value) as BoxedValue))
        });

        self.by_type.insert(
            TypeId::of::<T>(),
            Registration {
                tag: tag.clone(),
                type_id: TypeId::of::<T>(),
                decode,
                views: HashMap::new(),
            },
        );
        self.tag_to_type.insert(tag, TypeId::of::<T>());
    }

    /// Declares that a stored `T` may also be read back as `V`.
    ///
    /// `V` is typically a boxed trait object (`Box<dyn Animal>`); the
    /// upcast preserves the concrete value, so a read requesting `V`
    /// returns the original subtype behind the view. `T` must already be
    /// registered.
    pub fn register_view<T, V>(&mut self, upcast: fn(T) -> V) -> KvResult<()>
    where
        T: Any + Send + 'static,
        V: Any + Send + 'static,
    {
        let registration = self
            .by_type
            .get_mut(&TypeId::of::<T>())
            .ok_or(KvError::UnregisteredType {
                type_name: type_name::<T>(),
            })?;

        let boxed: UpcastFn = Box::new(move |value| match value.downcast::<T>() {
            Ok(concrete) => Box::new(upcast(*concrete)) as BoxedValue,
            Err(original) => original,
        });
        registration.views.insert(TypeId::of::<V>(), boxed);
        Ok(())
    }

    pub(crate) fn by_tag(&self, tag: &str) -> Option<&Registration> {
        self.tag_to_type
            .get(tag)
            .and_then(|type_id| self.by_type.get(type_id))
    }

    pub(crate) fn tag_for(&self, type_id: TypeId) -> Option<&str> {
        self.by_type
            .get(&type_id)
            .map(|registration| registration.tag.as_str())
    }

    pub(crate) fn contains_tag(&self, tag: &str) -> bool {
        self.tag_to_type.contains_key(tag)
    }
}
