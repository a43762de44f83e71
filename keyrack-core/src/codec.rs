//! Value encodings: canonical primitive strings and the pluggable object
//! codec.

use crate::error::KvResult;

/// Type tags for the built-in primitive kinds.
///
/// These strings are part of the stored data format: they appear in every
/// persisted entry's `type_tag` column and must remain stable.
pub mod tags {
    pub const STRING: &str = "string";
    pub const BOOL: &str = "bool";
    pub const I32: &str = "i32";
    pub const I64: &str = "i64";
    pub const F32: &str = "f32";
    pub const F64: &str = "f64";

    /// Whether `tag` is one of the built-in primitive tags.
    pub(crate) fn is_primitive(tag: &str) -> bool {
        matches!(tag, STRING | BOOL | I32 | I64 | F32 | F64)
    }
}

/// A primitive kind storable under a canonical string form.
///
/// Encoding uses Rust's `Display`/`FromStr`, which are locale-independent:
/// the stored text never varies with the environment, and float output is
/// the shortest form that round-trips. Decode failure is `None`, which the
/// facade resolves to the caller's default — tolerant reads are part of the
/// primitive contract, unlike the strict tag validation that precedes them.
pub(crate) trait Primitive: Sized {
    /// Tag written alongside values of this kind.
    const TAG: &'static str;

    fn encode(&self) -> String;

    fn decode(text: &str) -> Option<Self>;
}

macro_rules! primitive_impl {
    ($ty:ty, $tag:expr) => {
        impl Primitive for $ty {
            const TAG: &'static str = $tag;

            fn encode(&self) -> String {
                self.to_string()
            }

            fn decode(text: &str) -> Option<Self> {
                text.parse().ok()
            }
        }
    };
}

primitive_impl!(bool, tags::BOOL);
primitive_impl!(i32, tags::I32);
primitive_impl!(i64, tags::I64);
primitive_impl!(f32, tags::F32);
primitive_impl!(f64, tags::F64);

/// Strategy for converting object documents to and from their stored text.
///
/// The facade holds a default codec ([`JsonCodec`]) and accepts a substitute
/// per store or per call. Implementations own the stored text format;
/// callers only ever see decoded documents.
pub trait ObjectCodec: Send + Sync {
    /// Renders a document to the text stored in an entry.
    fn encode(&self, document: &serde_json::Value) -> KvResult<String>;

    /// Parses stored text back into a document.
    fn decode(&self, text: &str) -> KvResult<serde_json::Value>;
}

/// Default object codec: compact JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ObjectCodec for JsonCodec {
    fn encode(&self, document: &serde_json::Value) -> KvResult<String> {
        Ok(serde_json::to_string(document)?)
    }

    fn decode(&self, text: &str) -> KvResult<serde_json::Value> {
        Ok(serde_json::from_str(text)?)
    }
}
