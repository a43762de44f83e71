use keyrack_core::{Entry, EntryId, tags};
use serde_json::json;

// ── EntryId ──────────────────────────────────────────────────────

#[test]
fn ids_are_unique() {
    let a = EntryId::new();
    let b = EntryId::new();
    assert_ne!(a, b);
}

#[test]
fn id_display_parse_roundtrip() {
    let id = EntryId::new();
    let parsed = EntryId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn id_from_str_roundtrip() {
    let id = EntryId::new();
    let parsed: EntryId = id.to_string().parse().unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn id_rejects_garbage() {
    assert!(EntryId::parse("not-a-uuid").is_err());
}

#[test]
fn id_wraps_uuid() {
    let id = EntryId::new();
    assert_eq!(EntryId::from_uuid(id.as_uuid()), id);
}

// ── Entry ────────────────────────────────────────────────────────

#[test]
fn new_entry_is_blank() {
    let entry = Entry::new("config.retries", tags::I64);
    assert_eq!(entry.key, "config.retries");
    assert_eq!(entry.type_tag, tags::I64);
    assert_eq!(entry.value, None);
}

#[test]
fn entry_serde_shape() {
    let mut entry = Entry::new("greeting", tags::STRING);
    entry.value = Some("hi".to_owned());

    let document = serde_json::to_value(&entry).unwrap();
    assert_eq!(document["key"], json!("greeting"));
    assert_eq!(document["type_tag"], json!("string"));
    assert_eq!(document["value"], json!("hi"));
    // The id serializes as a plain UUID string.
    assert!(document["id"].is_string());
}

#[test]
fn entry_with_null_value_serializes_null() {
    let entry = Entry::new("empty", tags::STRING);
    let document = serde_json::to_value(&entry).unwrap();
    assert!(document["value"].is_null());
}

#[test]
fn entry_serde_roundtrip() {
    let mut entry = Entry::new("ratio", tags::F64);
    entry.value = Some("42.558".to_owned());

    let text = serde_json::to_string(&entry).unwrap();
    let reloaded: Entry = serde_json::from_str(&text).unwrap();
    assert_eq!(entry, reloaded);
}
