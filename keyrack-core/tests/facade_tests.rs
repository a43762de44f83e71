use keyrack_core::{DocumentSession, Entry, KeyValueStore, KvError, MemoryStore, TypeRegistry};
use pretty_assertions::assert_eq;

fn store() -> KeyValueStore {
    KeyValueStore::new(TypeRegistry::new())
}

/// Stages a raw entry directly, bypassing the facade's write path.
fn plant_entry(session: &mut impl DocumentSession, key: &str, tag: &str, value: Option<&str>) {
    let mut entry = Entry::new(key, tag);
    entry.value = value.map(str::to_owned);
    session.stage_upsert(entry).unwrap();
}

// ── Strings ──────────────────────────────────────────────────────

#[test]
fn string_write_read_delete() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    assert!(!store.has_key(&mut session, "greeting").unwrap());

    store
        .set_string(&mut session, "greeting", Some("Hello World"))
        .unwrap();
    session.commit();

    assert!(store.has_key(&mut session, "greeting").unwrap());
    assert_eq!(
        store.get_string(&mut session, "greeting", None).unwrap(),
        Some("Hello World".to_owned())
    );

    store.delete_key(&mut session, "greeting").unwrap();
    session.commit();

    assert!(!store.has_key(&mut session, "greeting").unwrap());
    assert_eq!(store.get_string(&mut session, "greeting", None).unwrap(), None);
}

#[test]
fn missing_string_key_yields_default() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    assert_eq!(
        store
            .get_string(&mut session, "nowhere", Some("Test"))
            .unwrap(),
        Some("Test".to_owned())
    );
    assert_eq!(store.get_string(&mut session, "nowhere", None).unwrap(), None);
}

#[test]
fn delete_missing_key_is_silent_noop() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    store.delete_key(&mut session, "nowhere").unwrap();
    session.commit();
    assert_eq!(backing.entry_count(), 0);
}

#[test]
fn stored_null_string_is_none_not_default() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    store.set_string(&mut session, "empty", None).unwrap();
    session.commit();

    // The key exists, so the default must not kick in.
    assert!(store.has_key(&mut session, "empty").unwrap());
    assert_eq!(
        store
            .get_string(&mut session, "empty", Some("fallback"))
            .unwrap(),
        None
    );
}

#[test]
fn string_read_of_numeric_key_is_type_mismatch() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    store.set_i64(&mut session, "port", 8080).unwrap();
    session.commit();

    let err = store.get_string(&mut session, "port", None).unwrap_err();
    assert!(matches!(err, KvError::TypeMismatch { .. }));
}

#[test]
fn string_read_of_unknown_tag_is_mismatch_not_unknown_tag() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    plant_entry(&mut session, "odd", "mystery-tag", Some("??"));
    session.commit();

    // The string path never consults the registry, so even an unresolvable
    // tag surfaces as a mismatch.
    let err = store.get_string(&mut session, "odd", None).unwrap_err();
    assert!(matches!(err, KvError::TypeMismatch { .. }));
}

// ── Primitives ───────────────────────────────────────────────────

#[test]
fn bool_roundtrip() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    store.set_bool(&mut session, "flag", true).unwrap();
    session.commit();

    assert!(store.get_bool(&mut session, "flag", false).unwrap());
}

#[test]
fn i32_roundtrip() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    store.set_i32(&mut session, "count", 42).unwrap();
    session.commit();

    assert_eq!(store.get_i32(&mut session, "count", 0).unwrap(), 42);
}

#[test]
fn i64_roundtrip() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    store.set_i64(&mut session, "big", i64::MAX).unwrap();
    session.commit();

    assert_eq!(store.get_i64(&mut session, "big", 0).unwrap(), i64::MAX);
}

#[test]
fn f32_roundtrip_within_tolerance() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    store.set_f32(&mut session, "ratio", 42.558).unwrap();
    session.commit();

    let value = store.get_f32(&mut session, "ratio", 0.0).unwrap();
    assert!((value - 42.558).abs() < 1e-5);
}

#[test]
fn f64_roundtrip_within_tolerance() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    store.set_f64(&mut session, "ratio", 42.558).unwrap();
    session.commit();

    let value = store.get_f64(&mut session, "ratio", 0.0).unwrap();
    assert!((value - 42.558).abs() < 1e-5);
}

#[test]
fn special_floats_survive_storage() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    store.set_f64(&mut session, "inf", f64::INFINITY).unwrap();
    store.set_f64(&mut session, "ninf", f64::NEG_INFINITY).unwrap();
    store.set_f64(&mut session, "nan", f64::NAN).unwrap();
    session.commit();

    assert_eq!(
        store.get_f64(&mut session, "inf", 0.0).unwrap(),
        f64::INFINITY
    );
    assert_eq!(
        store.get_f64(&mut session, "ninf", 0.0).unwrap(),
        f64::NEG_INFINITY
    );
    assert!(store.get_f64(&mut session, "nan", 0.0).unwrap().is_nan());
}

#[test]
fn missing_keys_yield_defaults_for_every_kind() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    assert!(store.get_bool(&mut session, "none", true).unwrap());
    assert_eq!(store.get_i32(&mut session, "none", -5).unwrap(), -5);
    assert_eq!(store.get_i64(&mut session, "none", 99).unwrap(), 99);
    assert_eq!(store.get_f32(&mut session, "none", 1.5).unwrap(), 1.5);
    assert_eq!(store.get_f64(&mut session, "none", 2.5).unwrap(), 2.5);
    assert!(!store.has_key(&mut session, "none").unwrap());
}

#[test]
fn unparseable_primitive_yields_default() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    plant_entry(&mut session, "mangled", "i64", Some("not a number"));
    plant_entry(&mut session, "shouty", "bool", Some("TRUE"));
    session.commit();

    assert_eq!(store.get_i64(&mut session, "mangled", 7).unwrap(), 7);
    assert!(!store.get_bool(&mut session, "shouty", false).unwrap());
}

#[test]
fn stored_null_primitive_yields_default() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    plant_entry(&mut session, "hollow", "i32", None);
    session.commit();

    assert_eq!(store.get_i32(&mut session, "hollow", 13).unwrap(), 13);
}

#[test]
fn cross_kind_read_is_type_mismatch() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    store.set_i64(&mut session, "count", 10).unwrap();
    session.commit();

    let err = store.get_bool(&mut session, "count", false).unwrap_err();
    assert!(matches!(
        err,
        KvError::TypeMismatch { ref stored, ref requested, .. }
            if stored == "i64" && requested == "bool"
    ));

    // i32 and i64 are distinct kinds; no widening on read.
    let err = store.get_i32(&mut session, "count", 0).unwrap_err();
    assert!(matches!(err, KvError::TypeMismatch { .. }));
}

#[test]
fn unknown_tag_primitive_read_is_unknown_tag_error() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    plant_entry(&mut session, "odd", "mystery-tag", Some("1"));
    session.commit();

    let err = store.get_i64(&mut session, "odd", 0).unwrap_err();
    assert!(matches!(err, KvError::UnknownTag { ref tag, .. } if tag == "mystery-tag"));
}

#[test]
fn overwrite_retags_the_single_entry() {
    let store = store();
    let backing = MemoryStore::new();
    let mut session = backing.session();

    store.set_i64(&mut session, "slot", 1).unwrap();
    session.commit();
    store.set_bool(&mut session, "slot", true).unwrap();
    session.commit();

    assert_eq!(backing.entry_count(), 1);
    assert!(store.get_bool(&mut session, "slot", false).unwrap());
    let err = store.get_i64(&mut session, "slot", 0).unwrap_err();
    assert!(matches!(err, KvError::TypeMismatch { .. }));
}
