use keyrack_core::KvError;

#[test]
fn display_unknown_tag() {
    let err = KvError::UnknownTag {
        key: "settings.theme".into(),
        tag: "ghost".into(),
    };
    let msg = format!("{err}");
    assert!(msg.contains("no type registered"));
    assert!(msg.contains("ghost"));
    assert!(msg.contains("settings.theme"));
}

#[test]
fn display_type_mismatch_names_all_parties() {
    let err = KvError::TypeMismatch {
        key: "port".into(),
        stored: "i64".into(),
        requested: "bool".into(),
    };
    let msg = format!("{err}");
    assert!(msg.contains("port"));
    assert!(msg.contains("i64"));
    assert!(msg.contains("bool"));
}

#[test]
fn display_unregistered_type() {
    let err = KvError::UnregisteredType {
        type_name: "acme::Widget",
    };
    let msg = format!("{err}");
    assert!(msg.contains("not registered"));
    assert!(msg.contains("acme::Widget"));
}

#[test]
fn display_null_encoding_points_at_delete() {
    let err = KvError::NullEncoding { key: "slot".into() };
    let msg = format!("{err}");
    assert!(msg.contains("slot"));
    assert!(msg.contains("delete the key"));
}

#[test]
fn display_codec_wraps_serde_error() {
    let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = KvError::from(cause);
    assert!(format!("{err}").contains("codec error"));
}

#[test]
fn display_session_wraps_backend_error() {
    let err = KvError::session(std::io::Error::other("backend down"));
    let msg = format!("{err}");
    assert!(msg.contains("session error"));
    assert!(msg.contains("backend down"));
}
