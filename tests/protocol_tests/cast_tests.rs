//! Cast Tests
//!
//! Tests for casting decoded replies under each command policy.

use bytes::Bytes;
use redwire::protocol::{cast, cast_keyed, dedup_keys, KeyedValues, Policy, Reply};
use redwire::{ErrorKind, RedwireError, Value};

fn unexpected(result: redwire::Result<Reply>) {
    match result {
        Err(RedwireError::UnexpectedReply(_)) => {}
        other => panic!("Expected unexpected-reply error, got {:?}", other),
    }
}

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn test_status_ok() {
    assert_eq!(cast(Value::ok(), Policy::Status).unwrap(), Reply::Bool(true));
}

#[test]
fn test_status_other_text_is_unexpected() {
    unexpected(cast(
        Value::SimpleString("QUEUED".to_string()),
        Policy::Status,
    ));
}

#[test]
fn test_status_null_is_unexpected() {
    unexpected(cast(Value::null(), Policy::Status));
}

#[test]
fn test_status_or_null() {
    assert_eq!(
        cast(Value::ok(), Policy::StatusOrNull).unwrap(),
        Reply::Bool(true)
    );
    assert_eq!(
        cast(Value::null(), Policy::StatusOrNull).unwrap(),
        Reply::Bool(false)
    );
    unexpected(cast(Value::Integer(1), Policy::StatusOrNull));
}

// =============================================================================
// Integer Tests
// =============================================================================

#[test]
fn test_integer_passthrough() {
    for n in [-1, 0, 11, i64::MAX, i64::MIN] {
        assert_eq!(
            cast(Value::Integer(n), Policy::Integer).unwrap(),
            Reply::Integer(n)
        );
    }
}

#[test]
fn test_integer_never_defaults() {
    unexpected(cast(Value::null(), Policy::Integer));
    unexpected(cast(Value::bulk("5"), Policy::Integer));
    unexpected(cast(Value::ok(), Policy::Integer));
}

#[test]
fn test_flag_only_zero_or_one() {
    assert_eq!(
        cast(Value::Integer(0), Policy::Flag).unwrap(),
        Reply::Integer(0)
    );
    assert_eq!(
        cast(Value::Integer(1), Policy::Flag).unwrap(),
        Reply::Integer(1)
    );
    unexpected(cast(Value::Integer(2), Policy::Flag));
    unexpected(cast(Value::Integer(-1), Policy::Flag));
}

// =============================================================================
// Bulk Tests
// =============================================================================

#[test]
fn test_nullable_bulk_keeps_null_apart_from_empty() {
    assert_eq!(
        cast(Value::null(), Policy::NullableBulk).unwrap(),
        Reply::Bytes(None)
    );
    assert_eq!(
        cast(Value::bulk(""), Policy::NullableBulk).unwrap(),
        Reply::Bytes(Some(Bytes::new()))
    );
}

#[test]
fn test_nullable_bulk_is_binary_safe() {
    let payload: Vec<u8> = (0..=255u8).collect();
    let reply = cast(Value::bulk(payload.clone()), Policy::NullableBulk).unwrap();
    assert_eq!(reply.into_bytes().unwrap().unwrap(), payload);
}

#[test]
fn test_bulk_rejects_null() {
    unexpected(cast(Value::null(), Policy::Bulk));
    assert_eq!(
        cast(Value::bulk(""), Policy::Bulk).unwrap(),
        Reply::Bytes(Some(Bytes::new()))
    );
}

#[test]
fn test_float_text_is_verbatim() {
    assert_eq!(
        cast(Value::bulk("4.15159265"), Policy::FloatText).unwrap(),
        Reply::Text("4.15159265".to_string())
    );
    assert_eq!(
        cast(Value::bulk("-1"), Policy::FloatText).unwrap(),
        Reply::Text("-1".to_string())
    );
    unexpected(cast(Value::null(), Policy::FloatText));
    unexpected(cast(Value::Integer(1), Policy::FloatText));
}

#[test]
fn test_text() {
    assert_eq!(
        cast(Value::SimpleString("PONG".to_string()), Policy::Text).unwrap(),
        Reply::Text("PONG".to_string())
    );
}

// =============================================================================
// Error Reply Tests
// =============================================================================

#[test]
fn test_error_reply_fails_under_every_policy() {
    for policy in [
        Policy::Status,
        Policy::StatusOrNull,
        Policy::Integer,
        Policy::Flag,
        Policy::NullableBulk,
        Policy::Bulk,
        Policy::FloatText,
        Policy::Text,
        Policy::BulkArray,
    ] {
        let err = cast(
            Value::error("WRONGTYPE Operation against a key holding the wrong kind of value"),
            policy,
        )
        .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::WrongType), "{:?}", policy);
    }
}

// =============================================================================
// Multi-Key Tests
// =============================================================================

#[test]
fn test_bulk_array_values() {
    let value = Value::Array(Some(vec![Value::bulk("a"), Value::null(), Value::bulk("")]));
    assert_eq!(
        cast(value, Policy::BulkArray).unwrap(),
        Reply::Values(vec![
            Some(Bytes::from_static(b"a")),
            None,
            Some(Bytes::new())
        ])
    );
}

#[test]
fn test_bulk_array_rejects_null_array_and_odd_items() {
    unexpected(cast(Value::Array(None), Policy::BulkArray));
    unexpected(cast(
        Value::Array(Some(vec![Value::Integer(1)])),
        Policy::BulkArray,
    ));
}

#[test]
fn test_dedup_keys_first_occurrence() {
    let keys = dedup_keys(&["key", "string", "integer", "", "integer", "hash"]);
    let expected: Vec<Bytes> = ["key", "string", "integer", "", "hash"]
        .iter()
        .map(|k| Bytes::copy_from_slice(k.as_bytes()))
        .collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_cast_keyed_in_request_order() {
    let keys = dedup_keys(&["b", "a", "c"]);
    let value = Value::Array(Some(vec![Value::bulk("2"), Value::null(), Value::bulk("3")]));

    let map = cast_keyed(value, &keys).unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(
        map.keys().map(|k| &k[..]).collect::<Vec<_>>(),
        vec![&b"b"[..], &b"a"[..], &b"c"[..]]
    );
    assert_eq!(map.get("b"), Some(Some(&Bytes::from_static(b"2"))));
    assert_eq!(map.get("a"), Some(None));
    assert_eq!(map.get("missing"), None);
}

#[test]
fn test_cast_keyed_length_mismatch() {
    let keys = dedup_keys(&["a", "b"]);
    let value = Value::Array(Some(vec![Value::bulk("1")]));
    assert!(matches!(
        cast_keyed(value, &keys),
        Err(RedwireError::UnexpectedReply(_))
    ));
}

#[test]
fn test_zip_collapses_repeated_keys() {
    let keys: Vec<Bytes> = ["a", "b", "a"]
        .iter()
        .map(|k| Bytes::copy_from_slice(k.as_bytes()))
        .collect();
    let values = vec![Some(Bytes::from_static(b"1")), None, Some(Bytes::from_static(b"1"))];

    let map = KeyedValues::zip(&keys, values).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(
        map.keys().map(|k| &k[..]).collect::<Vec<_>>(),
        vec![&b"a"[..], &b"b"[..]]
    );
}

#[test]
fn test_keyed_values_iteration() {
    let keys = dedup_keys(&["x", "y"]);
    let map = KeyedValues::zip(&keys, vec![None, Some(Bytes::from_static(b"v"))]).unwrap();

    let borrowed: Vec<_> = map.iter().map(|(k, v)| (k.clone(), v.cloned())).collect();
    let owned: Vec<_> = map.into_iter().collect();
    assert_eq!(borrowed, owned);
}

// =============================================================================
// Reply Accessor Tests
// =============================================================================

#[test]
fn test_reply_accessor_mismatch() {
    assert!(matches!(
        Reply::Integer(1).into_bool(),
        Err(RedwireError::UnexpectedReply(_))
    ));
    assert!(Reply::Bool(true).into_integer().is_err());
    assert!(Reply::Text("x".to_string()).into_bytes().is_err());
    assert!(Reply::Bytes(None).into_text().is_err());
    assert!(Reply::Values(vec![]).into_map().is_err());
    assert!(Reply::Map(KeyedValues::default()).into_values().is_err());
}
