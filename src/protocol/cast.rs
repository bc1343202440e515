//! Reply casting
//!
//! Converts a decoded [`Value`] into the typed result a command promises.
//! Every policy matches the reply tag exhaustively; a tag the policy does
//! not accept is an [`RedwireError::UnexpectedReply`], never a default value.

use std::collections::HashSet;

use bytes::Bytes;

use super::{classify, Value};
use crate::error::{RedwireError, Result};

/// How a command's reply is cast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// `+OK` is `true`
    Status,

    /// `+OK` is `true`, a null bulk string (unmet condition) is `false`
    StatusOrNull,

    /// Integer passthrough
    Integer,

    /// Integer restricted to 0 or 1
    Flag,

    /// Bulk string or null
    NullableBulk,

    /// Bulk string, never null
    Bulk,

    /// Decimal number carried as a bulk string, returned verbatim
    FloatText,

    /// Status text (`+PONG`)
    Text,

    /// Array of nullable bulk strings, parallel to the request keys
    BulkArray,
}

/// Typed result of a cast
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Bool(bool),
    Integer(i64),
    Bytes(Option<Bytes>),
    Text(String),
    Values(Vec<Option<Bytes>>),
    Map(KeyedValues),
}

impl Reply {
    pub fn into_bool(self) -> Result<bool> {
        match self {
            Reply::Bool(b) => Ok(b),
            other => Err(mismatch("boolean", &other)),
        }
    }

    pub fn into_integer(self) -> Result<i64> {
        match self {
            Reply::Integer(n) => Ok(n),
            other => Err(mismatch("integer", &other)),
        }
    }

    pub fn into_bytes(self) -> Result<Option<Bytes>> {
        match self {
            Reply::Bytes(b) => Ok(b),
            other => Err(mismatch("bytes", &other)),
        }
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            Reply::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }

    pub fn into_values(self) -> Result<Vec<Option<Bytes>>> {
        match self {
            Reply::Values(v) => Ok(v),
            other => Err(mismatch("values", &other)),
        }
    }

    pub fn into_map(self) -> Result<KeyedValues> {
        match self {
            Reply::Map(m) => Ok(m),
            other => Err(mismatch("keyed values", &other)),
        }
    }
}

fn mismatch(expected: &str, got: &Reply) -> RedwireError {
    RedwireError::UnexpectedReply(format!("expected {} result, got {:?}", expected, got))
}

fn unexpected(policy: Policy, value: &Value) -> RedwireError {
    RedwireError::UnexpectedReply(format!(
        "{:?} reply cannot be cast as {:?}",
        value.type_name(),
        policy
    ))
}

/// Cast a reply under a policy
///
/// An error reply is classified and returned as the error.
pub fn cast(value: Value, policy: Policy) -> Result<Reply> {
    if let Value::Error(message) = value {
        return Err(classify::into_error(message));
    }

    match (policy, value) {
        (Policy::Status | Policy::StatusOrNull, Value::SimpleString(s)) if s == "OK" => {
            Ok(Reply::Bool(true))
        }
        (Policy::StatusOrNull, Value::BulkString(None)) => Ok(Reply::Bool(false)),

        (Policy::Integer, Value::Integer(n)) => Ok(Reply::Integer(n)),
        (Policy::Flag, Value::Integer(n @ (0 | 1))) => Ok(Reply::Integer(n)),

        (Policy::NullableBulk, Value::BulkString(data)) => Ok(Reply::Bytes(data)),
        (Policy::Bulk, Value::BulkString(Some(data))) => Ok(Reply::Bytes(Some(data))),

        (Policy::FloatText, Value::BulkString(Some(data))) => String::from_utf8(data.to_vec())
            .map(Reply::Text)
            .map_err(|_| RedwireError::UnexpectedReply("float reply is not text".to_string())),

        (Policy::Text, Value::SimpleString(s)) => Ok(Reply::Text(s)),

        (Policy::BulkArray, Value::Array(Some(items))) => items
            .into_iter()
            .map(|item| match item {
                Value::BulkString(data) => Ok(data),
                Value::Error(message) => Err(classify::into_error(message)),
                other => Err(unexpected(policy, &other)),
            })
            .collect::<Result<Vec<_>>>()
            .map(Reply::Values),

        (policy, value) => Err(unexpected(policy, &value)),
    }
}

/// Remove repeated keys, keeping the first occurrence of each
pub fn dedup_keys<K: AsRef<[u8]>>(keys: &[K]) -> Vec<Bytes> {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.iter()
        .map(|k| k.as_ref())
        .filter(|k| seen.insert(*k))
        .map(Bytes::copy_from_slice)
        .collect()
}

/// Cast a multi-key reply into a mapping in request order
pub fn cast_keyed(value: Value, keys: &[Bytes]) -> Result<KeyedValues> {
    let values = cast(value, Policy::BulkArray)?.into_values()?;
    KeyedValues::zip(keys, values)
}

/// Key to nullable value mapping, in the caller's request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedValues {
    entries: Vec<(Bytes, Option<Bytes>)>,
}

impl KeyedValues {
    /// Pair each key with the value at the same position; a repeated key
    /// keeps its first value
    pub fn zip(keys: &[Bytes], values: Vec<Option<Bytes>>) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(RedwireError::UnexpectedReply(format!(
                "{} values for {} keys",
                values.len(),
                keys.len()
            )));
        }

        let mut seen = HashSet::with_capacity(keys.len());
        let entries = keys
            .iter()
            .zip(values)
            .filter(|(key, _)| seen.insert(*key))
            .map(|(key, value)| (key.clone(), value))
            .collect();
        Ok(Self { entries })
    }

    /// Value for a key; `None` when the key was not requested,
    /// `Some(None)` when it was requested and holds no string value
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<Option<&Bytes>> {
        let key = key.as_ref();
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }

    /// Keys in request order
    pub fn keys(&self) -> impl Iterator<Item = &Bytes> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, Option<&Bytes>)> {
        self.entries.iter().map(|(k, v)| (k, v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for KeyedValues {
    type Item = (Bytes, Option<Bytes>);
    type IntoIter = std::vec::IntoIter<(Bytes, Option<Bytes>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
