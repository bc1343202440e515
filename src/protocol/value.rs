//! Reply value definitions
//!
//! Represents one decoded RESP reply.

use bytes::{BufMut, Bytes, BytesMut};

/// A decoded reply
///
/// Bulk strings and arrays keep "present but empty" (`Some` of an empty
/// payload) apart from "absent" (`None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Status reply: `+OK\r\n`
    SimpleString(String),

    /// Error reply: `-ERR message\r\n`
    Error(String),

    /// Integer reply: `:1000\r\n`
    Integer(i64),

    /// Bulk string: `$5\r\nhello\r\n`, or `$-1\r\n` for null
    BulkString(Option<Bytes>),

    /// Array: `*2\r\n...`, or `*-1\r\n` for null
    Array(Option<Vec<Value>>),
}

impl Value {
    /// Create an OK status reply
    pub fn ok() -> Self {
        Value::SimpleString("OK".to_string())
    }

    /// Create an error reply
    pub fn error(message: impl Into<String>) -> Self {
        Value::Error(message.into())
    }

    /// Create a bulk string reply
    pub fn bulk(data: impl Into<Bytes>) -> Self {
        Value::BulkString(Some(data.into()))
    }

    /// Create a null bulk string reply
    pub fn null() -> Self {
        Value::BulkString(None)
    }

    /// Short tag name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::SimpleString(_) => "simple-string",
            Value::Error(_) => "error",
            Value::Integer(_) => "integer",
            Value::BulkString(Some(_)) => "bulk-string",
            Value::BulkString(None) => "null-bulk-string",
            Value::Array(Some(_)) => "array",
            Value::Array(None) => "null-array",
        }
    }

    /// Encode to reply wire form
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf);
        buf
    }

    /// Encode into an existing buffer
    pub fn encode_into(&self, buf: &mut BytesMut) {
        match self {
            Value::SimpleString(s) => put_line(buf, b'+', s.as_bytes()),
            Value::Error(s) => put_line(buf, b'-', s.as_bytes()),
            Value::Integer(n) => put_line(buf, b':', n.to_string().as_bytes()),
            Value::BulkString(None) => buf.put_slice(b"$-1\r\n"),
            Value::BulkString(Some(data)) => {
                put_line(buf, b'$', data.len().to_string().as_bytes());
                buf.put_slice(data);
                buf.put_slice(b"\r\n");
            }
            Value::Array(None) => buf.put_slice(b"*-1\r\n"),
            Value::Array(Some(items)) => {
                put_line(buf, b'*', items.len().to_string().as_bytes());
                for item in items {
                    item.encode_into(buf);
                }
            }
        }
    }
}

fn put_line(buf: &mut BytesMut, tag: u8, body: &[u8]) {
    buf.put_u8(tag);
    buf.put_slice(body);
    buf.put_slice(b"\r\n");
}
