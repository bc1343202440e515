//! Protocol codec
//!
//! Encoding of requests and streaming decoding of replies.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<arg bytes>\r\n      (repeated argc times)
//! ```
//!
//! ### Reply
//! ```text
//! ┌─────────┬────────────────────┬──────────────────────────────┐
//! │ Tag (1) │ Header ... \r\n    │ Payload (bulk only) \r\n     │
//! └─────────┴────────────────────┴──────────────────────────────┘
//! ```
//! Tags: `+` status, `-` error, `:` integer, `$` bulk string, `*` array.
//!
//! The [`Decoder`] consumes complete elements from the front of the read
//! buffer as soon as they are available and keeps an explicit stack of
//! partially filled arrays, so a reply split over many reads is never
//! re-scanned from its start and nesting depth is bounded without recursion.

use std::io::{ErrorKind as IoErrorKind, Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use super::{Command, Value};
use crate::config::Config;
use crate::error::{RedwireError, Result};

/// Line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Longest header line accepted for `:`, `$` and `*` (sign + 19 digits)
const MAX_NUMERIC_LINE: usize = 20;

/// Cap on preallocated array capacity, whatever the declared length
const MAX_PREALLOC_ITEMS: usize = 1024;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a command to its multi-bulk request form
pub fn encode_command(command: &Command) -> BytesMut {
    let size = command.args().iter().map(|a| a.len() + 16).sum::<usize>() + 16;
    let mut buf = BytesMut::with_capacity(size);
    encode_command_into(command, &mut buf);
    buf
}

/// Encode a command into an existing buffer (used for pipelines)
pub fn encode_command_into(command: &Command, buf: &mut BytesMut) {
    let args = command.args();

    buf.put_u8(b'*');
    buf.put_slice(args.len().to_string().as_bytes());
    buf.put_slice(CRLF);

    for arg in args {
        buf.put_u8(b'$');
        buf.put_slice(arg.len().to_string().as_bytes());
        buf.put_slice(CRLF);
        buf.put_slice(arg);
        buf.put_slice(CRLF);
    }
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// An array whose header has been read but not all of its elements
#[derive(Debug)]
struct PendingArray {
    remaining: usize,
    items: Vec<Value>,
}

/// Incremental reply decoder
///
/// Holds the partial state of at most one reply. Feed it the connection's
/// read buffer after every read; bytes of a completed reply are removed
/// from the buffer, anything after it stays for the next call.
#[derive(Debug)]
pub struct Decoder {
    max_depth: usize,
    max_bulk_len: usize,

    /// Open arrays, innermost last
    stack: Vec<PendingArray>,

    /// Declared length of a bulk string whose header is consumed
    pending_bulk: Option<usize>,

    /// Bytes of the current line already searched for CRLF
    scanned: usize,
}

impl Decoder {
    /// Create a decoder with explicit limits
    pub fn new(max_depth: usize, max_bulk_len: usize) -> Self {
        Self {
            max_depth,
            max_bulk_len,
            stack: Vec::new(),
            pending_bulk: None,
            scanned: 0,
        }
    }

    /// Create a decoder using the codec limits of a config
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_depth, config.max_bulk_len)
    }

    /// True when no reply is partially decoded
    pub fn is_idle(&self) -> bool {
        self.stack.is_empty() && self.pending_bulk.is_none() && self.scanned == 0
    }

    /// Drop any partial state
    pub fn reset(&mut self) {
        self.stack.clear();
        self.pending_bulk = None;
        self.scanned = 0;
    }

    /// Decode one reply from the front of `buf`
    ///
    /// Returns `Ok(None)` when more bytes are needed. Partial progress is
    /// kept, so the next call resumes where this one stopped.
    pub fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Value>> {
        loop {
            let value = match self.pending_bulk {
                Some(len) => match self.take_bulk_payload(buf, len)? {
                    Some(value) => value,
                    None => return Ok(None),
                },
                None => match self.take_line_value(buf)? {
                    Some(Step::Value(value)) => value,
                    Some(Step::Opened) => continue,
                    None => return Ok(None),
                },
            };

            if let Some(reply) = self.complete(value) {
                return Ok(Some(reply));
            }
        }
    }

    /// Consume the payload of a bulk string once all of it has arrived
    fn take_bulk_payload(&mut self, buf: &mut BytesMut, len: usize) -> Result<Option<Value>> {
        if buf.len() < len + CRLF.len() {
            return Ok(None);
        }
        if &buf[len..len + CRLF.len()] != CRLF {
            return Err(protocol_error("bulk string missing trailing CRLF"));
        }

        let data = buf.split_to(len).freeze();
        buf.advance(CRLF.len());
        self.pending_bulk = None;

        Ok(Some(Value::BulkString(Some(data))))
    }

    /// Consume one header line; yields a scalar, or opens a bulk/array
    fn take_line_value(&mut self, buf: &mut BytesMut) -> Result<Option<Step>> {
        let Some(&tag) = buf.first() else {
            return Ok(None);
        };
        if !matches!(tag, b'+' | b'-' | b':' | b'$' | b'*') {
            return Err(protocol_error(&format!(
                "unknown reply type byte 0x{:02x}",
                tag
            )));
        }

        let Some(line_end) = self.find_line_end(buf) else {
            // tag + digits + a possible trailing '\r'
            if tag != b'+' && tag != b'-' && buf.len() > MAX_NUMERIC_LINE + 2 {
                return Err(protocol_error("malformed length header"));
            }
            if buf.len() > self.max_bulk_len {
                return Err(protocol_error("status line too long"));
            }
            return Ok(None);
        };

        let line = buf.split_to(line_end + CRLF.len());
        self.scanned = 0;
        let body = &line[1..line_end];

        let step = match tag {
            b'+' => Step::Value(Value::SimpleString(
                String::from_utf8_lossy(body).into_owned(),
            )),
            b'-' => Step::Value(Value::Error(String::from_utf8_lossy(body).into_owned())),
            b':' => Step::Value(Value::Integer(parse_integer(body)?)),
            b'$' => match self.parse_length(body)? {
                None => Step::Value(Value::BulkString(None)),
                Some(len) if len > self.max_bulk_len => {
                    return Err(protocol_error(&format!(
                        "bulk string length {} exceeds limit {}",
                        len, self.max_bulk_len
                    )));
                }
                Some(len) => {
                    self.pending_bulk = Some(len);
                    Step::Opened
                }
            },
            _ => match self.parse_length(body)? {
                None => Step::Value(Value::Array(None)),
                Some(0) => Step::Value(Value::Array(Some(Vec::new()))),
                Some(len) => {
                    if self.stack.len() >= self.max_depth {
                        return Err(protocol_error(&format!(
                            "array nesting exceeds depth limit {}",
                            self.max_depth
                        )));
                    }
                    self.stack.push(PendingArray {
                        remaining: len,
                        items: Vec::with_capacity(len.min(MAX_PREALLOC_ITEMS)),
                    });
                    Step::Opened
                }
            },
        };

        Ok(Some(step))
    }

    /// Find the `\r` of the first CRLF, resuming the previous scan
    fn find_line_end(&mut self, buf: &BytesMut) -> Option<usize> {
        let start = self.scanned.min(buf.len());
        match buf[start..].windows(2).position(|w| w == CRLF) {
            Some(pos) => Some(start + pos),
            None => {
                // A trailing '\r' may still be followed by '\n'
                self.scanned = buf.len().saturating_sub(1);
                None
            }
        }
    }

    /// `-1` is null; any other negative length is malformed
    fn parse_length(&self, body: &[u8]) -> Result<Option<usize>> {
        match parse_integer(body)? {
            -1 => Ok(None),
            n if n < 0 => Err(protocol_error(&format!("invalid length {}", n))),
            n => usize::try_from(n)
                .map(Some)
                .map_err(|_| protocol_error(&format!("length {} out of range", n))),
        }
    }

    /// Attach a finished value to the open arrays; returns the whole reply
    /// once the outermost array is full
    fn complete(&mut self, mut value: Value) -> Option<Value> {
        while let Some(top) = self.stack.last_mut() {
            top.items.push(value);
            top.remaining -= 1;
            if top.remaining > 0 {
                return None;
            }
            let items = std::mem::take(&mut top.items);
            self.stack.pop();
            value = Value::Array(Some(items));
        }
        Some(value)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Outcome of consuming one header line
enum Step {
    Value(Value),
    Opened,
}

/// Strict integer grammar: optional `-`, then one or more ASCII digits
fn parse_integer(body: &[u8]) -> Result<i64> {
    let digits = body.strip_prefix(b"-").unwrap_or(body);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(protocol_error(&format!(
            "invalid integer header {:?}",
            String::from_utf8_lossy(body)
        )));
    }

    std::str::from_utf8(body)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            protocol_error(&format!(
                "integer header out of range {:?}",
                String::from_utf8_lossy(body)
            ))
        })
}

fn protocol_error(message: &str) -> RedwireError {
    RedwireError::Protocol(message.to_string())
}

/// Decode one complete reply from a byte slice
///
/// Returns the value and number of bytes consumed, or `None` when the slice
/// holds only part of a reply.
pub fn decode_value(bytes: &[u8]) -> Result<Option<(Value, usize)>> {
    let mut buf = BytesMut::from(bytes);
    let mut decoder = Decoder::default();

    Ok(decoder
        .decode(&mut buf)?
        .map(|value| (value, bytes.len() - buf.len())))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read one complete reply from a stream
///
/// Uses `buf` for bytes already received; reads `chunk` bytes at a time
/// until the decoder yields a reply. Leftover bytes stay in `buf`.
pub fn read_value<R: Read>(
    reader: &mut R,
    decoder: &mut Decoder,
    buf: &mut BytesMut,
    chunk: usize,
) -> Result<Value> {
    loop {
        if let Some(value) = decoder.decode(buf)? {
            return Ok(value);
        }

        let start = buf.len();
        buf.resize(start + chunk, 0);
        let read = match reader.read(&mut buf[start..]) {
            Ok(n) => n,
            Err(e) if e.kind() == IoErrorKind::Interrupted => {
                buf.truncate(start);
                continue;
            }
            Err(e) => {
                buf.truncate(start);
                return Err(e.into());
            }
        };
        buf.truncate(start + read);

        if read == 0 {
            return Err(RedwireError::Io(std::io::Error::new(
                IoErrorKind::UnexpectedEof,
                "connection closed before a complete reply",
            )));
        }
    }
}
