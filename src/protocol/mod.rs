//! Protocol Module
//!
//! RESP wire format: request encoding, reply decoding, error
//! classification and reply casting.
//!
//! ## Request Format
//! ```text
//! ┌──────────────┬──────────────────────────────────────────┐
//! │ *<argc>\r\n  │ $<len>\r\n<bytes>\r\n  (one per argument) │
//! └──────────────┴──────────────────────────────────────────┘
//! ```
//!
//! ## Reply Types
//! - `+` simple string (status)
//! - `-` error, first token is the error code
//! - `:` signed 64-bit integer
//! - `$` bulk string, `$-1` is null
//! - `*` array, `*-1` is null

mod value;
mod command;
mod codec;
pub mod classify;
pub mod cast;

pub use value::Value;
pub use command::{Command, ToArg};
pub use codec::{
    decode_value, encode_command, encode_command_into, read_value, write_command, Decoder, CRLF,
};
pub use classify::classify;
pub use cast::{cast, cast_keyed, dedup_keys, KeyedValues, Policy, Reply};
