//! Request builders
//!
//! One function per command. Each checks the argument shape locally and
//! returns a [`Request`]: the command to encode plus what is needed to cast
//! its reply. Shape violations fail here, before any byte is written.

use bytes::Bytes;

use crate::commands::{self, BitOp, CommandSpec, SetOptions};
use crate::error::{RedwireError, Result};
use crate::protocol::{cast, cast_keyed, dedup_keys, Command, Policy, Reply, Value};

/// A built command and its casting descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    spec: CommandSpec,
    command: Command,

    /// Request keys in order, for replies cast into a keyed mapping
    keys: Vec<Bytes>,
}

impl Request {
    /// Wrap an already built command
    ///
    /// For keyed replies (`MGET`) every argument is taken as a request key.
    pub fn new(spec: CommandSpec, command: Command) -> Self {
        let keys = match spec.policy {
            Policy::BulkArray => command.args().to_vec(),
            _ => Vec::new(),
        };
        Self {
            spec,
            command,
            keys,
        }
    }

    fn keyed(spec: CommandSpec, command: Command, keys: Vec<Bytes>) -> Self {
        Self {
            spec,
            command,
            keys,
        }
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Cast this request's reply
    pub fn cast(&self, value: Value) -> Result<Reply> {
        match self.spec.policy {
            Policy::BulkArray => cast_keyed(value, &self.keys).map(Reply::Map),
            policy => cast(value, policy),
        }
    }
}

fn invalid(message: &str) -> RedwireError {
    RedwireError::InvalidArgument(message.to_string())
}

fn check_bit(bit: u8) -> Result<()> {
    if bit > 1 {
        return Err(invalid("bit must be 0 or 1"));
    }
    Ok(())
}

fn simple<K: AsRef<[u8]>>(spec: CommandSpec, key: K) -> Request {
    Request::new(spec, spec.command().arg(key.as_ref()))
}

fn key_list<K: AsRef<[u8]>>(spec: CommandSpec, keys: &[K]) -> Result<Request> {
    if keys.is_empty() {
        return Err(invalid(&format!("{} requires at least one key", spec.name)));
    }
    let mut command = spec.command();
    for key in keys {
        command.push_arg(key.as_ref());
    }
    Ok(Request::new(spec, command))
}

fn pair_list<K: AsRef<[u8]>, V: AsRef<[u8]>>(
    spec: CommandSpec,
    pairs: &[(K, V)],
) -> Result<Request> {
    if pairs.is_empty() {
        return Err(invalid(&format!(
            "{} requires at least one key/value pair",
            spec.name
        )));
    }
    let mut command = spec.command();
    for (key, value) in pairs {
        command.push_arg(key.as_ref());
        command.push_arg(value.as_ref());
    }
    Ok(Request::new(spec, command))
}

// =============================================================================
// Strings
// =============================================================================

pub fn append<K: AsRef<[u8]>, V: AsRef<[u8]>>(key: K, value: V) -> Request {
    let spec = commands::APPEND;
    Request::new(spec, spec.command().arg(key.as_ref()).arg(value.as_ref()))
}

pub fn decr<K: AsRef<[u8]>>(key: K) -> Request {
    simple(commands::DECR, key)
}

pub fn decrby<K: AsRef<[u8]>>(key: K, step: i64) -> Request {
    let spec = commands::DECRBY;
    Request::new(spec, spec.command().arg(key.as_ref()).arg(step))
}

pub fn get<K: AsRef<[u8]>>(key: K) -> Request {
    simple(commands::GET, key)
}

pub fn getrange<K: AsRef<[u8]>>(key: K, start: i64, end: i64) -> Request {
    let spec = commands::GETRANGE;
    Request::new(spec, spec.command().arg(key.as_ref()).arg(start).arg(end))
}

pub fn getset<K: AsRef<[u8]>, V: AsRef<[u8]>>(key: K, value: V) -> Request {
    let spec = commands::GETSET;
    Request::new(spec, spec.command().arg(key.as_ref()).arg(value.as_ref()))
}

pub fn incr<K: AsRef<[u8]>>(key: K) -> Request {
    simple(commands::INCR, key)
}

pub fn incrby<K: AsRef<[u8]>>(key: K, step: i64) -> Request {
    let spec = commands::INCRBY;
    Request::new(spec, spec.command().arg(key.as_ref()).arg(step))
}

pub fn incrbyfloat<K: AsRef<[u8]>>(key: K, step: f64) -> Result<Request> {
    if !step.is_finite() {
        return Err(invalid("increment must be a finite number"));
    }
    let spec = commands::INCRBYFLOAT;
    Ok(Request::new(spec, spec.command().arg(key.as_ref()).arg(step)))
}

/// `MGET`; repeated keys are sent once, in first-occurrence order
pub fn mget<K: AsRef<[u8]>>(keys: &[K]) -> Result<Request> {
    let spec = commands::MGET;
    let keys = dedup_keys(keys);
    let request = key_list(spec, &keys)?;
    Ok(Request::keyed(spec, request.command, keys))
}

pub fn mset<K: AsRef<[u8]>, V: AsRef<[u8]>>(pairs: &[(K, V)]) -> Result<Request> {
    pair_list(commands::MSET, pairs)
}

/// `MSETNX`: all pairs are written, or none if any key exists
pub fn msetnx<K: AsRef<[u8]>, V: AsRef<[u8]>>(pairs: &[(K, V)]) -> Result<Request> {
    pair_list(commands::MSETNX, pairs)
}

pub fn psetex<K: AsRef<[u8]>, V: AsRef<[u8]>>(key: K, millis: i64, value: V) -> Request {
    let spec = commands::PSETEX;
    Request::new(
        spec,
        spec.command()
            .arg(key.as_ref())
            .arg(millis)
            .arg(value.as_ref()),
    )
}

pub fn set<K: AsRef<[u8]>, V: AsRef<[u8]>>(key: K, value: V) -> Request {
    let spec = commands::SET;
    Request::new(spec, spec.command().arg(key.as_ref()).arg(value.as_ref()))
}

/// `SET` with expiry and existence options
///
/// At most one of EX/PX and one of NX/XX. Expiry values are sent as given;
/// the server rejects non-positive ones.
pub fn set_with<K: AsRef<[u8]>, V: AsRef<[u8]>>(
    key: K,
    value: V,
    options: &SetOptions,
) -> Result<Request> {
    if options.ex.is_some() && options.px.is_some() {
        return Err(invalid("EX and PX are mutually exclusive"));
    }
    if options.nx && options.xx {
        return Err(invalid("NX and XX are mutually exclusive"));
    }

    let spec = commands::SET;
    let mut command = spec.command().arg(key.as_ref()).arg(value.as_ref());
    if let Some(seconds) = options.ex {
        command = command.arg("EX").arg(seconds);
    }
    if let Some(millis) = options.px {
        command = command.arg("PX").arg(millis);
    }
    if options.nx {
        command = command.arg("NX");
    }
    if options.xx {
        command = command.arg("XX");
    }
    Ok(Request::new(spec, command))
}

pub fn setex<K: AsRef<[u8]>, V: AsRef<[u8]>>(key: K, seconds: i64, value: V) -> Request {
    let spec = commands::SETEX;
    Request::new(
        spec,
        spec.command()
            .arg(key.as_ref())
            .arg(seconds)
            .arg(value.as_ref()),
    )
}

pub fn setnx<K: AsRef<[u8]>, V: AsRef<[u8]>>(key: K, value: V) -> Request {
    let spec = commands::SETNX;
    Request::new(spec, spec.command().arg(key.as_ref()).arg(value.as_ref()))
}

pub fn setrange<K: AsRef<[u8]>, V: AsRef<[u8]>>(key: K, offset: u64, value: V) -> Request {
    let spec = commands::SETRANGE;
    Request::new(
        spec,
        spec.command()
            .arg(key.as_ref())
            .arg(offset)
            .arg(value.as_ref()),
    )
}

pub fn strlen<K: AsRef<[u8]>>(key: K) -> Request {
    simple(commands::STRLEN, key)
}

// =============================================================================
// Bitmaps
// =============================================================================

pub fn bitcount<K: AsRef<[u8]>>(key: K) -> Request {
    simple(commands::BITCOUNT, key)
}

/// `BITCOUNT` over a byte range; negative offsets count from the end
pub fn bitcount_range<K: AsRef<[u8]>>(key: K, start: i64, end: i64) -> Request {
    let spec = commands::BITCOUNT;
    Request::new(spec, spec.command().arg(key.as_ref()).arg(start).arg(end))
}

/// `BITOP`; `NOT` takes exactly one source, the others at least one
pub fn bitop<D: AsRef<[u8]>, K: AsRef<[u8]>>(
    op: BitOp,
    dest: D,
    sources: &[K],
) -> Result<Request> {
    match (op, sources.len()) {
        (_, 0) => return Err(invalid("BITOP requires at least one source key")),
        (BitOp::Not, n) if n != 1 => {
            return Err(invalid("BITOP NOT requires exactly one source key"))
        }
        _ => {}
    }

    let spec = commands::BITOP;
    let mut command = spec.command().arg(op.as_str()).arg(dest.as_ref());
    for source in sources {
        command.push_arg(source.as_ref());
    }
    Ok(Request::new(spec, command))
}

/// `BITPOS key bit [start [end]]`; `end` needs `start`
pub fn bitpos<K: AsRef<[u8]>>(
    key: K,
    bit: u8,
    start: Option<i64>,
    end: Option<i64>,
) -> Result<Request> {
    check_bit(bit)?;

    let spec = commands::BITPOS;
    let mut command = spec.command().arg(key.as_ref()).arg(bit);
    match (start, end) {
        (None, Some(_)) => return Err(invalid("BITPOS end requires a start")),
        (Some(start), Some(end)) => command = command.arg(start).arg(end),
        (Some(start), None) => command = command.arg(start),
        (None, None) => {}
    }
    Ok(Request::new(spec, command))
}

pub fn getbit<K: AsRef<[u8]>>(key: K, offset: u64) -> Request {
    let spec = commands::GETBIT;
    Request::new(spec, spec.command().arg(key.as_ref()).arg(offset))
}

/// `SETBIT`; replies with the bit's previous value
pub fn setbit<K: AsRef<[u8]>>(key: K, offset: u64, bit: u8) -> Result<Request> {
    check_bit(bit)?;
    let spec = commands::SETBIT;
    let command = spec.command().arg(key.as_ref()).arg(offset).arg(bit);
    Ok(Request::new(spec, command))
}

// =============================================================================
// Keyspace
// =============================================================================

pub fn del<K: AsRef<[u8]>>(keys: &[K]) -> Result<Request> {
    key_list(commands::DEL, keys)
}

pub fn exists<K: AsRef<[u8]>>(keys: &[K]) -> Result<Request> {
    key_list(commands::EXISTS, keys)
}

pub fn ttl<K: AsRef<[u8]>>(key: K) -> Request {
    simple(commands::TTL, key)
}

pub fn pttl<K: AsRef<[u8]>>(key: K) -> Request {
    simple(commands::PTTL, key)
}

pub fn flushdb() -> Request {
    let spec = commands::FLUSHDB;
    Request::new(spec, spec.command())
}

pub fn ping() -> Request {
    let spec = commands::PING;
    Request::new(spec, spec.command())
}

pub fn hset<K: AsRef<[u8]>, F: AsRef<[u8]>, V: AsRef<[u8]>>(
    key: K,
    field: F,
    value: V,
) -> Request {
    let spec = commands::HSET;
    Request::new(
        spec,
        spec.command()
            .arg(key.as_ref())
            .arg(field.as_ref())
            .arg(value.as_ref()),
    )
}
