//! Command table
//!
//! One descriptor per supported command: its wire name and the policy used
//! to cast its reply. Argument shapes are checked by the client before a
//! command is built.

use crate::protocol::{Command, Policy};

/// Static description of one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub policy: Policy,
}

impl CommandSpec {
    const fn new(name: &'static str, policy: Policy) -> Self {
        Self { name, policy }
    }

    /// Start a command carrying this name
    pub fn command(&self) -> Command {
        Command::new(self.name)
    }
}

// =============================================================================
// Strings
// =============================================================================

pub const APPEND: CommandSpec = CommandSpec::new("APPEND", Policy::Integer);
pub const DECR: CommandSpec = CommandSpec::new("DECR", Policy::Integer);
pub const DECRBY: CommandSpec = CommandSpec::new("DECRBY", Policy::Integer);
pub const GET: CommandSpec = CommandSpec::new("GET", Policy::NullableBulk);
pub const GETRANGE: CommandSpec = CommandSpec::new("GETRANGE", Policy::Bulk);
pub const GETSET: CommandSpec = CommandSpec::new("GETSET", Policy::NullableBulk);
pub const INCR: CommandSpec = CommandSpec::new("INCR", Policy::Integer);
pub const INCRBY: CommandSpec = CommandSpec::new("INCRBY", Policy::Integer);
pub const INCRBYFLOAT: CommandSpec = CommandSpec::new("INCRBYFLOAT", Policy::FloatText);
pub const MGET: CommandSpec = CommandSpec::new("MGET", Policy::BulkArray);
pub const MSET: CommandSpec = CommandSpec::new("MSET", Policy::Status);
pub const MSETNX: CommandSpec = CommandSpec::new("MSETNX", Policy::Flag);
pub const PSETEX: CommandSpec = CommandSpec::new("PSETEX", Policy::Status);
pub const SET: CommandSpec = CommandSpec::new("SET", Policy::StatusOrNull);
pub const SETEX: CommandSpec = CommandSpec::new("SETEX", Policy::Status);
pub const SETNX: CommandSpec = CommandSpec::new("SETNX", Policy::Flag);
pub const SETRANGE: CommandSpec = CommandSpec::new("SETRANGE", Policy::Integer);
pub const STRLEN: CommandSpec = CommandSpec::new("STRLEN", Policy::Integer);

// =============================================================================
// Bitmaps
// =============================================================================

pub const BITCOUNT: CommandSpec = CommandSpec::new("BITCOUNT", Policy::Integer);
pub const BITOP: CommandSpec = CommandSpec::new("BITOP", Policy::Integer);
pub const BITPOS: CommandSpec = CommandSpec::new("BITPOS", Policy::Integer);
pub const GETBIT: CommandSpec = CommandSpec::new("GETBIT", Policy::Flag);
pub const SETBIT: CommandSpec = CommandSpec::new("SETBIT", Policy::Flag);

// =============================================================================
// Keyspace
// =============================================================================

pub const DEL: CommandSpec = CommandSpec::new("DEL", Policy::Integer);
pub const EXISTS: CommandSpec = CommandSpec::new("EXISTS", Policy::Integer);
pub const TTL: CommandSpec = CommandSpec::new("TTL", Policy::Integer);
pub const PTTL: CommandSpec = CommandSpec::new("PTTL", Policy::Integer);
pub const FLUSHDB: CommandSpec = CommandSpec::new("FLUSHDB", Policy::Status);
pub const PING: CommandSpec = CommandSpec::new("PING", Policy::Text);
pub const HSET: CommandSpec = CommandSpec::new("HSET", Policy::Integer);

/// Bitwise operation for `BITOP`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    And,
    Or,
    Xor,
    Not,
}

impl BitOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BitOp::And => "AND",
            BitOp::Or => "OR",
            BitOp::Xor => "XOR",
            BitOp::Not => "NOT",
        }
    }
}

impl std::str::FromStr for BitOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Ok(BitOp::And),
            "OR" => Ok(BitOp::Or),
            "XOR" => Ok(BitOp::Xor),
            "NOT" => Ok(BitOp::Not),
            other => Err(format!("unknown bit operation '{}'", other)),
        }
    }
}

/// Existence condition for `SET`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Only set if the key does not exist
    Nx,
    /// Only set if the key already exists
    Xx,
}

/// Relative expiry for `SET`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// `EX seconds`
    Seconds(i64),
    /// `PX milliseconds`
    Millis(i64),
}

/// Options for `SET`
///
/// Built with [`SetOptions::ex`], [`SetOptions::px`], [`SetOptions::nx`] and
/// [`SetOptions::xx`]; setting both forms of one option is rejected when the
/// command is issued, before anything is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub(crate) ex: Option<i64>,
    pub(crate) px: Option<i64>,
    pub(crate) nx: bool,
    pub(crate) xx: bool,
}

impl SetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire after `seconds`
    pub fn ex(mut self, seconds: i64) -> Self {
        self.ex = Some(seconds);
        self
    }

    /// Expire after `millis`
    pub fn px(mut self, millis: i64) -> Self {
        self.px = Some(millis);
        self
    }

    /// Only set if absent
    pub fn nx(mut self) -> Self {
        self.nx = true;
        self
    }

    /// Only set if present
    pub fn xx(mut self) -> Self {
        self.xx = true;
        self
    }

    /// Apply an expiry
    pub fn expiry(self, expiry: Expiry) -> Self {
        match expiry {
            Expiry::Seconds(s) => self.ex(s),
            Expiry::Millis(ms) => self.px(ms),
        }
    }

    /// Apply a condition
    pub fn condition(self, condition: Condition) -> Self {
        match condition {
            Condition::Nx => self.nx(),
            Condition::Xx => self.xx(),
        }
    }
}
