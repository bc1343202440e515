//! Client Module
//!
//! Typed command operations over one [`Connection`].
//!
//! ## Round Trip
//! ```text
//! validate args ──► encode ──► send ──► decode one reply
//!                                            │
//!                      ┌─────────────────────┴──────────────┐
//!                      ▼                                    ▼
//!              error reply: classify               cast by command policy
//! ```
//!
//! A client holds no shared state: open one per connection and run as many
//! connections in parallel as needed.

mod pipeline;
pub mod request;

use std::io::{Read, Write};
use std::net::TcpStream;

use bytes::Bytes;

use crate::commands::{BitOp, SetOptions};
use crate::config::Config;
use crate::error::Result;
use crate::network::{self, Connection};
use crate::protocol::{classify, Command, KeyedValues, Reply, Value};

pub use pipeline::Pipeline;
pub use request::Request;

/// Command dispatcher bound to one connection
pub struct Client<S> {
    connection: Connection<S>,
}

impl Client<TcpStream> {
    /// Open a TCP connection to `config.server_addr`
    pub fn connect(config: &Config) -> Result<Self> {
        Ok(Self::new(network::connect(config)?))
    }
}

impl<S: Read + Write> Client<S> {
    /// Wrap an open connection
    pub fn new(connection: Connection<S>) -> Self {
        Self { connection }
    }

    /// Wrap a raw stream with default codec limits
    pub fn from_stream(stream: S) -> Self {
        Self::new(Connection::new(stream))
    }

    pub fn connection(&self) -> &Connection<S> {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut Connection<S> {
        &mut self.connection
    }

    pub fn into_connection(self) -> Connection<S> {
        self.connection
    }

    /// True once the connection must be discarded
    pub fn is_broken(&self) -> bool {
        self.connection.is_broken()
    }

    /// Send any command and return its raw reply
    ///
    /// Error replies are still classified and returned as errors.
    pub fn call(&mut self, command: &Command) -> Result<Value> {
        match self.connection.round_trip(command)? {
            Value::Error(message) => Err(classify::into_error(message)),
            value => Ok(value),
        }
    }

    /// Run one request and cast its reply
    pub fn execute(&mut self, request: &Request) -> Result<Reply> {
        let value = self.connection.round_trip(request.command())?;
        request.cast(value)
    }

    /// Run a pipeline; one result per queued request, in order
    pub fn execute_pipeline(&mut self, pipeline: &Pipeline) -> Result<Vec<Result<Reply>>> {
        pipeline.run(&mut self.connection)
    }

    // =========================================================================
    // Strings
    // =========================================================================

    /// Append to a value; returns the length after appending
    pub fn append<K: AsRef<[u8]>, V: AsRef<[u8]>>(&mut self, key: K, value: V) -> Result<i64> {
        self.execute(&request::append(key, value))?.into_integer()
    }

    pub fn decr<K: AsRef<[u8]>>(&mut self, key: K) -> Result<i64> {
        self.execute(&request::decr(key))?.into_integer()
    }

    pub fn decrby<K: AsRef<[u8]>>(&mut self, key: K, step: i64) -> Result<i64> {
        self.execute(&request::decrby(key, step))?.into_integer()
    }

    pub fn get<K: AsRef<[u8]>>(&mut self, key: K) -> Result<Option<Bytes>> {
        self.execute(&request::get(key))?.into_bytes()
    }

    /// Substring by byte offsets, both inclusive; negative offsets count
    /// from the end. An empty range is an empty result.
    pub fn getrange<K: AsRef<[u8]>>(&mut self, key: K, start: i64, end: i64) -> Result<Bytes> {
        Ok(self
            .execute(&request::getrange(key, start, end))?
            .into_bytes()?
            .unwrap_or_default())
    }

    pub fn getset<K: AsRef<[u8]>, V: AsRef<[u8]>>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<Option<Bytes>> {
        self.execute(&request::getset(key, value))?.into_bytes()
    }

    pub fn incr<K: AsRef<[u8]>>(&mut self, key: K) -> Result<i64> {
        self.execute(&request::incr(key))?.into_integer()
    }

    pub fn incrby<K: AsRef<[u8]>>(&mut self, key: K, step: i64) -> Result<i64> {
        self.execute(&request::incrby(key, step))?.into_integer()
    }

    /// Returns the new value as the server formatted it
    pub fn incrbyfloat<K: AsRef<[u8]>>(&mut self, key: K, step: f64) -> Result<String> {
        self.execute(&request::incrbyfloat(key, step)?)?.into_text()
    }

    /// Values of several keys, keyed in first-occurrence request order
    pub fn mget<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> Result<KeyedValues> {
        self.execute(&request::mget(keys)?)?.into_map()
    }

    pub fn mset<K: AsRef<[u8]>, V: AsRef<[u8]>>(&mut self, pairs: &[(K, V)]) -> Result<bool> {
        self.execute(&request::mset(pairs)?)?.into_bool()
    }

    /// 1 if every pair was written, 0 if none was
    pub fn msetnx<K: AsRef<[u8]>, V: AsRef<[u8]>>(&mut self, pairs: &[(K, V)]) -> Result<i64> {
        self.execute(&request::msetnx(pairs)?)?.into_integer()
    }

    pub fn psetex<K: AsRef<[u8]>, V: AsRef<[u8]>>(
        &mut self,
        key: K,
        millis: i64,
        value: V,
    ) -> Result<bool> {
        self.execute(&request::psetex(key, millis, value))?.into_bool()
    }

    pub fn set<K: AsRef<[u8]>, V: AsRef<[u8]>>(&mut self, key: K, value: V) -> Result<bool> {
        self.execute(&request::set(key, value))?.into_bool()
    }

    /// `false` when an NX/XX condition was not met
    pub fn set_with<K: AsRef<[u8]>, V: AsRef<[u8]>>(
        &mut self,
        key: K,
        value: V,
        options: &SetOptions,
    ) -> Result<bool> {
        self.execute(&request::set_with(key, value, options)?)?.into_bool()
    }

    pub fn setex<K: AsRef<[u8]>, V: AsRef<[u8]>>(
        &mut self,
        key: K,
        seconds: i64,
        value: V,
    ) -> Result<bool> {
        self.execute(&request::setex(key, seconds, value))?.into_bool()
    }

    pub fn setnx<K: AsRef<[u8]>, V: AsRef<[u8]>>(&mut self, key: K, value: V) -> Result<i64> {
        self.execute(&request::setnx(key, value))?.into_integer()
    }

    /// Overwrite from `offset`, zero-padding any gap; returns the new length
    pub fn setrange<K: AsRef<[u8]>, V: AsRef<[u8]>>(
        &mut self,
        key: K,
        offset: u64,
        value: V,
    ) -> Result<i64> {
        self.execute(&request::setrange(key, offset, value))?.into_integer()
    }

    pub fn strlen<K: AsRef<[u8]>>(&mut self, key: K) -> Result<i64> {
        self.execute(&request::strlen(key))?.into_integer()
    }

    // =========================================================================
    // Bitmaps
    // =========================================================================

    pub fn bitcount<K: AsRef<[u8]>>(&mut self, key: K) -> Result<i64> {
        self.execute(&request::bitcount(key))?.into_integer()
    }

    pub fn bitcount_range<K: AsRef<[u8]>>(&mut self, key: K, start: i64, end: i64) -> Result<i64> {
        self.execute(&request::bitcount_range(key, start, end))?.into_integer()
    }

    /// Returns the length of the destination value
    pub fn bitop<D: AsRef<[u8]>, K: AsRef<[u8]>>(
        &mut self,
        op: BitOp,
        dest: D,
        sources: &[K],
    ) -> Result<i64> {
        self.execute(&request::bitop(op, dest, sources)?)?.into_integer()
    }

    /// First bit equal to `bit`, or -1
    pub fn bitpos<K: AsRef<[u8]>>(
        &mut self,
        key: K,
        bit: u8,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<i64> {
        self.execute(&request::bitpos(key, bit, start, end)?)?.into_integer()
    }

    pub fn getbit<K: AsRef<[u8]>>(&mut self, key: K, offset: u64) -> Result<i64> {
        self.execute(&request::getbit(key, offset))?.into_integer()
    }

    /// Returns the previous value of the bit
    pub fn setbit<K: AsRef<[u8]>>(&mut self, key: K, offset: u64, bit: u8) -> Result<i64> {
        self.execute(&request::setbit(key, offset, bit)?)?.into_integer()
    }

    // =========================================================================
    // Keyspace
    // =========================================================================

    pub fn del<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> Result<i64> {
        self.execute(&request::del(keys)?)?.into_integer()
    }

    pub fn exists<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> Result<i64> {
        self.execute(&request::exists(keys)?)?.into_integer()
    }

    pub fn ttl<K: AsRef<[u8]>>(&mut self, key: K) -> Result<i64> {
        self.execute(&request::ttl(key))?.into_integer()
    }

    pub fn pttl<K: AsRef<[u8]>>(&mut self, key: K) -> Result<i64> {
        self.execute(&request::pttl(key))?.into_integer()
    }

    pub fn flushdb(&mut self) -> Result<bool> {
        self.execute(&request::flushdb())?.into_bool()
    }

    pub fn ping(&mut self) -> Result<String> {
        self.execute(&request::ping())?.into_text()
    }

    pub fn hset<K: AsRef<[u8]>, F: AsRef<[u8]>, V: AsRef<[u8]>>(
        &mut self,
        key: K,
        field: F,
        value: V,
    ) -> Result<i64> {
        self.execute(&request::hset(key, field, value))?.into_integer()
    }
}
