//! Connection
//!
//! Wraps a byte stream supplied by the transport (a `TcpStream`, or any
//! `Read + Write` value) with a read buffer and a streaming decoder.

use std::io::{Read, Write};

use bytes::BytesMut;

use crate::config::Config;
use crate::error::{RedwireError, Result};
use crate::protocol::{encode_command, read_value, Command, Decoder, Value};

/// One request/reply stream
///
/// Requests and replies are strictly ordered: the Nth reply read answers
/// the Nth request written. After an I/O or protocol failure the framing
/// position is lost, so the connection is marked broken and every later
/// call fails with [`RedwireError::ConnectionBroken`].
pub struct Connection<S> {
    /// Underlying byte stream
    stream: S,

    /// Received bytes not yet decoded
    buffer: BytesMut,

    /// Partial state of the reply being decoded
    decoder: Decoder,

    /// Bytes requested per read
    read_chunk: usize,

    /// Set once framing can no longer be trusted
    broken: bool,

    /// Peer description for logging
    peer: String,
}

impl<S: Read + Write> Connection<S> {
    /// Create a connection with default codec limits
    pub fn new(stream: S) -> Self {
        Self::build(stream, &Config::default())
    }

    /// Create a connection using the codec limits of `config`
    ///
    /// Fails with [`RedwireError::Config`] when the limits are unusable
    /// (zero nesting depth or a zero-sized read buffer).
    pub fn with_config(stream: S, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(stream, config))
    }

    fn build(stream: S, config: &Config) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(config.read_buffer_size),
            decoder: Decoder::from_config(config),
            read_chunk: config.read_buffer_size,
            broken: false,
            peer: "stream".to_string(),
        }
    }

    /// Set the peer description used in log lines
    pub fn with_peer(mut self, peer: impl Into<String>) -> Self {
        self.peer = peer.into();
        self
    }

    /// Write raw request bytes
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_usable()?;
        let result = self
            .stream
            .write_all(bytes)
            .and_then(|_| self.stream.flush())
            .map_err(RedwireError::from);
        self.poison_on_fatal(result)
    }

    /// Read exactly one reply
    pub fn read_reply(&mut self) -> Result<Value> {
        self.ensure_usable()?;
        let result = read_value(
            &mut self.stream,
            &mut self.decoder,
            &mut self.buffer,
            self.read_chunk,
        );
        self.poison_on_fatal(result)
    }

    /// Send one command and read its reply
    pub fn round_trip(&mut self, command: &Command) -> Result<Value> {
        tracing::trace!(
            "{} <- {} ({} args)",
            self.peer,
            String::from_utf8_lossy(command.name()),
            command.arg_count()
        );
        self.send(&encode_command(command))?;
        let value = self.read_reply()?;
        tracing::trace!("{} -> {}", self.peer, value.type_name());
        Ok(value)
    }

    /// True once the connection must be discarded
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Mark the connection unusable (e.g. a caller abandoned a pipeline
    /// before reading all of its replies)
    pub fn mark_broken(&mut self) {
        if !self.broken {
            tracing::debug!("Connection {} marked broken", self.peer);
        }
        self.broken = true;
        self.decoder.reset();
        self.buffer.clear();
    }

    /// Bytes received but not yet consumed by a reply
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Peer description
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Mutably borrow the underlying stream
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Recover the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.broken {
            return Err(RedwireError::ConnectionBroken);
        }
        Ok(())
    }

    fn poison_on_fatal<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ref e) = result {
            if e.is_fatal() {
                tracing::warn!("Connection {} failed: {}", self.peer, e);
                self.mark_broken();
            }
        }
        result
    }
}
