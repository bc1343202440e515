//! Pipelines
//!
//! A batch of requests written in one go before any reply is read. Replies
//! are matched to requests strictly in order.

use std::io::{Read, Write};

use bytes::BytesMut;

use super::request::Request;
use crate::error::Result;
use crate::network::Connection;
use crate::protocol::{encode_command_into, Reply};

/// Queued requests
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    requests: Vec<Request>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request
    pub fn push(&mut self, request: Request) -> &mut Self {
        self.requests.push(request);
        self
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }

    /// All frames, concatenated in queue order
    pub(crate) fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::new();
        for request in &self.requests {
            encode_command_into(request.command(), &mut buf);
        }
        buf
    }

    /// Write every request, then read and cast one reply per request
    ///
    /// A server error only fails its own slot. An I/O or protocol failure
    /// aborts the batch and leaves the connection broken.
    pub(crate) fn run<S: Read + Write>(
        &self,
        connection: &mut Connection<S>,
    ) -> Result<Vec<Result<Reply>>> {
        if self.requests.is_empty() {
            return Ok(Vec::new());
        }

        tracing::trace!(
            "{} <- pipeline of {} commands",
            connection.peer(),
            self.requests.len()
        );
        connection.send(&self.encode())?;

        let mut pending = PendingReplies {
            connection,
            remaining: self.requests.len(),
        };
        let mut results = Vec::with_capacity(self.requests.len());
        for request in &self.requests {
            let value = pending.connection.read_reply()?;
            pending.remaining -= 1;
            results.push(request.cast(value));
        }

        Ok(results)
    }
}

/// Replies still owed by the server for written requests
///
/// If reading stops early (a panic in the caller's stack, or an early
/// return), the unread replies would be taken for answers to later
/// requests, so the connection is marked broken.
struct PendingReplies<'a, S: Read + Write> {
    connection: &'a mut Connection<S>,
    remaining: usize,
}

impl<S: Read + Write> Drop for PendingReplies<'_, S> {
    fn drop(&mut self) {
        if self.remaining > 0 {
            self.connection.mark_broken();
        }
    }
}
