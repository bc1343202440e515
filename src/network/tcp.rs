//! TCP transport
//!
//! Opens a `TcpStream` configured from [`Config`] and wraps it in a
//! [`Connection`].

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::Connection;
use crate::config::Config;
use crate::error::{RedwireError, Result};

/// Connect to `config.server_addr`
pub fn connect(config: &Config) -> Result<Connection<TcpStream>> {
    config.validate()?;

    let stream = open_stream(config)?;

    // Disable Nagle's algorithm for low latency
    stream.set_nodelay(config.nodelay)?;

    if config.read_timeout_ms > 0 {
        stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
    }
    if config.write_timeout_ms > 0 {
        stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
    }

    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| config.server_addr.clone());

    tracing::debug!("Connected to {}", peer);

    Ok(Connection::with_config(stream, config)?.with_peer(peer))
}

fn open_stream(config: &Config) -> Result<TcpStream> {
    if config.connect_timeout_ms == 0 {
        return Ok(TcpStream::connect(&config.server_addr)?);
    }

    let timeout = Duration::from_millis(config.connect_timeout_ms);
    let mut last_error = None;

    for addr in config.server_addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
    }

    Err(match last_error {
        Some(e) => RedwireError::Io(e),
        None => RedwireError::Config(format!(
            "server address {} resolved to nothing",
            config.server_addr
        )),
    })
}
