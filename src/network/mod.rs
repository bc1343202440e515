//! Network Module
//!
//! The byte-stream side of the client.
//!
//! ## Architecture
//! - `Connection` owns one stream plus its read buffer and decoder
//! - `tcp::connect` opens a configured `TcpStream`
//! - Pooling, reconnection and routing belong to the caller

mod connection;
pub mod tcp;

pub use connection::Connection;
pub use tcp::connect;
