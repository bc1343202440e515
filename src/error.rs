//! Error types for redwire
//!
//! Provides a unified error type for all operations, plus the closed
//! taxonomy of server-reported failures.

use thiserror::Error;

/// Result type alias using RedwireError
pub type Result<T> = std::result::Result<T, RedwireError>;

/// Classified kind of a failure reported by the server or the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Key holds a value of an incompatible kind
    WrongType,

    /// Stored or supplied value fails the strict integer grammar
    NotAnInteger,

    /// Stored or supplied value fails the float grammar
    NotAFloat,

    /// Non-positive TTL given to the flag-style expiring write (`SET EX|PX`)
    InvalidExpireTime,

    /// Non-positive TTL given to the fixed-TTL write (`SETEX`, `PSETEX`)
    InvalidExpireTimeFixed,

    /// Malformed or truncated wire data
    ProtocolError,

    /// Any other server error text
    ServerError,
}

/// Unified error type for redwire operations
#[derive(Debug, Error)]
pub enum RedwireError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection is broken and must be discarded")]
    ConnectionBroken,

    // -------------------------------------------------------------------------
    // Wire Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    /// Message is the server text, verbatim
    #[error("{message}")]
    Server { kind: ErrorKind, message: String },

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RedwireError {
    /// The classified kind, for server and wire failures
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            RedwireError::Server { kind, .. } => Some(*kind),
            RedwireError::Protocol(_) => Some(ErrorKind::ProtocolError),
            _ => None,
        }
    }

    /// True when the connection that produced this error can no longer be used
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RedwireError::Io(_) | RedwireError::Protocol(_) | RedwireError::ConnectionBroken
        )
    }

    /// The verbatim server message, if this is a server error
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RedwireError::Server { message, .. } => Some(message),
            _ => None,
        }
    }
}
