//! # redwire
//!
//! A client-side engine for the Redis wire protocol (RESP) with:
//! - Binary-safe multi-bulk request encoding
//! - Streaming, depth-bounded reply decoding
//! - Error classification that keeps the server text verbatim
//! - Per-command reply casting for the string and bitmap commands
//! - FIFO pipelines over a single connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Client (dispatcher)                      │
//! │          typed operations · pipelines · validation           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Request (command + casting policy)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Connection                             │
//! │              read buffer · streaming Decoder                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Encode    │          │   Decode    │
//!   │  (request)  │          │   (Value)   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                       ┌───────────┴───────────┐
//!                       ▼                       ▼
//!               ┌──────────────┐        ┌──────────────┐
//!               │   Classify   │        │     Cast     │
//!               │   (errors)   │        │   (Reply)    │
//!               └──────────────┘        └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod commands;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, RedwireError, Result};
pub use config::Config;
pub use client::{Client, Pipeline, Request};
pub use commands::{BitOp, Condition, Expiry, SetOptions};
pub use protocol::{KeyedValues, Reply, Value};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of redwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
