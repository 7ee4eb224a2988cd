//! # Error Types
//!
//! Error handling for the framing server.
//!
//! This module defines all error variants that can occur while accepting
//! connections and decoding the length-prefixed wire format, from low-level
//! I/O failures to protocol violations on a single connection.
//!
//! ## Error Categories
//! - **I/O Errors**: socket and accept failures
//! - **Protocol Errors**: truncated prefixes, short payloads, oversized frames
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! All errors implement `std::error::Error` for interoperability.

use std::io;
use thiserror::Error;

/// SinkError is the primary error type for all server operations
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Incomplete length prefix: got {got} of 4 bytes")]
    IncompleteLengthPrefix { got: usize },

    #[error("Incomplete transaction data: expected {expected} bytes, got {got}")]
    IncompleteTransaction { expected: usize, got: usize },

    #[error("Transaction too large: {0} bytes")]
    OversizedTransaction(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Type alias for Results using SinkError
pub type Result<T> = std::result::Result<T, SinkError>;
