//! # framesink
//!
//! A length-prefixed transaction intake server for protocol test benches.
//!
//! The server accepts concurrent TCP connections on a fixed set of ports,
//! decodes a stream of variable-length binary records delimited by a 4-byte
//! big-endian length prefix, classifies each record by its embedded type tag
//! and identifier, and reports per-connection statistics through structured
//! logs. Nothing is persisted and nothing is written back to the peer.
//!
//! ## Architecture
//! - [`core`]: wire format, frame codec, record classification
//! - [`service`]: listener set and per-connection sessions
//! - [`config`]: server and logging configuration
//! - [`error`]: error types
//!
//! ## Wire Format
//! ```text
//! [Length(4, BE u32)] [Payload(N)]
//! ```
//!
//! A payload of at least 9 bytes carries a transaction: byte 0 is the type
//! tag (0 = SAMPLE, 1 = STANDARD, anything else UNKNOWN) and bytes 1..9 are
//! the big-endian u64 transaction ID. Shorter payloads are logged as too
//! short and skipped; the connection keeps reading.

pub mod config;
pub mod core;
pub mod error;
pub mod service;

pub use config::SinkConfig;
pub use error::{Result, SinkError};
