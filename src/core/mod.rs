//! # Core Protocol Components
//!
//! Low-level frame handling and record classification.
//!
//! This module provides the foundation for the intake protocol: framing over
//! byte streams and decoding of the transaction header.
//!
//! ## Components
//! - **Codec**: Tokio codec for length-prefixed framing
//! - **Record**: transaction header parsing and classification
//!
//! ## Wire Format
//! ```text
//! [Length(4, BE u32)] [Payload(N)]
//! ```
//!
//! ## Security
//! - Maximum frame size: 16MB (prevents memory exhaustion)
//! - Length validation before allocation

pub mod codec;
pub mod record;

pub use codec::FrameCodec;
pub use record::{Record, TxKind};
