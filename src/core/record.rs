//! Transaction record parsing and classification.

use std::fmt;

/// Minimum payload size carrying a decodable transaction header
pub const RECORD_HEADER_SIZE: usize = 9;

/// Classification of a transaction by its type tag.
///
/// Unrecognized tags are still counted; `Unknown` carries the raw tag so it
/// can be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Sample,
    Standard,
    Unknown(u8),
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxKind::Sample => write!(f, "SAMPLE"),
            TxKind::Standard => write!(f, "STANDARD"),
            TxKind::Unknown(tag) => write!(f, "UNKNOWN(type={tag})"),
        }
    }
}

/// A decoded transaction header.
///
/// Bytes beyond the 9-byte header are opaque and only contribute to `size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Raw type tag, byte 0 of the payload
    pub tx_type: u8,
    /// Big-endian transaction ID, payload bytes 1..9
    pub tx_id: u64,
    /// Full payload size in bytes
    pub size: usize,
}

impl Record {
    /// Parse a record out of a fully-read frame payload.
    ///
    /// Returns `None` when the payload is too short to carry a header; such
    /// frames are structurally valid but not countable.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() < RECORD_HEADER_SIZE {
            return None;
        }

        let mut id = [0u8; 8];
        id.copy_from_slice(&payload[1..RECORD_HEADER_SIZE]);

        Some(Self {
            tx_type: payload[0],
            tx_id: u64::from_be_bytes(id),
            size: payload.len(),
        })
    }

    /// Classify the record by its type tag.
    pub fn kind(&self) -> TxKind {
        match self.tx_type {
            0 => TxKind::Sample,
            1 => TxKind::Standard,
            tag => TxKind::Unknown(tag),
        }
    }
}
