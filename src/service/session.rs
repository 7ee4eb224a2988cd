//! Per-connection session handling.
//!
//! A session owns exactly one connection end to end: it drives the frame
//! codec over the stream, classifies each fully-read payload, keeps the
//! running transaction count, and logs the final count on teardown. Every
//! exit path (clean EOF, protocol violation, I/O error) reaches the same
//! teardown; no error escapes the session task.

use std::net::SocketAddr;

use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;
use tracing::{error, info, warn};

use crate::core::codec::FrameCodec;
use crate::core::record::Record;
use crate::error::SinkError;

/// State for one accepted connection.
///
/// The transaction counter is owned exclusively by this session; it counts
/// every payload of at least 9 bytes, regardless of type tag, and is never
/// reset during the session's life.
#[derive(Debug)]
pub struct Session {
    peer: SocketAddr,
    tx_count: u64,
}

impl Session {
    pub fn new(peer: SocketAddr) -> Self {
        Self { peer, tx_count: 0 }
    }

    /// Number of successfully parsed transactions seen so far
    pub fn tx_count(&self) -> u64 {
        self.tx_count
    }

    /// Classify one fully-read frame payload.
    ///
    /// Payloads carrying a decodable header increment the counter and are
    /// logged with their kind, ID, and size. Shorter payloads are logged as
    /// too short and skipped; the connection keeps reading.
    pub fn observe(&mut self, payload: &[u8]) -> Option<Record> {
        match Record::parse(payload) {
            Some(record) => {
                self.tx_count += 1;
                info!(
                    peer = %self.peer,
                    kind = %record.kind(),
                    count = self.tx_count,
                    id = record.tx_id,
                    size = record.size,
                    "Received transaction"
                );
                Some(record)
            }
            None => {
                warn!(
                    peer = %self.peer,
                    size = payload.len(),
                    "Transaction too short"
                );
                None
            }
        }
    }

    /// Run the read loop until the stream ends.
    ///
    /// Generic over the stream so tests can drive a session with an
    /// in-memory duplex pipe. Returns the final transaction count.
    pub async fn run<S>(mut self, stream: S) -> u64
    where
        S: AsyncRead + Unpin,
    {
        info!(peer = %self.peer, "Client connected");

        let mut frames = FramedRead::new(stream, FrameCodec::new());

        while let Some(next) = frames.next().await {
            match next {
                Ok(payload) => {
                    self.observe(&payload);
                }
                Err(SinkError::IncompleteLengthPrefix { got }) => {
                    warn!(peer = %self.peer, got, "Incomplete length prefix");
                    break;
                }
                Err(SinkError::IncompleteTransaction { expected, got }) => {
                    warn!(
                        peer = %self.peer,
                        expected,
                        got,
                        "Incomplete transaction data"
                    );
                    break;
                }
                Err(e) => {
                    error!(peer = %self.peer, error = %e, "Error handling client");
                    break;
                }
            }
        }

        info!(
            peer = %self.peer,
            total = self.tx_count,
            "Client disconnected"
        );

        self.tx_count
    }
}
