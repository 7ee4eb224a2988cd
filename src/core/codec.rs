//! Tokio codec for the length-prefixed wire format.
//!
//! Each frame on the wire is a 4-byte big-endian `u32` length followed by
//! exactly that many payload bytes. The decoder emits the raw payload and
//! leaves interpretation to [`crate::core::record`].

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::error::SinkError;

/// Size of the big-endian length prefix on every frame
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Max allowed frame payload size (16 MB)
///
/// The length prefix is attacker-controlled; the size is validated before
/// any allocation happens.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Codec for length-prefixed binary frames.
///
/// The decoder is a two-state machine: awaiting a length prefix, then
/// awaiting that many payload bytes. The declared length is logged as soon
/// as the prefix is read, before the payload arrives.
///
/// Decoding yields the payload as [`Bytes`]; a clean close between frames is
/// a normal end of stream, while residual bytes at EOF surface as
/// [`SinkError::IncompleteLengthPrefix`] or
/// [`SinkError::IncompleteTransaction`] depending on how far the last frame
/// got.
#[derive(Debug, Default)]
pub struct FrameCodec {
    /// Declared payload length of the frame in flight, once the prefix has
    /// been consumed from the buffer
    pending: Option<usize>,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for FrameCodec {
    type Item = Bytes;
    type Error = SinkError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, SinkError> {
        let length = match self.pending {
            Some(length) => length,
            None => {
                if src.len() < LENGTH_PREFIX_SIZE {
                    return Ok(None);
                }

                let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
                prefix.copy_from_slice(&src[..LENGTH_PREFIX_SIZE]);
                let length = u32::from_be_bytes(prefix) as usize;
                if length > MAX_FRAME_SIZE {
                    return Err(SinkError::OversizedTransaction(length));
                }

                src.advance(LENGTH_PREFIX_SIZE);
                debug!(length, "Expecting transaction");
                self.pending = Some(length);
                length
            }
        };

        if src.len() < length {
            // Reserve the rest of the frame up front so the read loop does
            // not grow the buffer one syscall at a time.
            src.reserve(length - src.len());
            return Ok(None);
        }

        self.pending = None;
        Ok(Some(src.split_to(length).freeze()))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, SinkError> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None => match self.pending.take() {
                None if src.is_empty() => Ok(None),
                None => {
                    // The peer either closed abruptly or sent garbage; the
                    // two are indistinguishable here and are treated the
                    // same.
                    let got = src.len();
                    src.clear();
                    Err(SinkError::IncompleteLengthPrefix { got })
                }
                Some(expected) => {
                    let got = src.len();
                    src.clear();
                    Err(SinkError::IncompleteTransaction { expected, got })
                }
            },
        }
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = SinkError;

    fn encode(&mut self, payload: Bytes, dst: &mut BytesMut) -> Result<(), SinkError> {
        if payload.len() > MAX_FRAME_SIZE {
            return Err(SinkError::OversizedTransaction(payload.len()));
        }

        dst.reserve(LENGTH_PREFIX_SIZE + payload.len());
        dst.put_u32(payload.len() as u32);
        dst.extend_from_slice(&payload);
        Ok(())
    }
}
