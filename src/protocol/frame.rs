//! Length-prefix framing.
//!
//! Every message in either direction is framed as:
//! ```text
//! ┌────────────┬──────────────────────┐
//! │ Length     │ Payload              │
//! │ 4 bytes    │ exactly that many    │
//! │ uint32 LE  │ bytes of UTF-8 JSON  │
//! └────────────┴──────────────────────┘
//! ```
//!
//! The declared length always equals the payload byte length; a short read
//! before that many bytes have accumulated is not a valid message.

use crate::error::{Error, Result};

/// Length prefix size in bytes (fixed, exactly 4).
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Maximum accepted payload size (64 MiB).
///
/// Wayfire messages are small; a larger declared length is a corrupt or
/// hostile stream, not a real message.
pub const DEFAULT_MAX_PAYLOAD_SIZE: u32 = 64 * 1024 * 1024;

/// Build a complete frame: little-endian length prefix followed by payload.
///
/// # Example
///
/// ```
/// use wayfire_ipc::protocol::{encode_frame, LENGTH_PREFIX_SIZE};
///
/// let frame = encode_frame(b"{}");
/// assert_eq!(frame.len(), LENGTH_PREFIX_SIZE + 2);
/// assert_eq!(&frame[..4], &2u32.to_le_bytes());
/// ```
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Decode and validate a length prefix.
///
/// Fails with [`Error::Protocol`] if the declared length exceeds
/// [`DEFAULT_MAX_PAYLOAD_SIZE`].
pub fn decode_length(prefix: [u8; LENGTH_PREFIX_SIZE]) -> Result<u32> {
    let len = u32::from_le_bytes(prefix);
    if len > DEFAULT_MAX_PAYLOAD_SIZE {
        return Err(Error::Protocol(format!(
            "declared payload size {} exceeds maximum {}",
            len, DEFAULT_MAX_PAYLOAD_SIZE
        )));
    }
    Ok(len)
}
