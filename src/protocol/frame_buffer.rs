//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for zero-copy buffer management and a small state
//! machine for fragmented frames:
//! - `WaitingForLength`: need the 4-byte prefix
//! - `WaitingForPayload`: prefix parsed, need N more payload bytes
//!
//! The client itself reads with exact-length primitives; this buffer is for
//! consumers that read the stream in bulk chunks (servers, recorders, test
//! harnesses) and need complete payloads back out.

use bytes::{Bytes, BytesMut};

use super::frame::{decode_length, LENGTH_PREFIX_SIZE};
use crate::error::Result;

/// State machine for frame parsing.
#[derive(Debug, Clone)]
enum State {
    /// Waiting for the complete 4-byte length prefix.
    WaitingForLength,
    /// Prefix parsed, waiting for payload bytes.
    WaitingForPayload { remaining: u32 },
}

/// Buffer for accumulating incoming bytes and extracting complete payloads.
pub struct FrameBuffer {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
}

impl FrameBuffer {
    /// Create a new frame buffer.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(16 * 1024),
            state: State::WaitingForLength,
        }
    }

    /// Push data into the buffer and extract all complete payloads.
    ///
    /// Fragmented data is buffered internally for the next push. Returns the
    /// payloads (without their length prefixes) completed by this chunk,
    /// which may be empty.
    ///
    /// # Errors
    ///
    /// Fails if a declared length exceeds the protocol maximum.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Bytes>> {
        self.buffer.extend_from_slice(data);

        let mut payloads = Vec::new();
        while let Some(payload) = self.try_extract_one()? {
            payloads.push(payload);
        }

        Ok(payloads)
    }

    fn try_extract_one(&mut self) -> Result<Option<Bytes>> {
        match self.state {
            State::WaitingForLength => {
                if self.buffer.len() < LENGTH_PREFIX_SIZE {
                    return Ok(None);
                }

                let prefix: [u8; LENGTH_PREFIX_SIZE] = self.buffer[..LENGTH_PREFIX_SIZE]
                    .try_into()
                    .expect("buffer has enough bytes");
                let len = decode_length(prefix)?;

                let _ = self.buffer.split_to(LENGTH_PREFIX_SIZE);

                if len == 0 {
                    return Ok(Some(Bytes::new()));
                }

                self.state = State::WaitingForPayload { remaining: len };
                self.try_extract_one()
            }

            State::WaitingForPayload { remaining } => {
                let remaining = remaining as usize;
                if self.buffer.len() < remaining {
                    return Ok(None);
                }

                let payload = self.buffer.split_to(remaining).freeze();
                self.state = State::WaitingForLength;

                Ok(Some(payload))
            }
        }
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer and reset state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = State::WaitingForLength;
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encode_frame;

    #[test]
    fn test_single_complete_frame() {
        let mut buffer = FrameBuffer::new();

        let payloads = buffer.push(&encode_frame(b"hello")).unwrap();

        assert_eq!(payloads.len(), 1);
        assert_eq!(&payloads[0][..], b"hello");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_multiple_frames_in_one_push() {
        let mut buffer = FrameBuffer::new();

        let mut combined = encode_frame(b"first");
        combined.extend_from_slice(&encode_frame(b"second"));
        combined.extend_from_slice(&encode_frame(b"third"));

        let payloads = buffer.push(&combined).unwrap();

        assert_eq!(payloads.len(), 3);
        assert_eq!(&payloads[0][..], b"first");
        assert_eq!(&payloads[1][..], b"second");
        assert_eq!(&payloads[2][..], b"third");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_fragmented_prefix() {
        let mut buffer = FrameBuffer::new();
        let frame = encode_frame(b"test");

        let payloads = buffer.push(&frame[..2]).unwrap();
        assert!(payloads.is_empty());

        let payloads = buffer.push(&frame[2..]).unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(&payloads[0][..], b"test");
    }

    #[test]
    fn test_fragmented_payload() {
        let mut buffer = FrameBuffer::new();
        let payload = b"a longer payload that arrives in pieces";
        let frame = encode_frame(payload);

        let split = LENGTH_PREFIX_SIZE + 10;
        let payloads = buffer.push(&frame[..split]).unwrap();
        assert!(payloads.is_empty());

        let payloads = buffer.push(&frame[split..]).unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(&payloads[0][..], payload);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_empty_payload_frame() {
        let mut buffer = FrameBuffer::new();

        let payloads = buffer.push(&encode_frame(b"")).unwrap();

        assert_eq!(payloads.len(), 1);
        assert!(payloads[0].is_empty());
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut buffer = FrameBuffer::new();
        let frame = encode_frame(b"hi");

        let mut all = Vec::new();
        for byte in &frame {
            all.extend(buffer.push(&[*byte]).unwrap());
        }

        assert_eq!(all.len(), 1);
        assert_eq!(&all[0][..], b"hi");
    }

    #[test]
    fn test_complete_plus_partial() {
        let mut buffer = FrameBuffer::new();
        let frame1 = encode_frame(b"first");
        let frame2 = encode_frame(b"second");

        let mut data = frame1.clone();
        data.extend_from_slice(&frame2[..3]);

        let payloads = buffer.push(&data).unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(&payloads[0][..], b"first");

        let payloads = buffer.push(&frame2[3..]).unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(&payloads[0][..], b"second");
    }

    #[test]
    fn test_oversized_length_rejected() {
        let mut buffer = FrameBuffer::new();
        let prefix = u32::MAX.to_le_bytes();

        assert!(buffer.push(&prefix).is_err());
    }

    #[test]
    fn test_clear_resets_state() {
        let mut buffer = FrameBuffer::new();
        let frame = encode_frame(b"pending");

        buffer.push(&frame[..LENGTH_PREFIX_SIZE + 2]).unwrap();
        assert!(!buffer.is_empty());

        buffer.clear();
        assert!(buffer.is_empty());

        // A fresh frame parses from scratch after the reset.
        let payloads = buffer.push(&encode_frame(b"fresh")).unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(&payloads[0][..], b"fresh");
    }
}
