//! Wire protocol: envelopes, length-prefix framing, and inbound
//! message classification.

mod envelope;
mod frame;
mod frame_buffer;
mod message;

pub use envelope::{geometry, Envelope};
pub use frame::{decode_length, encode_frame, DEFAULT_MAX_PAYLOAD_SIZE, LENGTH_PREFIX_SIZE};
pub use frame_buffer::FrameBuffer;
pub use message::{into_reply, Message};
