//! Wire format for the Tether chaincode stream.
//!
//! Frames consist of a fixed 16-byte header (zero-copy binary) followed by a
//! variable-length CBOR body. The header carries the message type and the
//! body length, so the receive path can log and route a frame before
//! deserializing its body. The body carries the actual protocol message:
//! `{type, txid, payload}`, reused verbatim in both directions of the
//! stream.
//!
//! All parsing uses compile-time verified layouts via `zerocopy`. A 16 MB
//! body limit bounds memory consumption for a single frame.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod frame;
pub mod header;
pub mod message;
pub mod types;

pub use errors::{ProtocolError, Result};
pub use frame::Frame;
pub use header::FrameHeader;
pub use message::Message;
pub use types::MessageType;
