//! Error types for wire-format parsing and construction.

use crate::types::MessageType;

/// Convenience alias for fallible wire-format operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding Tether frames.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer ended before a complete header was available.
    #[error("frame too short: expected {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Bytes required for a complete header.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// Header magic did not match the protocol constant.
    #[error("invalid frame magic")]
    InvalidMagic,

    /// Header carried a protocol version this build does not speak.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// Declared body length exceeds the per-frame cap.
    #[error("frame body too large: {size} bytes (max {max})")]
    BodyTooLarge {
        /// Declared body size.
        size: usize,
        /// Maximum permitted body size.
        max: usize,
    },

    /// Header carried a message-type tag with no enum counterpart.
    #[error("unknown message type tag: {0:#04x}")]
    UnknownMessageType(u8),

    /// Header tag and body `type` field disagree.
    #[error("message type mismatch: header says {header}, body says {body}")]
    TypeMismatch {
        /// Type tag from the frame header.
        header: MessageType,
        /// Type field from the decoded body.
        body: MessageType,
    },

    /// CBOR body failed to decode.
    #[error("body decode failed: {0}")]
    Decode(String),

    /// CBOR body failed to encode.
    #[error("body encode failed: {0}")]
    Encode(String),
}
