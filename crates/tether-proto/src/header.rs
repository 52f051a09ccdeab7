//! Frame header implementation with zero-copy parsing.
//!
//! The `FrameHeader` is a fixed 16-byte structure serialized as raw binary
//! (big endian). It lets the receive path size its body read and log the
//! message type without deserializing the CBOR body.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    errors::{ProtocolError, Result},
    types::MessageType,
};

/// Fixed 16-byte frame header (big-endian network byte order).
///
/// Fields are stored as raw byte arrays to avoid alignment issues with
/// `#[repr(C, packed)]`. All 16-byte patterns are structurally valid, so
/// casting untrusted network bytes cannot cause undefined behavior; semantic
/// validation (magic, version, size cap) happens in [`FrameHeader::from_bytes`].
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct FrameHeader {
    magic: [u8; 4],   // 0x54455448 ("TETH" in ASCII)
    version: u8,      // 0x01
    message_type: u8, // MessageType wire tag
    reserved: [u8; 2],
    body_len: [u8; 8], // u64 CBOR body length
}

impl FrameHeader {
    /// Size of the serialized header (16 bytes).
    pub const SIZE: usize = 16;

    /// Magic number: "TETH" in ASCII.
    pub const MAGIC: u32 = 0x5445_5448;

    /// Current protocol version.
    pub const VERSION: u8 = 0x01;

    /// Maximum body size (16 MB).
    pub const MAX_BODY_SIZE: u64 = 16 * 1024 * 1024;

    /// Create a new header for the given message type and body length.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::BodyTooLarge`] if `body_len` exceeds the
    /// per-frame cap.
    pub fn new(message_type: MessageType, body_len: usize) -> Result<Self> {
        let body_len = body_len as u64;
        if body_len > Self::MAX_BODY_SIZE {
            return Err(ProtocolError::BodyTooLarge {
                size: body_len as usize,
                max: Self::MAX_BODY_SIZE as usize,
            });
        }
        Ok(Self {
            magic: Self::MAGIC.to_be_bytes(),
            version: Self::VERSION,
            message_type: message_type.tag(),
            reserved: [0; 2],
            body_len: body_len.to_be_bytes(),
        })
    }

    /// Parse a header from network bytes (zero-copy, safe).
    ///
    /// Validation order is cheapest-first: buffer length, magic, version,
    /// body size cap, message-type tag.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the buffer is shorter than 16 bytes, the
    /// magic or version is wrong, the body length exceeds the cap, or the
    /// message-type tag is unknown.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        let header = Self::ref_from_prefix(bytes)
            .map_err(|_| ProtocolError::FrameTooShort {
                expected: Self::SIZE,
                actual: bytes.len(),
            })?
            .0;

        if u32::from_be_bytes(header.magic) != Self::MAGIC {
            return Err(ProtocolError::InvalidMagic);
        }

        if header.version != Self::VERSION {
            return Err(ProtocolError::UnsupportedVersion(header.version));
        }

        let body_len = u64::from_be_bytes(header.body_len);
        if body_len > Self::MAX_BODY_SIZE {
            return Err(ProtocolError::BodyTooLarge {
                size: body_len as usize,
                max: Self::MAX_BODY_SIZE as usize,
            });
        }

        if MessageType::from_tag(header.message_type).is_none() {
            return Err(ProtocolError::UnknownMessageType(header.message_type));
        }

        Ok(header)
    }

    /// Serialize the header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let bytes = IntoBytes::as_bytes(self);
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(bytes);
        arr
    }

    /// Protocol version.
    #[must_use]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Message type from the header tag.
    ///
    /// Always `Some` for headers produced by [`FrameHeader::from_bytes`] or
    /// [`FrameHeader::new`]; the raw tag is kept for diagnostics.
    #[must_use]
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_tag(self.message_type)
    }

    /// Raw message-type tag byte.
    #[must_use]
    pub fn message_type_tag(&self) -> u8 {
        self.message_type
    }

    /// Declared CBOR body length.
    #[must_use]
    pub fn body_len(&self) -> u64 {
        u64::from_be_bytes(self.body_len)
    }
}

// Manual Debug implementation (can't derive due to packed repr)
impl std::fmt::Debug for FrameHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHeader")
            .field("magic", &format!("{:#010x}", u32::from_be_bytes(self.magic)))
            .field("version", &self.version())
            .field("message_type", &self.message_type())
            .field("body_len", &self.body_len())
            .finish()
    }
}

// Manual PartialEq implementation (can't derive due to packed repr)
impl PartialEq for FrameHeader {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for FrameHeader {}
