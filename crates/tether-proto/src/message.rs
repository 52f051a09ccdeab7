//! Protocol message: the unit of exchange on the stream.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ProtocolError, Result},
    types::MessageType,
};

/// A single protocol message: `{type, txid, payload}`.
///
/// Messages are immutable once constructed. One instance is created per
/// inbound frame or per handler-generated response; instances are never
/// reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    message_type: MessageType,
    txid: String,
    payload: Bytes,
}

impl Message {
    /// Constructs a message from its parts.
    #[must_use]
    pub fn new(message_type: MessageType, txid: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self { message_type, txid: txid.into(), payload: payload.into() }
    }

    /// The REGISTER frame carrying the contract identity, sent as the first
    /// frame on every stream.
    #[must_use]
    pub fn register(identity: &str) -> Self {
        Self::new(MessageType::Register, "", Bytes::copy_from_slice(identity.as_bytes()))
    }

    /// A liveness probe. The peer sends these periodically; the engine
    /// echoes them back.
    #[must_use]
    pub fn keepalive() -> Self {
        Self::new(MessageType::Keepalive, "", Bytes::new())
    }

    /// Message type tag.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// Transaction identifier. Empty for handshake and keepalive frames.
    #[must_use]
    pub fn txid(&self) -> &str {
        &self.txid
    }

    /// Opaque payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Abbreviated txid for log lines.
    #[must_use]
    pub fn short_txid(&self) -> &str {
        match self.txid.char_indices().nth(8) {
            Some((end, _)) => &self.txid[..end],
            None => &self.txid,
        }
    }

    /// Serializes the message into its CBOR body representation.
    pub fn encode_body(&self) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        ciborium::into_writer(self, &mut body)
            .map_err(|e| ProtocolError::Encode(e.to_string()))?;
        Ok(body)
    }

    /// Deserializes a message from its CBOR body representation.
    pub fn decode_body(body: &[u8]) -> Result<Self> {
        ciborium::from_reader(body).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}
