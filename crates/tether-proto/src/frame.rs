//! Frame: header plus CBOR body.

use crate::{
    errors::{ProtocolError, Result},
    header::FrameHeader,
    message::Message,
};

/// A complete wire frame: validated header and raw CBOR body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    header: FrameHeader,
    body: Vec<u8>,
}

impl Frame {
    /// Builds the frame for a message.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the body fails to encode or exceeds the
    /// per-frame cap.
    pub fn from_message(message: &Message) -> Result<Self> {
        let body = message.encode_body()?;
        let header = FrameHeader::new(message.message_type(), body.len())?;
        Ok(Self { header, body })
    }

    /// Assembles a frame from a parsed header and the body bytes read for
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::FrameTooShort`] if the body length does not
    /// match the header's declaration.
    pub fn new(header: FrameHeader, body: Vec<u8>) -> Result<Self> {
        if body.len() as u64 != header.body_len() {
            return Err(ProtocolError::FrameTooShort {
                expected: header.body_len() as usize,
                actual: body.len(),
            });
        }
        Ok(Self { header, body })
    }

    /// Decodes the body and cross-checks its `type` field against the
    /// header tag.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::TypeMismatch`] when header and body
    /// disagree, or a decode error for a malformed body.
    pub fn into_message(self) -> Result<Message> {
        let message = Message::decode_body(&self.body)?;
        match self.header.message_type() {
            Some(header_type) if header_type == message.message_type() => Ok(message),
            Some(header_type) => Err(ProtocolError::TypeMismatch {
                header: header_type,
                body: message.message_type(),
            }),
            None => Err(ProtocolError::UnknownMessageType(self.header.message_type_tag())),
        }
    }

    /// Appends the serialized frame to `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.header.to_bytes());
        buf.extend_from_slice(&self.body);
    }

    /// Frame header.
    #[must_use]
    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// Raw CBOR body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageType;

    #[test]
    fn message_survives_framing() {
        let msg = Message::new(MessageType::Response, "tx-42", b"result".to_vec());
        let frame = Frame::from_message(&msg).unwrap();
        assert_eq!(frame.header().message_type(), Some(MessageType::Response));
        assert_eq!(frame.header().body_len(), frame.body().len() as u64);

        let mut wire = Vec::new();
        frame.encode(&mut wire);

        let header = *FrameHeader::from_bytes(&wire).unwrap();
        let body = wire[FrameHeader::SIZE..].to_vec();
        let decoded = Frame::new(header, body).unwrap().into_message().unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn header_body_type_mismatch_rejected() {
        let msg = Message::keepalive();
        let body = msg.encode_body().unwrap();
        let header = FrameHeader::new(MessageType::Transaction, body.len()).unwrap();

        let result = Frame::new(header, body).unwrap().into_message();
        assert_eq!(
            result,
            Err(ProtocolError::TypeMismatch {
                header: MessageType::Transaction,
                body: MessageType::Keepalive,
            })
        );
    }

    #[test]
    fn truncated_body_rejected() {
        let msg = Message::new(MessageType::Init, "t", b"payload".to_vec());
        let body = msg.encode_body().unwrap();
        let header = FrameHeader::new(MessageType::Init, body.len()).unwrap();

        let truncated = body[..body.len() - 1].to_vec();
        assert!(matches!(
            Frame::new(header, truncated),
            Err(ProtocolError::FrameTooShort { .. })
        ));
    }
}
