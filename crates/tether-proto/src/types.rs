//! Protocol message types.

use serde_repr::{Deserialize_repr, Serialize_repr};

/// Type tag of a protocol message.
///
/// The same set is used in both directions: the peer drives the contract
/// with `Init`/`Transaction`/`Keepalive`, the contract answers with
/// `Response`/`Error`/`Completed`, and `Register`/`Registered` form the
/// opening handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum MessageType {
    /// Contract announces its identity; first frame on every stream.
    Register = 1,
    /// Peer acknowledges the registration.
    Registered = 2,
    /// Peer asks the contract to initialize.
    Init = 3,
    /// Peer submits a transaction for execution.
    Transaction = 4,
    /// Execution result for an earlier request.
    Response = 5,
    /// Execution failed.
    Error = 6,
    /// A transaction reached a terminal state.
    Completed = 7,
    /// Liveness probe; echoed back without contract involvement.
    Keepalive = 8,
}

impl MessageType {
    /// Attempts to parse a message type from its wire tag.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Register),
            2 => Some(Self::Registered),
            3 => Some(Self::Init),
            4 => Some(Self::Transaction),
            5 => Some(Self::Response),
            6 => Some(Self::Error),
            7 => Some(Self::Completed),
            8 => Some(Self::Keepalive),
            _ => None,
        }
    }

    /// Returns the wire tag for this message type.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Register => "REGISTER",
            Self::Registered => "REGISTERED",
            Self::Init => "INIT",
            Self::Transaction => "TRANSACTION",
            Self::Response => "RESPONSE",
            Self::Error => "ERROR",
            Self::Completed => "COMPLETED",
            Self::Keepalive => "KEEPALIVE",
        };
        f.write_str(name)
    }
}
