//! Error types for the Tether engine.
//!
//! The taxonomy mirrors the failure policy: configuration problems are
//! recovered locally (see [`crate::config::ConfigError`]), everything that
//! happens on or after stream open is fatal for the engine run. Errors are
//! returned to the caller rather than terminating the process, so the
//! engine stays embeddable and testable; the embedding process decides the
//! exit status.

use std::io;

use tether_proto::{MessageType, ProtocolError};

use crate::session::SessionError;

/// Errors on the shared stream: transport I/O or framing.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Underlying transport failed.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    /// A frame violated the wire format.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The stream ended mid-frame.
    #[error("stream truncated mid-frame")]
    Truncated,

    /// The send path was already torn down.
    #[error("stream closed")]
    Closed,
}

/// Error surfaced by the opaque contract handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal outcome of an engine run.
///
/// Any of these ends the session; the stream is torn down exactly once and
/// no reconnection is attempted.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Stream open or REGISTER send failed; the session never became
    /// active.
    #[error("registration failed: {0}")]
    Registration(#[source] StreamError),

    /// Transport or framing error during the active session.
    #[error("stream failed: {0}")]
    Stream(#[source] StreamError),

    /// The handler returned an error while processing a message.
    #[error("handler failed on {message_type} [{txid}]: {source}")]
    Handler {
        /// Type of the message being processed.
        message_type: MessageType,
        /// Transaction id of the message being processed.
        txid: String,
        /// The handler's error.
        #[source]
        source: HandlerError,
    },

    /// The engine drove the session state machine out of order.
    #[error(transparent)]
    Session(#[from] SessionError),
}
