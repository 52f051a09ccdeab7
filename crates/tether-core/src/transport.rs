//! Client-side transport abstraction.
//!
//! Abstracts over byte-stream transports so the engine runs unchanged
//! against production TCP/TLS and simulated networks in tests.

use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

/// A transport that can open one persistent bidirectional byte stream to a
/// peer.
///
/// The engine opens exactly one stream per run and owns both halves for the
/// life of the connection; dropping them is the (single) channel shutdown.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Type of stream for sending data.
    type SendStream: AsyncWrite + Unpin + Send + 'static;

    /// Type of stream for receiving data.
    type RecvStream: AsyncRead + Unpin + Send + 'static;

    /// Connect to `address` (`host:port`) and return the stream halves.
    ///
    /// # Errors
    ///
    /// Returns `std::io::Error` if the peer is unreachable, refuses the
    /// connection, or the channel handshake fails.
    async fn connect(&self, address: &str) -> io::Result<(Self::SendStream, Self::RecvStream)>;
}
