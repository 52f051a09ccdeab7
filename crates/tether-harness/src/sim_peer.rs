//! Scripted in-sim peer.
//!
//! Stands in for the chaincode-support endpoint inside a Turmoil
//! simulation: accepts the engine's connection, verifies the registration
//! handshake, then sends and expects frames under test control.

use std::io;

use tokio::io::{AsyncWriteExt, ReadHalf, WriteHalf};
use turmoil::net::{TcpListener, TcpStream};

use tether_core::{StreamError, codec};
use tether_proto::{Message, MessageType};

/// Listening side of the scripted peer.
pub struct SimPeer {
    listener: TcpListener,
}

impl SimPeer {
    /// Binds the peer endpoint inside the simulation.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is already in use or invalid.
    pub async fn bind(address: &str) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        Ok(Self { listener })
    }

    /// Accepts one engine connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener is closed.
    pub async fn accept(&self) -> io::Result<PeerSession> {
        let (stream, addr) = self.listener.accept().await?;
        tracing::debug!(%addr, "peer accepted engine connection");
        let (recv, send) = tokio::io::split(stream);
        Ok(PeerSession { send, recv })
    }
}

/// One accepted engine connection, driven frame by frame from the test.
pub struct PeerSession {
    send: WriteHalf<TcpStream>,
    recv: ReadHalf<TcpStream>,
}

impl PeerSession {
    /// Reads the first frame, verifies it is REGISTER with the given
    /// identity, and answers REGISTERED.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream ends early or the frame is not the
    /// expected registration.
    pub async fn expect_register(&mut self, identity: &str) -> io::Result<()> {
        let message = self
            .recv()
            .await
            .map_err(io::Error::other)?
            .ok_or_else(|| io::Error::other("stream ended before registration"))?;

        if message.message_type() != MessageType::Register {
            return Err(io::Error::other(format!(
                "expected REGISTER as first frame, got {}",
                message.message_type()
            )));
        }
        if message.payload() != identity.as_bytes() {
            return Err(io::Error::other(format!(
                "REGISTER carried identity {:?}, expected {identity:?}",
                String::from_utf8_lossy(message.payload())
            )));
        }

        tracing::debug!(identity, "registration accepted");
        self.send(&Message::new(MessageType::Registered, "", Vec::new()))
            .await
            .map_err(io::Error::other)?;
        Ok(())
    }

    /// Sends one frame to the engine.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError`] on encode or write failure.
    pub async fn send(&mut self, message: &Message) -> Result<(), StreamError> {
        codec::write_message(&mut self.send, message).await
    }

    /// Writes raw bytes to the engine, bypassing the frame codec. For
    /// fault injection.
    ///
    /// # Errors
    ///
    /// Returns an error on write failure.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.send.write_all(bytes).await?;
        self.send.flush().await?;
        Ok(())
    }

    /// Reads the next frame from the engine; `None` on clean close.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError`] on read or decode failure.
    pub async fn recv(&mut self) -> Result<Option<Message>, StreamError> {
        codec::read_message(&mut self.recv).await
    }

    /// Completes the stream: closes the peer side, which the engine
    /// observes as graceful completion.
    pub fn complete(self) {
        drop(self);
    }
}
