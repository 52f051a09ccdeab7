//! Turmoil-based transport implementation using TCP streams.

use std::io;

use async_trait::async_trait;
use tokio::io::{ReadHalf, WriteHalf};
use turmoil::net::TcpStream;

use tether_core::Transport;

/// Simulation transport using Turmoil's deterministic TCP streams.
///
/// Turmoil controls packet ordering and timing, so engine runs are
/// reproducible and faults (partitions, delays, abrupt closes) can be
/// injected from the test. TCP gives the same reliable, ordered byte
/// delivery the production channel provides, which is all the engine
/// assumes of its transport.
pub struct SimTransport;

#[async_trait]
impl Transport for SimTransport {
    type SendStream = WriteHalf<TcpStream>;
    type RecvStream = ReadHalf<TcpStream>;

    async fn connect(&self, address: &str) -> io::Result<(Self::SendStream, Self::RecvStream)> {
        let stream = TcpStream::connect(address).await?;
        let (recv, send) = tokio::io::split(stream);
        Ok((send, recv))
    }
}
