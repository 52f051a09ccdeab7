//! Serial send discipline.
//!
//! All outbound writes funnel through one writer task that owns the send
//! half of the stream; its request channel is the single serialization
//! point, so at most one frame is in flight at any instant and frames are
//! written in submission order.
//!
//! Two variants share the funnel: [`SerialSender::send`] resolves once the
//! frame is written and flushed (used for the REGISTER frame, which must
//! precede all other traffic), and [`SerialSender::send_async`] enqueues
//! and returns so the dispatch loop is not gated on network flush latency.

use tokio::{
    io::AsyncWrite,
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};

use tether_proto::Message;

use crate::{codec, error::StreamError};

struct SendRequest {
    message: Message,
    ack: Option<oneshot::Sender<Result<(), StreamError>>>,
}

/// Handle for submitting outbound frames to the writer task.
#[derive(Debug, Clone)]
pub struct SerialSender {
    tx: mpsc::UnboundedSender<SendRequest>,
}

impl SerialSender {
    /// Synchronous variant: resolves once the frame has been written and
    /// flushed.
    ///
    /// # Errors
    ///
    /// Returns the write failure, or [`StreamError::Closed`] if the writer
    /// task is gone.
    pub async fn send(&self, message: Message) -> Result<(), StreamError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(SendRequest { message, ack: Some(ack_tx) })
            .map_err(|_| StreamError::Closed)?;
        ack_rx.await.map_err(|_| StreamError::Closed)?
    }

    /// Asynchronous variant: enqueues the frame and returns immediately.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Closed`] if the writer task is gone.
    pub fn send_async(&self, message: Message) -> Result<(), StreamError> {
        self.tx.send(SendRequest { message, ack: None }).map_err(|_| StreamError::Closed)
    }
}

/// Spawns the writer task that owns `stream`.
///
/// The task drains requests in order until every [`SerialSender`] clone is
/// dropped, then exits. On a write failure it signals `disconnect`, hands
/// the error to the blocked synchronous caller if there is one, and stops
/// accepting further frames.
pub(crate) fn spawn<W>(
    stream: W,
    disconnect: watch::Sender<bool>,
) -> (SerialSender, JoinHandle<Result<(), StreamError>>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<SendRequest>();
    let handle = tokio::spawn(async move {
        let mut stream = stream;
        while let Some(request) = rx.recv().await {
            match codec::write_message(&mut stream, &request.message).await {
                Ok(()) => {
                    if let Some(ack) = request.ack {
                        let _ = ack.send(Ok(()));
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "stream write failed");
                    let _ = disconnect.send(true);
                    match request.ack {
                        // the blocked synchronous caller owns the error
                        Some(ack) => {
                            let _ = ack.send(Err(err));
                            return Ok(());
                        }
                        None => return Err(err),
                    }
                }
            }
        }
        Ok(())
    });
    (SerialSender { tx }, handle)
}
