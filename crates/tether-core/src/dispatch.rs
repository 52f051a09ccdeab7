//! Dispatch queue and loop.
//!
//! The unbounded FIFO queue is the sole synchronization point between the
//! reader task and the dispatch loop: the reader enqueues inbound frames
//! without blocking the transport, the loop is the queue's only consumer,
//! and processing order equals arrival order. The handler capability gets a
//! [`QueueHandle`] of its own so it can enqueue follow-up messages.

use tokio::sync::{mpsc, watch};

use tether_proto::{Message, MessageType};

use crate::{
    error::{EngineError, StreamError},
    handler::MessageHandler,
    sender::SerialSender,
};

/// One unit of work for the dispatch loop.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    /// The message to hand to the handler.
    pub message: Message,
    /// Whether the message must be written back to the stream after
    /// handling.
    pub forward: bool,
}

impl QueueEntry {
    /// Entry for a frame received from the peer.
    #[must_use]
    pub fn inbound(message: Message) -> Self {
        Self { message, forward: false }
    }

    /// Entry for a handler-generated message destined for the peer.
    #[must_use]
    pub fn outbound(message: Message) -> Self {
        Self { message, forward: true }
    }
}

/// Enqueue side of the dispatch queue.
///
/// Clones are held by the reader task and handed to the handler; the loop
/// remains the single consumer.
#[derive(Debug, Clone)]
pub struct QueueHandle {
    tx: mpsc::UnboundedSender<QueueEntry>,
}

impl QueueHandle {
    /// Appends an entry to the queue.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Closed`] once the dispatch side is gone.
    pub fn enqueue(&self, entry: QueueEntry) -> Result<(), StreamError> {
        self.tx.send(entry).map_err(|_| StreamError::Closed)
    }
}

/// Creates the dispatch queue.
pub(crate) fn queue() -> (QueueHandle, mpsc::UnboundedReceiver<QueueEntry>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueueHandle { tx }, rx)
}

/// Why the dispatch loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopExit {
    /// The disconnect signal fired: stream completion or a task fault.
    Disconnected,
    /// Every enqueue handle was dropped.
    QueueClosed,
}

/// Runs the dispatch loop until disconnect, queue closure, or an error.
///
/// Per entry: hand the message to the handler, then — if the entry asks for
/// forwarding or the message is a KEEPALIVE — send it back upstream through
/// the asynchronous serial-send path. KEEPALIVE is echoed unconditionally:
/// the peer's liveness probes are answered without contract-level
/// involvement.
pub(crate) async fn run<H: MessageHandler>(
    entries: &mut mpsc::UnboundedReceiver<QueueEntry>,
    queue: &QueueHandle,
    handler: &mut H,
    sender: &SerialSender,
    disconnect: &mut watch::Receiver<bool>,
) -> Result<LoopExit, EngineError> {
    loop {
        let entry = tokio::select! {
            _ = disconnect.changed() => return Ok(LoopExit::Disconnected),
            entry = entries.recv() => match entry {
                Some(entry) => entry,
                None => return Ok(LoopExit::QueueClosed),
            },
        };

        let message = entry.message;
        tracing::debug!(
            txid = message.short_txid(),
            message_type = %message.message_type(),
            "dispatching message"
        );

        handler.handle_message(&message, queue).map_err(|source| EngineError::Handler {
            message_type: message.message_type(),
            txid: message.txid().to_string(),
            source,
        })?;

        if entry.forward || message.message_type() == MessageType::Keepalive {
            if message.message_type() == MessageType::Keepalive {
                tracing::trace!("echoing keepalive");
            } else {
                tracing::debug!(
                    txid = message.short_txid(),
                    message_type = %message.message_type(),
                    "forwarding message to peer"
                );
            }
            sender.send_async(message).map_err(EngineError::Stream)?;
        }
    }
}
