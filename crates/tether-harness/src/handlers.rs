//! Reusable handler implementations for engine tests.

use std::sync::{Arc, Mutex};

use tether_core::{HandlerError, MessageHandler, QueueEntry, QueueHandle};
use tether_proto::{Message, MessageType};

/// Records every message it is handed; never forwards anything itself.
///
/// Clones share the record, so a test can keep one and hand the other to
/// the engine.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    seen: Arc<Mutex<Vec<Message>>>,
}

impl RecordingHandler {
    /// Snapshot of the messages handled so far, in arrival order.
    #[must_use]
    pub fn seen(&self) -> Vec<Message> {
        self.seen.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }

    /// Message types handled so far, in arrival order.
    #[must_use]
    pub fn types_seen(&self) -> Vec<MessageType> {
        self.seen().iter().map(Message::message_type).collect()
    }
}

impl MessageHandler for RecordingHandler {
    fn handle_message(
        &mut self,
        message: &Message,
        _queue: &QueueHandle,
    ) -> Result<(), HandlerError> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}

/// Answers every TRANSACTION by enqueueing a RESPONSE for forwarding;
/// records like [`RecordingHandler`] otherwise.
#[derive(Debug, Clone, Default)]
pub struct RespondingHandler {
    recording: RecordingHandler,
}

impl RespondingHandler {
    /// Snapshot of the messages handled so far, in arrival order.
    #[must_use]
    pub fn seen(&self) -> Vec<Message> {
        self.recording.seen()
    }
}

impl MessageHandler for RespondingHandler {
    fn handle_message(
        &mut self,
        message: &Message,
        queue: &QueueHandle,
    ) -> Result<(), HandlerError> {
        self.recording.handle_message(message, queue)?;
        if message.message_type() == MessageType::Transaction {
            let response = Message::new(MessageType::Response, message.txid(), b"ok".to_vec());
            queue.enqueue(QueueEntry::outbound(response))?;
        }
        Ok(())
    }
}

/// Fails on the first message whose type matches the trigger.
#[derive(Debug)]
pub struct FailingHandler {
    trigger: MessageType,
}

impl FailingHandler {
    /// Fails when handed a message of the given type.
    #[must_use]
    pub fn on(trigger: MessageType) -> Self {
        Self { trigger }
    }
}

impl MessageHandler for FailingHandler {
    fn handle_message(
        &mut self,
        message: &Message,
        _queue: &QueueHandle,
    ) -> Result<(), HandlerError> {
        if message.message_type() == self.trigger {
            return Err(format!("state table rejected {}", message.message_type()).into());
        }
        Ok(())
    }
}
