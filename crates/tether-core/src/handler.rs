//! The contract-side handler capability.

use tether_proto::Message;

use crate::{dispatch::QueueHandle, error::HandlerError};

/// The opaque state-transition capability supplied by the contract
/// runtime.
///
/// The engine owns invocation: the handler runs on the dispatch-loop task,
/// one message at a time, in arrival order. It may mutate its own state and
/// may enqueue follow-up messages through `queue`; entries enqueued with
/// `forward = true` are written back to the peer after the loop has handled
/// them.
///
/// Any error returned here is fatal for the engine run.
pub trait MessageHandler: Send + 'static {
    /// Processes one inbound or loop-generated message.
    fn handle_message(
        &mut self,
        message: &Message,
        queue: &QueueHandle,
    ) -> Result<(), HandlerError>;
}
