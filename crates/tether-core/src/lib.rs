//! Tether protocol engine.
//!
//! The engine attaches an external smart-contract process to a blockchain
//! peer over one persistent bidirectional stream: it opens the stream,
//! sends the REGISTER frame before any other traffic, then pumps ordered
//! state-transition messages between the peer and an opaque
//! [`MessageHandler`] until the stream closes or a fatal error occurs.
//!
//! # Architecture
//!
//! Two concurrent contexts share one FIFO queue:
//!
//! - the **reader task** decodes inbound frames and enqueues them without
//!   blocking the transport;
//! - the **dispatch loop** blocks on dequeue, invokes the handler, and
//!   conditionally forwards results back to the peer.
//!
//! All outbound writes funnel through a single **writer task** (the serial
//! send discipline), so at most one frame is in flight on the stream at any
//! instant. Shutdown is driven exclusively by stream completion or a fatal
//! error; there is no reconnection — a corrupted in-order stream cannot be
//! resumed without a fresh registration, so the engine tears down once and
//! returns the outcome to its caller.
//!
//! # Components
//!
//! - [`config`]: connection parameters and peer-address parsing
//! - [`transport`]: client-side transport abstraction
//! - [`codec`]: async frame read/write
//! - [`sender`]: serial send discipline
//! - [`dispatch`]: dispatch queue and loop
//! - [`session`]: registration state machine
//! - [`engine`]: wiring and teardown
//! - [`error`]: engine error taxonomy
//! - [`handler`]: the contract-side capability trait

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod handler;
pub mod sender;
pub mod session;
pub mod transport;

pub use config::{Config, ConfigError, DEFAULT_HOST, DEFAULT_PORT};
pub use dispatch::{QueueEntry, QueueHandle};
pub use engine::Engine;
pub use error::{EngineError, HandlerError, StreamError};
pub use handler::MessageHandler;
pub use sender::SerialSender;
pub use session::{Session, SessionState};
pub use transport::Transport;
