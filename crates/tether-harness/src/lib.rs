//! Deterministic simulation harness for the Tether engine.
//!
//! Turmoil-based transport and a scripted in-sim peer for reproducible
//! engine tests: registration ordering, keepalive echo, forward semantics,
//! and teardown under stream completion or faults.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod handlers;
pub mod sim_peer;
pub mod sim_transport;

pub use handlers::{FailingHandler, RecordingHandler, RespondingHandler};
pub use sim_peer::{PeerSession, SimPeer};
pub use sim_transport::SimTransport;
