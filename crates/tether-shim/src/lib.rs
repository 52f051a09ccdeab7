//! Production edge of the Tether engine.
//!
//! A contract binary hands [`start`] its CLI arguments, a default identity,
//! and its [`MessageHandler`] implementation; the shim resolves the flags,
//! builds the (optionally TLS) channel, and runs the engine until the peer
//! completes the stream or a fatal error occurs.
//!
//! The shim never terminates the process. `start` returns `Ok(())` only on
//! graceful stream completion; the embedding binary decides the exit
//! status:
//!
//! ```no_run
//! use tether_core::{HandlerError, MessageHandler, QueueHandle};
//! use tether_proto::Message;
//!
//! struct MyContract;
//!
//! impl MessageHandler for MyContract {
//!     fn handle_message(
//!         &mut self,
//!         _message: &Message,
//!         _queue: &QueueHandle,
//!     ) -> Result<(), HandlerError> {
//!         // contract state table goes here
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     tether_shim::init_logging();
//!     if let Err(err) = tether_shim::start(std::env::args(), "mycc", MyContract).await {
//!         tracing::error!(error = %err, "shim terminated");
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod config;
pub mod tls;
pub mod transport;

use std::ffi::OsString;

use tether_core::{Engine, EngineError, MessageHandler};

pub use tls::ChannelSetupError;
pub use transport::TcpTransport;

/// Fatal outcome of a shim run.
#[derive(Debug, thiserror::Error)]
pub enum ShimError {
    /// The secure channel could not be built.
    #[error(transparent)]
    ChannelSetup(#[from] ChannelSetupError),

    /// The engine run failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Resolves CLI flags, builds the channel, and runs the engine.
///
/// `args` is the full argument vector including the program name (pass
/// `std::env::args()` straight through). Flag parse failures are logged
/// and recovered with defaults; everything after configuration is
/// fail-fast.
///
/// # Errors
///
/// Returns [`ShimError::ChannelSetup`] if TLS is enabled and the trust
/// anchor or authority is unusable, or [`ShimError::Engine`] for any fatal
/// engine condition.
pub async fn start<H, I, S>(args: I, default_identity: &str, handler: H) -> Result<(), ShimError>
where
    H: MessageHandler,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let config = config::resolve(args, default_identity);
    let transport = TcpTransport::from_config(&config)?;
    let engine = Engine::new(config, transport);
    engine.run(handler).await.map_err(ShimError::from)
}

/// Installs an env-filtered `tracing` subscriber (`RUST_LOG`, default
/// `info`). Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
