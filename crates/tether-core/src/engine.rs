//! Engine: wires transport, tasks, registration, and teardown.

use std::io;

use tokio::{
    io::AsyncRead,
    sync::{mpsc, watch},
    task::{JoinError, JoinHandle},
};

use tether_proto::Message;

use crate::{
    codec,
    config::Config,
    dispatch::{self, QueueEntry, QueueHandle},
    error::{EngineError, StreamError},
    handler::MessageHandler,
    sender::{self, SerialSender},
    session::Session,
    transport::Transport,
};

/// The client engine: one instance drives one connection for the process
/// lifetime.
///
/// [`Engine::run`] resolves with `Ok(())` only when the peer completes the
/// stream gracefully; every fatal condition surfaces as an
/// [`EngineError`]. The engine never terminates the process — the
/// embedding caller decides the exit status.
pub struct Engine<T: Transport> {
    config: Config,
    transport: T,
}

impl<T: Transport> Engine<T> {
    /// Creates an engine over the given transport.
    #[must_use]
    pub fn new(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    /// Connects, registers, and pumps messages until the stream closes or
    /// a fatal error occurs.
    ///
    /// The REGISTER frame carrying the configured identity is the first
    /// frame written after the stream opens; the dispatch loop only starts
    /// once that write is flushed.
    ///
    /// # Errors
    ///
    /// [`EngineError::Registration`] if the stream cannot be opened or the
    /// REGISTER frame cannot be sent; [`EngineError::Stream`] on a
    /// transport or framing fault during the active session;
    /// [`EngineError::Handler`] if the handler rejects a message.
    pub async fn run<H: MessageHandler>(self, mut handler: H) -> Result<(), EngineError> {
        let address = self.config.peer_address();
        let mut session = Session::new();

        tracing::info!(peer = %address, tls = self.config.tls_enabled, "connecting to peer");
        let (send, recv) = self
            .transport
            .connect(&address)
            .await
            .map_err(|e| EngineError::Registration(StreamError::Io(e)))?;
        session.stream_opened()?;

        let (disconnect_tx, mut disconnect_rx) = watch::channel(false);
        let (serial, writer) = sender::spawn(send, disconnect_tx.clone());
        let (queue, mut entries) = dispatch::queue();
        let reader = spawn_reader(recv, queue.clone(), disconnect_tx.clone());

        let loop_result = establish_and_dispatch(
            &mut session,
            &self.config,
            &serial,
            &queue,
            &mut entries,
            &mut handler,
            &mut disconnect_rx,
        )
        .await;
        session.terminate();

        // Single teardown path, reached exactly once per run: dropping the
        // serial sender lets the writer drain and exit, and dropping the
        // stream halves with the tasks closes the channel.
        drop(serial);
        reader.abort();
        let stream_fault = task_fault(reader.await).or(task_fault(writer.await));

        match loop_result {
            // the loop's own view of a send failure is just "closed"; the
            // writer task holds the root cause
            Err(EngineError::Stream(seen)) => {
                Err(EngineError::Stream(stream_fault.unwrap_or(seen)))
            }
            Err(other) => Err(other),
            Ok(()) => match stream_fault {
                Some(fault) => Err(EngineError::Stream(fault)),
                None => {
                    tracing::info!("session ended: stream completed");
                    Ok(())
                }
            },
        }
    }
}

/// Registration handshake plus dispatch loop; split out so the caller owns
/// the one teardown path regardless of where this returns.
async fn establish_and_dispatch<H: MessageHandler>(
    session: &mut Session,
    config: &Config,
    serial: &SerialSender,
    queue: &QueueHandle,
    entries: &mut mpsc::UnboundedReceiver<QueueEntry>,
    handler: &mut H,
    disconnect: &mut watch::Receiver<bool>,
) -> Result<(), EngineError> {
    tracing::info!(identity = %config.identity, "registering with peer");
    serial
        .send(Message::register(&config.identity))
        .await
        .map_err(EngineError::Registration)?;
    session.registered()?;

    session.activated()?;
    tracing::debug!("registration frame flushed, entering dispatch loop");
    dispatch::run(entries, queue, handler, serial, disconnect).await.map(|_| ())
}

/// Spawns the reader task: decode inbound frames and enqueue them without
/// blocking the transport. Clean EOF is stream completion; both EOF and
/// errors raise the disconnect signal.
fn spawn_reader<R>(
    recv: R,
    queue: QueueHandle,
    disconnect: watch::Sender<bool>,
) -> JoinHandle<Result<(), StreamError>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut recv = recv;
        let result = loop {
            match codec::read_message(&mut recv).await {
                Ok(Some(message)) => {
                    tracing::debug!(
                        txid = message.short_txid(),
                        message_type = %message.message_type(),
                        "received message from peer"
                    );
                    if queue.enqueue(QueueEntry::inbound(message)).is_err() {
                        break Ok(());
                    }
                }
                Ok(None) => {
                    tracing::info!("peer completed the stream");
                    break Ok(());
                }
                Err(err) => {
                    tracing::error!(error = %err, "stream read failed");
                    break Err(err);
                }
            }
        };
        let _ = disconnect.send(true);
        result
    })
}

/// Extracts the fault, if any, from a finished engine task. Cancellation
/// is not a fault: the engine aborts the reader when the loop exits first.
fn task_fault(result: Result<Result<(), StreamError>, JoinError>) -> Option<StreamError> {
    match result {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(err),
        Err(join_err) if join_err.is_cancelled() => None,
        Err(join_err) => Some(StreamError::Io(io::Error::other(join_err))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncRead, AsyncWrite, DuplexStream};

    use tether_proto::MessageType;

    use crate::error::HandlerError;

    use super::*;

    /// Hands out one pre-built duplex stream; connecting twice is a test
    /// bug.
    struct DuplexTransport {
        stream: Mutex<Option<DuplexStream>>,
    }

    impl DuplexTransport {
        fn new(stream: DuplexStream) -> Self {
            Self { stream: Mutex::new(Some(stream)) }
        }
    }

    #[async_trait::async_trait]
    impl Transport for DuplexTransport {
        type SendStream = tokio::io::WriteHalf<DuplexStream>;
        type RecvStream = tokio::io::ReadHalf<DuplexStream>;

        async fn connect(
            &self,
            _address: &str,
        ) -> io::Result<(Self::SendStream, Self::RecvStream)> {
            let stream = self
                .stream
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| io::Error::other("transport already used"))?;
            let (recv, send) = tokio::io::split(stream);
            Ok((send, recv))
        }
    }

    /// Always-failing transport for the registration-failure path.
    struct UnreachableTransport;

    #[async_trait::async_trait]
    impl Transport for UnreachableTransport {
        type SendStream = Box<dyn AsyncWrite + Unpin + Send>;
        type RecvStream = Box<dyn AsyncRead + Unpin + Send>;

        async fn connect(
            &self,
            _address: &str,
        ) -> io::Result<(Self::SendStream, Self::RecvStream)> {
            Err(io::Error::new(io::ErrorKind::ConnectionRefused, "no peer"))
        }
    }

    #[derive(Clone, Default)]
    struct SharedRecordingHandler {
        seen: Arc<Mutex<Vec<MessageType>>>,
    }

    impl MessageHandler for SharedRecordingHandler {
        fn handle_message(
            &mut self,
            message: &Message,
            _queue: &QueueHandle,
        ) -> Result<(), HandlerError> {
            self.seen.lock().unwrap().push(message.message_type());
            Ok(())
        }
    }

    #[tokio::test]
    async fn register_is_the_first_frame_and_completion_ends_the_run() {
        let (client_side, mut peer_side) = tokio::io::duplex(64 * 1024);
        let engine = Engine::new(Config::new("mycc"), DuplexTransport::new(client_side));
        let handler = SharedRecordingHandler::default();
        let seen = handler.seen.clone();

        let run = tokio::spawn(engine.run(handler));

        let first = codec::read_message(&mut peer_side).await.unwrap().unwrap();
        assert_eq!(first.message_type(), MessageType::Register);
        assert_eq!(first.payload(), b"mycc");

        // registered; drive one keepalive round-trip, then complete
        codec::write_message(&mut peer_side, &Message::keepalive()).await.unwrap();
        let echoed = codec::read_message(&mut peer_side).await.unwrap().unwrap();
        assert_eq!(echoed.message_type(), MessageType::Keepalive);

        drop(peer_side);
        run.await.unwrap().unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![MessageType::Keepalive]);
    }

    #[tokio::test]
    async fn connect_failure_is_a_registration_error() {
        let engine = Engine::new(Config::new("mycc"), UnreachableTransport);
        let result = engine.run(SharedRecordingHandler::default()).await;
        assert!(matches!(result, Err(EngineError::Registration(StreamError::Io(_)))));
    }

    #[tokio::test]
    async fn garbage_frame_fails_the_stream() {
        let (client_side, mut peer_side) = tokio::io::duplex(64 * 1024);
        let engine = Engine::new(Config::new("mycc"), DuplexTransport::new(client_side));

        let run = tokio::spawn(engine.run(SharedRecordingHandler::default()));

        let register = codec::read_message(&mut peer_side).await.unwrap().unwrap();
        assert_eq!(register.message_type(), MessageType::Register);

        tokio::io::AsyncWriteExt::write_all(&mut peer_side, &[0xFFu8; 16]).await.unwrap();

        let result = run.await.unwrap();
        assert!(matches!(result, Err(EngineError::Stream(StreamError::Protocol(_)))));
    }

    #[tokio::test]
    async fn handler_error_fails_the_run() {
        struct FailingHandler;

        impl MessageHandler for FailingHandler {
            fn handle_message(
                &mut self,
                _message: &Message,
                _queue: &QueueHandle,
            ) -> Result<(), HandlerError> {
                Err("state table rejected message".into())
            }
        }

        let (client_side, mut peer_side) = tokio::io::duplex(64 * 1024);
        let engine = Engine::new(Config::new("mycc"), DuplexTransport::new(client_side));

        let run = tokio::spawn(engine.run(FailingHandler));

        let register = codec::read_message(&mut peer_side).await.unwrap().unwrap();
        assert_eq!(register.message_type(), MessageType::Register);

        codec::write_message(&mut peer_side, &Message::keepalive()).await.unwrap();

        let result = run.await.unwrap();
        assert!(matches!(result, Err(EngineError::Handler { .. })));
    }
}
