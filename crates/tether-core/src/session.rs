//! Registration session state machine.
//!
//! Pure state tracking, no I/O: the engine drives the transitions and the
//! machine rejects any out-of-order step. Keeping it separate makes the
//! lifecycle independently testable.
//!
//! ```text
//! Unregistered ──> StreamOpen ──> Registered ──> Active ──> Terminated
//!       │               │              │                        ▲
//!       └───────────────┴──────────────┴────────────────────────┘
//!                    (terminate is legal from any state)
//! ```

/// Lifecycle state of one engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No stream yet.
    Unregistered,
    /// Stream open, REGISTER not yet sent.
    StreamOpen,
    /// REGISTER accepted by the send path.
    Registered,
    /// Dispatch loop running.
    Active,
    /// Stream completed or a fatal error occurred. Absorbing.
    Terminated,
}

/// An out-of-order lifecycle step.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid session transition: {event} from {from:?}")]
pub struct SessionError {
    /// State the session was in.
    pub from: SessionState,
    /// The step that was attempted.
    pub event: &'static str,
}

/// Tracks the lifecycle of one engine run.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// New session in [`SessionState::Unregistered`].
    #[must_use]
    pub fn new() -> Self {
        Self { state: SessionState::Unregistered }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The bidirectional stream was opened.
    pub fn stream_opened(&mut self) -> Result<(), SessionError> {
        self.step(SessionState::Unregistered, SessionState::StreamOpen, "stream_opened")
    }

    /// The REGISTER frame was accepted by the send path.
    pub fn registered(&mut self) -> Result<(), SessionError> {
        self.step(SessionState::StreamOpen, SessionState::Registered, "registered")
    }

    /// The dispatch loop took over.
    pub fn activated(&mut self) -> Result<(), SessionError> {
        self.step(SessionState::Registered, SessionState::Active, "activated")
    }

    /// Stream completion or fatal error. Legal from any state; repeated
    /// calls are no-ops.
    pub fn terminate(&mut self) {
        self.state = SessionState::Terminated;
    }

    fn step(
        &mut self,
        expected: SessionState,
        next: SessionState,
        event: &'static str,
    ) -> Result<(), SessionError> {
        if self.state != expected {
            return Err(SessionError { from: self.state, event });
        }
        self.state = next;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
