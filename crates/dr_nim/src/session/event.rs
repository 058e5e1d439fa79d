//! The session's single inbound queue.
//!
//! Local intents, the peer's moves, the computer's moves and link failures
//! all arrive here, so the protocol handles exactly one of them at a time.

use super::error::SessionError;
use crate::transport::TransportError;
use dr_nim_core::Move;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Events processed by the session protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The local player wants to make a move.
    Local(Move),
    /// The opponent made a move.
    Remote(Move),
    /// The link to the peer failed.
    TransportFailed(TransportError),
    /// The local player left the table.
    Quit,
}

/// Receiving end of the session queue, owned by the protocol.
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Creates a session queue.
pub fn channel() -> (SessionHandle, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SessionHandle { tx }, rx)
}

/// Capability to submit intents to a running session.
///
/// Handed to the view at construction. Every call fails with
/// [`SessionError::Closed`] once the session has ended.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Takes one marble.
    pub fn take_one(&self) -> Result<(), SessionError> {
        self.submit(Move::TakeOne)
    }

    /// Takes two marbles.
    pub fn take_two(&self) -> Result<(), SessionError> {
        self.submit(Move::TakeTwo)
    }

    /// Takes three marbles.
    pub fn take_three(&self) -> Result<(), SessionError> {
        self.submit(Move::TakeThree)
    }

    /// Passes.
    pub fn take_pass(&self) -> Result<(), SessionError> {
        self.submit(Move::Pass)
    }

    /// Submits any local move.
    #[instrument(skip(self))]
    pub fn submit(&self, mv: Move) -> Result<(), SessionError> {
        self.enqueue(SessionEvent::Local(mv))
    }

    /// Leaves the table.
    pub fn quit(&self) -> Result<(), SessionError> {
        debug!("Quit requested");
        self.enqueue(SessionEvent::Quit)
    }

    /// Returns true once the session has ended.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Returns a handle that does not keep the session alive.
    pub fn downgrade(&self) -> WeakSessionHandle {
        WeakSessionHandle {
            tx: self.tx.downgrade(),
        }
    }

    pub(crate) fn enqueue(&self, event: SessionEvent) -> Result<(), SessionError> {
        self.tx.send(event).map_err(|_| SessionError::Closed)
    }
}

/// Non-owning [`SessionHandle`].
///
/// Once every [`SessionHandle`] is gone the queue closes, even while weak
/// handles remain.
#[derive(Debug, Clone)]
pub struct WeakSessionHandle {
    tx: mpsc::WeakUnboundedSender<SessionEvent>,
}

impl WeakSessionHandle {
    /// Returns a usable handle if the queue is still open.
    pub fn upgrade(&self) -> Option<SessionHandle> {
        self.tx.upgrade().map(|tx| SessionHandle { tx })
    }
}
