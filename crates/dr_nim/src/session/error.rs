//! Session error types.

use crate::transport::TransportError;

/// Why a session could not go on.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// The link to the peer failed.
    #[display("Transport failure: {}", _0)]
    Transport(TransportError),

    /// The session is gone and no longer takes intents.
    #[display("Session is closed")]
    Closed,
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Transport(err) => Some(err),
            SessionError::Closed => None,
        }
    }
}

impl From<TransportError> for SessionError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}
