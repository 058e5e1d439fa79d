//! Transport error types.

use std::time::Duration;

/// Anything that goes wrong on the link to the peer.
///
/// Every variant is fatal for the session; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum TransportError {
    /// The underlying stream failed.
    #[display("I/O error: {}", _0)]
    Io(String),

    /// The peer closed the connection.
    #[display("Connection closed by peer")]
    Closed,

    /// The peer sent something that is not a protocol message.
    #[display("Malformed message: {}", _0)]
    Malformed(String),

    /// The peer went quiet for too long.
    #[display("No word from peer for {:?}", _0)]
    Timeout(Duration),

    /// The peers could not agree on a match.
    #[display("Handshake failed: {}", _0)]
    Handshake(String),

    /// The peer sent a move the rules do not allow.
    #[display("Peer sent an illegal move: {}", _0)]
    IllegalMove(String),

    /// The peer moved while it was not its turn.
    #[display("Peer moved out of turn")]
    OutOfTurn,
}

impl std::error::Error for TransportError {}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe => Self::Closed,
            _ => Self::Io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
