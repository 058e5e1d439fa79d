//! Line-oriented connection to the peer.

use super::error::TransportError;
use super::wire::{self, WireMessage};
use dr_nim_core::Move;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpStream;
use tracing::{debug, info, instrument};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Longest line a peer may send, newline excluded.
pub const MAX_LINE_BYTES: usize = 1024;

/// Receiving half of a peer link.
pub struct PeerReader {
    inner: BufReader<BoxedReader>,
}

impl PeerReader {
    /// Waits for the next message from the peer.
    ///
    /// A line longer than [`MAX_LINE_BYTES`] is malformed.
    pub async fn recv(&mut self) -> Result<WireMessage, TransportError> {
        let mut buf = Vec::new();
        let read = (&mut self.inner)
            .take(MAX_LINE_BYTES as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await?;
        if read == 0 {
            return Err(TransportError::Closed);
        }
        if buf.last() != Some(&b'\n') && buf.len() > MAX_LINE_BYTES {
            return Err(TransportError::Malformed(format!(
                "line longer than {} bytes",
                MAX_LINE_BYTES
            )));
        }

        let line = std::str::from_utf8(&buf)
            .map_err(|err| TransportError::Malformed(err.to_string()))?;
        debug!(line = line.trim_end(), "Received line");
        wire::decode(line)
    }

    /// Waits for the peer's next move.
    pub async fn recv_move(&mut self) -> Result<Move, TransportError> {
        match self.recv().await? {
            WireMessage::Move { kind } => Ok(kind),
            other => Err(TransportError::Malformed(format!(
                "expected a move, got {}",
                other.name()
            ))),
        }
    }
}

impl std::fmt::Debug for PeerReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerReader").finish_non_exhaustive()
    }
}

/// Sending half of a peer link.
pub struct PeerWriter {
    inner: BoxedWriter,
}

impl PeerWriter {
    /// Sends one message and flushes it.
    pub async fn send(&mut self, message: &WireMessage) -> Result<(), TransportError> {
        let mut line = wire::encode(message)?;
        debug!(%line, "Sending line");
        line.push('\n');
        self.inner.write_all(line.as_bytes()).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Sends one of our moves.
    pub async fn send_move(&mut self, mv: Move) -> Result<(), TransportError> {
        self.send(&WireMessage::Move { kind: mv }).await
    }
}

impl std::fmt::Debug for PeerWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerWriter").finish_non_exhaustive()
    }
}

/// A bidirectional link to the peer.
#[derive(Debug)]
pub struct PeerLink {
    reader: PeerReader,
    writer: PeerWriter,
    peer: String,
}

impl PeerLink {
    /// Wraps any byte stream halves.
    pub fn new(
        reader: impl AsyncRead + Send + Unpin + 'static,
        writer: impl AsyncWrite + Send + Unpin + 'static,
        peer: impl Into<String>,
    ) -> Self {
        let reader: BoxedReader = Box::new(reader);
        let writer: BoxedWriter = Box::new(writer);
        Self {
            reader: PeerReader {
                inner: BufReader::new(reader),
            },
            writer: PeerWriter { inner: writer },
            peer: peer.into(),
        }
    }

    /// Wraps an accepted or connected TCP stream.
    #[instrument(skip(stream))]
    pub fn from_tcp(stream: TcpStream) -> Result<Self, TransportError> {
        let peer = stream.peer_addr()?.to_string();
        stream.set_nodelay(true)?;
        let (reader, writer) = stream.into_split();
        info!(%peer, "Peer link established");
        Ok(Self::new(reader, writer, peer))
    }

    /// Connects to a hosting peer.
    #[instrument]
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr).await?;
        Self::from_tcp(stream)
    }

    /// Creates two in-memory links wired to each other.
    pub fn pair() -> (Self, Self) {
        let (a, b) = tokio::io::duplex(4096);
        let (a_read, a_write) = tokio::io::split(a);
        let (b_read, b_write) = tokio::io::split(b);
        (
            Self::new(a_read, a_write, "memory:a"),
            Self::new(b_read, b_write, "memory:b"),
        )
    }

    /// Returns the peer's address.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Sends one message.
    pub async fn send(&mut self, message: &WireMessage) -> Result<(), TransportError> {
        self.writer.send(message).await
    }

    /// Waits for the next message.
    pub async fn recv(&mut self) -> Result<WireMessage, TransportError> {
        self.reader.recv().await
    }

    /// Splits the link into its halves.
    pub fn split(self) -> (PeerReader, PeerWriter) {
        (self.reader, self.writer)
    }
}
