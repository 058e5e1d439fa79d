//! Peer transport: JSON lines over a byte stream.

mod error;
pub mod handshake;
mod link;
mod wire;

pub use error::TransportError;
pub use link::{MAX_LINE_BYTES, PeerLink, PeerReader, PeerWriter};
pub use wire::{PROTOCOL_VERSION, WireMessage, WireRules, decode, encode};
