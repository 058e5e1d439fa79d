//! Dr. Nim sessions.
//!
//! Plays the Dr. Nim marble game against the computer or against a peer
//! over TCP.
//!
//! # Architecture
//!
//! - **Session**: the turn protocol, its event queue and the view seams
//! - **Transport**: JSON lines to the peer, plus the opening handshake
//! - **Server**: Dr. Nim taking on networked challengers
//! - **Console**: a text front-end for the local player
//!
//! # Example
//!
//! ```no_run
//! use dr_nim::session::{self, ChannelObserver, Opponent, SessionProtocol};
//! use dr_nim_core::{MatchRules, OptimalStrategy};
//!
//! # async fn example() -> Result<(), dr_nim::session::SessionError> {
//! let (handle, events) = session::channel();
//! let (observer, _notifications) = ChannelObserver::new();
//! let mut protocol = SessionProtocol::new(
//!     MatchRules::default(),
//!     Opponent::Computer(Box::new(OptimalStrategy::default())),
//!     Box::new(observer),
//!     handle.clone(),
//!     events,
//! );
//!
//! handle.take_three()?;
//! let status = protocol.run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod console;
pub mod server;
pub mod session;
pub mod transport;

pub use config::{ConfigError, GameConfig};
pub use session::{SessionError, SessionHandle, SessionProtocol};
pub use transport::{PeerLink, TransportError};
