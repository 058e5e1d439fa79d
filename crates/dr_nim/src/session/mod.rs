//! Game sessions: the turn protocol and the seams to the view.
//!
//! - [`SessionProtocol`] owns the game and consumes the event queue
//! - [`SessionHandle`] is what the view uses to submit intents
//! - [`StateObserver`] is what the view implements to be told what happened

mod error;
mod event;
mod observer;
mod protocol;
mod strategy_player;

pub use error::SessionError;
pub use event::{EventReceiver, SessionEvent, SessionHandle, WeakSessionHandle, channel};
pub use observer::{ChannelObserver, Notification, StateObserver};
pub use protocol::{Opponent, Phase, SessionProtocol};
pub use strategy_player::StrategyPlayer;
