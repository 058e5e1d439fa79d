//! Dr. Nim game logic.
//!
//! A single heap of up to fifteen marbles; players alternately take one,
//! two or three. This crate holds the pure parts of the game:
//!
//! - **State**: [`GameState`], the heap, the side to move and the status
//! - **Rules**: [`RuleEngine`], move validation and win determination
//! - **Strategy**: [`OptimalStrategy`], Dr. Nim's counter-moves
//!
//! Nothing here does I/O; sessions and networking live in `dr_nim`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod rules;
mod strategy;
mod types;

pub use action::{Move, Play};
pub use rules::{MatchRules, PassRule, Rejection, RuleEngine, WinRule};
pub use strategy::{OpponentStrategy, OptimalStrategy};
pub use types::{GameState, GameStatus, InvalidState, MAX_MARBLES, Side};
