//! First-class move types for Dr. Nim.
//!
//! Moves are intents, not side effects: they come from the view, the
//! computer strategy or the wire, and are validated by the rule engine
//! before they touch a [`crate::GameState`].

use super::types::Side;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// A single move on the heap.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Move {
    /// Take one marble.
    #[display("take 1")]
    #[strum(serialize = "1", serialize = "one")]
    TakeOne,
    /// Take two marbles.
    #[display("take 2")]
    #[strum(serialize = "2", serialize = "two")]
    TakeTwo,
    /// Take three marbles.
    #[display("take 3")]
    #[strum(serialize = "3", serialize = "three")]
    TakeThree,
    /// Take nothing and hand the turn over.
    #[display("pass")]
    #[strum(serialize = "p", serialize = "pass")]
    Pass,
}

impl Move {
    /// Returns the take of exactly `count` marbles, if one exists.
    pub fn take(count: u8) -> Option<Self> {
        match count {
            1 => Some(Move::TakeOne),
            2 => Some(Move::TakeTwo),
            3 => Some(Move::TakeThree),
            _ => None,
        }
    }

    /// Number of marbles this move removes from the heap.
    pub fn taken(self) -> u8 {
        match self {
            Move::TakeOne => 1,
            Move::TakeTwo => 2,
            Move::TakeThree => 3,
            Move::Pass => 0,
        }
    }

    /// Returns true for the pass move.
    pub fn is_pass(self) -> bool {
        matches!(self, Move::Pass)
    }
}

/// A move attributed to the side that made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Play {
    /// The side that moved.
    pub side: Side,
    /// The move that was made.
    pub mv: Move,
}

impl std::fmt::Display for Play {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.side, self.mv)
    }
}
