//! When a player may pass instead of taking marbles.

use crate::types::GameState;
use serde::{Deserialize, Serialize};

/// Legality of [`crate::Move::Pass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PassRule {
    /// Passing is never legal.
    ///
    /// With takes of 1..=3 some take is always legal while marbles remain,
    /// and an empty heap already ends the game.
    #[default]
    Never,
    /// Passing is legal only as the very first play, handing the opening
    /// move to the other side.
    Opening,
}

impl PassRule {
    /// Returns true if the side to move may pass in `state`.
    pub fn permits(self, state: &GameState) -> bool {
        match self {
            PassRule::Never => false,
            PassRule::Opening => state.history().is_empty(),
        }
    }
}
