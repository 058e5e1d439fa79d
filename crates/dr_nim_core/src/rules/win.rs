//! Win determination for an emptied heap.

use crate::types::{GameStatus, Side};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Which side wins when the heap runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WinRule {
    /// Taking the last marble wins.
    #[default]
    Standard,
    /// Taking the last marble loses.
    Misere,
}

impl WinRule {
    /// Outcome of a game whose last marble was taken by `last_mover`.
    #[instrument]
    pub fn outcome(self, last_mover: Side) -> GameStatus {
        match self {
            WinRule::Standard => GameStatus::won_by(last_mover),
            WinRule::Misere => GameStatus::won_by(last_mover.opponent()),
        }
    }

    /// Heap size (modulo 4) the side to move wants to hand to its opponent.
    ///
    /// Positions congruent to this are lost for the side facing them.
    pub fn losing_residue(self) -> u8 {
        match self {
            WinRule::Standard => 0,
            WinRule::Misere => 1,
        }
    }
}
