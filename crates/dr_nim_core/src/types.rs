//! Core domain types for Dr. Nim.

use super::action::{Move, Play};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Largest heap the game is played with.
pub const MAX_MARBLES: u8 = 15;

/// One side of the table.
///
/// `Remote` covers both a networked peer and the local computer player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// The player sitting at this process.
    Local,
    /// The opponent: a remote peer or Dr. Nim himself.
    Remote,
}

impl Side {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Local => Side::Remote,
            Side::Remote => Side::Local,
        }
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// The local player won.
    LocalWon,
    /// The opponent won.
    RemoteWon,
}

impl GameStatus {
    /// Status for a game won by `side`.
    pub fn won_by(side: Side) -> Self {
        match side {
            Side::Local => GameStatus::LocalWon,
            Side::Remote => GameStatus::RemoteWon,
        }
    }

    /// Returns true once no further moves are accepted.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }

    /// Returns the winner if there is one.
    pub fn winner(self) -> Option<Side> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::LocalWon => Some(Side::Local),
            GameStatus::RemoteWon => Some(Side::Remote),
        }
    }
}

/// Complete game state.
///
/// Only [`crate::RuleEngine`] mutates a state; everything else reads it.
/// Deserialized states are checked like any other: see [`InvalidState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StateSnapshot")]
pub struct GameState {
    /// Marbles left on the heap.
    marbles: u8,
    /// Side to move.
    turn: Side,
    /// Game status.
    status: GameStatus,
    /// Plays applied so far, oldest first.
    history: Vec<Play>,
}

impl GameState {
    /// Creates a new game with `marbles` on the heap (capped at [`MAX_MARBLES`]).
    ///
    /// An empty heap can never be in progress, so `marbles` is raised to at least one.
    #[instrument]
    pub fn new(marbles: u8, first: Side) -> Self {
        Self {
            marbles: marbles.clamp(1, MAX_MARBLES),
            turn: first,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Creates a full fifteen-marble game.
    pub fn standard(first: Side) -> Self {
        Self::new(MAX_MARBLES, first)
    }

    /// Returns the number of marbles left.
    pub fn marbles(&self) -> u8 {
        self.marbles
    }

    /// Returns the side to move.
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the plays applied so far.
    pub fn history(&self) -> &[Play] {
        &self.history
    }

    /// Returns true once the game has a winner.
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Applies a move (unchecked - use `RuleEngine::validate` for validation).
    pub(crate) fn apply_move(&mut self, side: Side, mv: Move) {
        self.marbles = self.marbles.saturating_sub(mv.taken());
        self.history.push(Play::new(side, mv));
        self.turn = side.opponent();
    }

    /// Sets the game status.
    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }
}

/// Reason a serialized state was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum InvalidState {
    /// More marbles than a game can hold.
    #[display("Heap of {} marbles exceeds {}", _0, MAX_MARBLES)]
    TooManyMarbles(u8),

    /// An empty heap still marked as in progress.
    #[display("Empty heap but the game is still in progress")]
    EmptyHeapInProgress,

    /// A finished game with marbles left.
    #[display("Game is over with {} marbles left", _0)]
    OverWithMarblesLeft(u8),
}

impl std::error::Error for InvalidState {}

/// Unchecked wire form of [`GameState`].
#[derive(Deserialize)]
struct StateSnapshot {
    marbles: u8,
    turn: Side,
    status: GameStatus,
    history: Vec<Play>,
}

impl TryFrom<StateSnapshot> for GameState {
    type Error = InvalidState;

    fn try_from(raw: StateSnapshot) -> Result<Self, Self::Error> {
        if raw.marbles > MAX_MARBLES {
            return Err(InvalidState::TooManyMarbles(raw.marbles));
        }
        match (raw.marbles, raw.status.is_terminal()) {
            (0, false) => return Err(InvalidState::EmptyHeapInProgress),
            (left, true) if left > 0 => return Err(InvalidState::OverWithMarblesLeft(left)),
            _ => {}
        }

        Ok(Self {
            marbles: raw.marbles,
            turn: raw.turn,
            status: raw.status,
            history: raw.history,
        })
    }
}
