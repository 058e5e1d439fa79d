//! Wire format: one JSON object per line.

use super::error::TransportError;
use dr_nim_core::{MAX_MARBLES, MatchRules, Move, PassRule, Side, WinRule};
use serde::{Deserialize, Serialize};

/// Version both peers must speak.
pub const PROTOCOL_VERSION: u32 = 1;

/// Messages exchanged between peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    /// Host proposes the match.
    Hello {
        /// Protocol version the host speaks.
        version: u32,
        /// Rules, seen from the host.
        rules: WireRules,
    },
    /// Guest accepts the match.
    Ready,
    /// A move by the sender.
    Move {
        /// The move made.
        kind: Move,
    },
}

impl WireMessage {
    /// Short name of the message type, for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            WireMessage::Hello { .. } => "hello",
            WireMessage::Ready => "ready",
            WireMessage::Move { .. } => "move",
        }
    }
}

/// Match rules as they travel on the wire.
///
/// The opener is named absolutely (host or not) because "local" means
/// something different at each end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRules {
    /// Starting heap size.
    pub marbles: u8,
    /// True when the host opens.
    pub host_first: bool,
    /// Who wins on an empty heap.
    pub win_rule: WinRule,
    /// When passing is legal.
    pub pass_rule: PassRule,
}

impl WireRules {
    /// Encodes the host's rules.
    pub fn from_host(rules: &MatchRules) -> Self {
        Self {
            marbles: rules.marbles,
            host_first: rules.first == Side::Local,
            win_rule: rules.win_rule,
            pass_rule: rules.pass_rule,
        }
    }

    /// Decodes the rules as seen by the guest.
    pub fn for_guest(&self) -> Result<MatchRules, TransportError> {
        if !(1..=MAX_MARBLES).contains(&self.marbles) {
            return Err(TransportError::Handshake(format!(
                "heap of {} marbles is outside 1..={}",
                self.marbles, MAX_MARBLES
            )));
        }

        Ok(MatchRules {
            marbles: self.marbles,
            first: if self.host_first { Side::Remote } else { Side::Local },
            win_rule: self.win_rule,
            pass_rule: self.pass_rule,
        })
    }
}

/// Serializes a message as a single line, without the newline.
pub fn encode(message: &WireMessage) -> Result<String, TransportError> {
    Ok(serde_json::to_string(message)?)
}

/// Parses one received line.
pub fn decode(line: &str) -> Result<WireMessage, TransportError> {
    Ok(serde_json::from_str(line.trim())?)
}
