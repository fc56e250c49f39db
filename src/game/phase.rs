//! Turn phases

use crate::core::CardId;
use serde::{Deserialize, Serialize};

/// Phases of a turn
///
/// Everything a player does happens in `Main`. Entering `Cleanup` resolves the
/// whole turn handoff and reopens `Main` for the next player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Main,
    Cleanup,
}

/// Represents the current turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Current turn number (starts at 1)
    pub turn_number: u32,

    pub phase: Phase,

    /// Every ship and base played this turn, in play order
    pub played_this_turn: Vec<CardId>,
}

impl TurnState {
    pub fn new() -> Self {
        TurnState {
            turn_number: 1,
            phase: Phase::Main,
            played_this_turn: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_state() {
        let turn = TurnState::new();
        assert_eq!(turn.turn_number, 1);
        assert_eq!(turn.phase, Phase::Main);
        assert!(turn.played_this_turn.is_empty());
    }

    #[test]
    fn test_phase_wire_names() {
        assert_eq!(serde_json::to_string(&Phase::Main).unwrap(), "\"MAIN\"");
        assert_eq!(serde_json::to_string(&Phase::Cleanup).unwrap(), "\"CLEANUP\"");
    }
}
