//! Saved matches
//!
//! A snapshot is the setup state plus the fully expanded event log. Loading
//! one never re-runs rules: the current state is `replay(base, events)`.
//! The shuffler's RNG state is saved alongside so a resumed match keeps
//! drawing the same reshuffles it would have without the save.

use crate::config::GameConfig;
use crate::events::EventLog;
use crate::game::engine::{replay, Materialized};
use crate::game::{active_prompt, GameState, Prompt, SeededShuffler};
use crate::loader::CardRegistry;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// State produced by setup, before any event
    pub base: GameState,

    /// Expanded log of applied events, roots and cascades, in fold order
    pub events: EventLog,

    #[serde(default)]
    pub config: GameConfig,

    /// Shuffler to resume with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffler: Option<SeededShuffler>,
}

impl GameSnapshot {
    pub fn new(base: GameState, config: GameConfig) -> Self {
        GameSnapshot {
            base,
            events: EventLog::new(),
            config,
            shuffler: None,
        }
    }

    pub fn with_shuffler(mut self, shuffler: SeededShuffler) -> Self {
        self.shuffler = Some(shuffler);
        self
    }

    /// Record the output of a `materialize` call
    pub fn append(&mut self, materialized: &Materialized) {
        self.events.extend(materialized.events.iter().cloned());
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Current state by pure replay
    pub fn current_state(&self, registry: &CardRegistry) -> crate::Result<GameState> {
        replay(&self.base, self.events.events(), registry)
    }

    /// The decision the log is waiting on, read off the log alone
    pub fn pending_prompt(&self) -> Option<Prompt> {
        active_prompt(self.events.events())
    }

    /// Check that every card in the base state resolves in `registry`
    pub fn validate(&self, registry: &CardRegistry) -> Result<(), SnapshotError> {
        for card in self.base.all_cards() {
            if !registry.contains(&card) {
                return Err(SnapshotError::InvalidState(format!("unknown card {card}")));
            }
        }
        for event in self.events.events() {
            if let Some(player) = event.action.player() {
                if !self.base.players.contains_key(player) {
                    return Err(SnapshotError::InvalidState(format!("unknown player {player}")));
                }
            }
        }
        Ok(())
    }

    /// Save this snapshot to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        std::fs::write(path.as_ref(), json).map_err(|e| SnapshotError::Io(e.to_string()))?;

        Ok(())
    }

    /// Load a snapshot from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| SnapshotError::Io(e.to_string()))?;

        let snapshot = serde_json::from_str(&json).map_err(|e| SnapshotError::Deserialization(e.to_string()))?;

        Ok(snapshot)
    }
}

/// Errors that can occur during snapshot operations
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to serialize snapshot: {0}")]
    Serialization(String),

    #[error("Failed to deserialize snapshot: {0}")]
    Deserialization(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid snapshot state: {0}")]
    InvalidState(String),
}
