//! Prompt state machine
//!
//! A prompt becomes pending when a `PromptShown` event is applied and stays
//! pending until a resolving event for its kind appears later in the log.
//! Only the most recent `PromptShown` can be active: showing a new prompt
//! replaces whatever was pending.

use crate::core::{CardId, PlayerId, PromptKind};
use crate::events::{GameAction, GameEvent};
use crate::game::Phase;
use crate::zones::Zone;
use serde::{Deserialize, Serialize};

/// A paused decision point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Player who raised the prompt
    pub player: PlayerId,
    pub kind: PromptKind,
    /// Optional prompts can be skipped with `PromptCancelled`
    pub optional: bool,
    /// Card whose ability raised the prompt
    pub source: Option<CardId>,
}

impl Prompt {
    pub fn from_action(action: &GameAction) -> Option<Prompt> {
        match action {
            GameAction::PromptShown {
                player,
                kind,
                optional,
                source,
            } => Some(Prompt {
                player: player.clone(),
                kind: *kind,
                optional: *optional,
                source: source.clone(),
            }),
            _ => None,
        }
    }

    /// Does `action` close this prompt?
    pub fn is_resolved_by(&self, action: &GameAction) -> bool {
        if let GameAction::PromptCancelled { player } = action {
            return self.optional && *player == self.player;
        }
        self.is_answered_by(action)
    }

    fn is_answered_by(&self, action: &GameAction) -> bool {
        match (self.kind, action) {
            (PromptKind::ScrapSelf, GameAction::CardScrapped { player, zone, .. }) => {
                *player == self.player && matches!(zone, Zone::InPlay | Zone::Bases)
            }
            (PromptKind::ScrapFromTradeRow, GameAction::CardScrapped { player, zone, .. }) => {
                *player == self.player && *zone == Zone::Row
            }
            (PromptKind::ScrapFromHandOrDiscard, GameAction::CardScrapped { player, zone, .. }) => {
                *player == self.player && matches!(zone, Zone::Hand | Zone::Discard)
            }
            (PromptKind::ScrapFromHand, GameAction::CardScrapped { player, zone, .. }) => {
                *player == self.player && *zone == Zone::Hand
            }
            (PromptKind::DestroyBase, GameAction::BaseChosenToDestroy { player, .. }) => *player == self.player,
            (PromptKind::CopyShip, GameAction::TargetCardChosen { player, .. }) => *player == self.player,
            // Answered by whichever opponent discards
            (PromptKind::OpponentDiscards, GameAction::CardDiscarded { player, .. }) => *player != self.player,
            (
                PromptKind::DiscardOrScrapAndDraw { action: wanted, .. },
                GameAction::DiscardOrScrapAndDrawResolved { player, action, .. },
            ) => *player == self.player && *action == wanted,
            _ => false,
        }
    }

    /// A pending mandatory prompt stops its owner from taking new turn actions
    pub fn blocks(&self, action: &GameAction, active_player: Option<&PlayerId>) -> bool {
        if self.optional {
            return false;
        }
        match action {
            GameAction::CardPlayed { player, .. }
            | GameAction::BasePlayed { player, .. }
            | GameAction::BaseActivated { player, .. }
            | GameAction::CardPurchased { player, .. } => *player == self.player,
            GameAction::PhaseChanged { phase: Phase::Cleanup } => active_player == Some(&self.player),
            _ => false,
        }
    }
}

/// The unresolved prompt at the end of `events`, if any
///
/// Scans backward for the most recent `PromptShown` and checks whether any
/// later event resolves it. Agrees with `GameState::prompt` after folding the
/// same log.
pub fn active_prompt(events: &[GameEvent]) -> Option<Prompt> {
    let (pos, prompt) = events
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, e)| Prompt::from_action(&e.action).map(|p| (i, p)))?;

    let resolved = events[pos + 1..]
        .iter()
        .any(|e| prompt.is_resolved_by(&e.action));

    if resolved {
        None
    } else {
        Some(prompt)
    }
}
