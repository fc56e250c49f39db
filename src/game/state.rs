//! Main game state structure
//!
//! `GameState` is a derived snapshot: it is produced by setup once per match
//! and afterwards only by folding events through the reducer.

use crate::core::{CardId, Faction, PlayerId, PlayerState};
use crate::game::{Prompt, TurnState};
use crate::loader::CardRegistry;
use crate::zones::CardZone;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Out-of-band report of damage taken, queued for the defender's client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatNotice {
    pub attacker: PlayerId,
    pub amount: u32,
    /// Set when the damage hit a base rather than the player
    pub base: Option<CardId>,
    pub destroyed: bool,
}

/// Display log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub timestamp: u64,
    pub message: String,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Fixed turn sequence
    pub player_order: Vec<PlayerId>,

    /// Index into `player_order` of the player whose turn it is
    pub active_index: usize,

    pub players: BTreeMap<PlayerId, PlayerState>,

    /// Shared trade row; `None` marks an empty slot awaiting refill
    pub row: Vec<Option<CardId>>,

    pub trade_deck: CardZone,
    pub explorer_deck: CardZone,
    pub scrap_pile: CardZone,

    pub turn: TurnState,

    /// The unresolved prompt, if any
    pub prompt: Option<Prompt>,

    pub log: Vec<LogLine>,

    pub game_over: bool,
    pub winner: Option<PlayerId>,

    /// Damage reports per defender, cleared on acknowledgement
    pub combat_notices: BTreeMap<PlayerId, Vec<CombatNotice>>,
}

impl GameState {
    /// An empty table for the given seating order. Setup fills in the cards.
    pub fn new(player_order: Vec<PlayerId>, starting_authority: u32) -> Self {
        let players = player_order
            .iter()
            .map(|id| (id.clone(), PlayerState::new(id.clone(), starting_authority)))
            .collect();

        GameState {
            player_order,
            active_index: 0,
            players,
            row: Vec::new(),
            trade_deck: CardZone::new(),
            explorer_deck: CardZone::new(),
            scrap_pile: CardZone::new(),
            turn: TurnState::new(),
            prompt: None,
            log: Vec::new(),
            game_over: false,
            winner: None,
            combat_notices: BTreeMap::new(),
        }
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(id)
    }

    pub fn active_player_id(&self) -> Option<&PlayerId> {
        self.player_order.get(self.active_index)
    }

    pub fn active_player(&self) -> Option<&PlayerState> {
        self.active_player_id().and_then(|id| self.players.get(id))
    }

    /// Live players in seating order
    pub fn live_players(&self) -> impl Iterator<Item = &PlayerId> + '_ {
        self.player_order
            .iter()
            .filter(|id| self.players.get(*id).map(|p| !p.is_dead).unwrap_or(false))
    }

    pub fn live_count(&self) -> usize {
        self.live_players().count()
    }

    /// Next live player after the active one, in seating order
    pub fn next_live_index(&self) -> Option<usize> {
        let n = self.player_order.len();
        (1..=n)
            .map(|step| (self.active_index + step) % n)
            .find(|&idx| {
                self.players
                    .get(&self.player_order[idx])
                    .map(|p| !p.is_dead)
                    .unwrap_or(false)
            })
    }

    pub fn pending_prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// Ally counter for `faction`: standing tags plus ships in play plus bases
    pub fn faction_count(&self, player: &PlayerId, faction: Faction, registry: &CardRegistry) -> Result<u32> {
        let Some(p) = self.players.get(player) else {
            return Ok(0);
        };

        let mut count = p.faction_tag(faction);
        for card in p.in_play.iter() {
            if registry.get(card)?.faction == faction {
                count += 1;
            }
        }
        for base in &p.bases {
            if registry.get(&base.card)?.faction == faction {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Cards of `faction` played this turn
    pub fn played_this_turn_of(&self, faction: Faction, registry: &CardRegistry) -> Result<u32> {
        let mut count = 0;
        for card in &self.turn.played_this_turn {
            if registry.get(card)?.faction == faction {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn has_outpost(&self, player: &PlayerId, registry: &CardRegistry) -> Result<bool> {
        let Some(p) = self.players.get(player) else {
            return Ok(false);
        };
        for base in &p.bases {
            if registry.get(&base.card)?.is_outpost() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Every card id in the game, across all zones
    pub fn all_cards(&self) -> Vec<CardId> {
        let mut cards: Vec<CardId> = self
            .players
            .values()
            .flat_map(|p| p.all_cards().cloned())
            .collect();
        cards.extend(self.row.iter().flatten().cloned());
        cards.extend(self.trade_deck.iter().cloned());
        cards.extend(self.explorer_deck.iter().cloned());
        cards.extend(self.scrap_pile.iter().cloned());
        cards
    }

    pub fn card_count(&self) -> usize {
        self.players.values().map(|p| p.card_count()).sum::<usize>()
            + self.row.iter().flatten().count()
            + self.trade_deck.len()
            + self.explorer_deck.len()
            + self.scrap_pile.len()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        self.winner.as_ref()
    }
}
