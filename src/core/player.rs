//! Per-player state

use crate::core::{CardId, Faction, PlayerId};
use crate::zones::CardZone;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the next purchased card goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquireLocation {
    /// Top of the deck, for one purchase
    Top,
    #[default]
    Discard,
}

/// A base in play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseInstance {
    pub card: CardId,

    /// Damage accumulated so far
    pub damage: u32,

    /// Reset only at the start of the owner's turn
    pub activated_this_turn: bool,
}

impl BaseInstance {
    pub fn new(card: CardId) -> Self {
        BaseInstance {
            card,
            damage: 0,
            activated_this_turn: true,
        }
    }
}

/// Everything the game tracks about one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,

    /// Never negative; reaching 0 eliminates the player
    pub authority: u32,

    pub deck: CardZone,
    pub hand: CardZone,
    pub discard: CardZone,
    pub in_play: CardZone,
    pub bases: Vec<BaseInstance>,

    pub acquire_location: AcquireLocation,

    /// Reset every turn
    pub trade: u32,
    pub combat: u32,

    pub free_next_acquire: bool,

    /// Bonus ally counts per faction, cleared at cleanup
    pub faction_tags: BTreeMap<Faction, u32>,

    pub is_dead: bool,

    /// Finishing rank assigned at elimination; 0 is the winner
    pub elimination_order: Option<u32>,
}

impl PlayerState {
    pub fn new(id: PlayerId, authority: u32) -> Self {
        PlayerState {
            id,
            authority,
            deck: CardZone::new(),
            hand: CardZone::new(),
            discard: CardZone::new(),
            in_play: CardZone::new(),
            bases: Vec::new(),
            acquire_location: AcquireLocation::default(),
            trade: 0,
            combat: 0,
            free_next_acquire: false,
            faction_tags: BTreeMap::new(),
            is_dead: false,
            elimination_order: None,
        }
    }

    pub fn faction_tag(&self, faction: Faction) -> u32 {
        self.faction_tags.get(&faction).copied().unwrap_or(0)
    }

    pub fn has_base(&self, card: &CardId) -> bool {
        self.bases.iter().any(|b| &b.card == card)
    }

    /// Total number of cards this player owns across all personal zones
    pub fn card_count(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len() + self.in_play.len() + self.bases.len()
    }

    /// Every card the player owns, zone by zone
    pub fn all_cards(&self) -> impl Iterator<Item = &CardId> + '_ {
        self.deck
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .chain(self.in_play.iter())
            .chain(self.bases.iter().map(|b| &b.card))
    }
}
