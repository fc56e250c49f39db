//! Card abilities and the closed effect set
//!
//! An ability is a trigger plus an ordered effect list. Effects are applied
//! strictly in list order and each one expands into a fixed follow-up event
//! kind (see `game::rules`).

use crate::core::Faction;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// When an ability fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Card played from hand (or a base activated)
    OnPlay,
    /// Card played while another card of its faction is in play
    OnAlly,
    /// Card moved to the scrap pile
    OnScrap,
}

/// Whether a discard-then-draw batch discards or scraps the chosen cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardOrScrap {
    Discard,
    Scrap,
}

/// The decision a prompt asks for. Each kind has exactly one family of
/// resolving events (see `game::prompt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptKind {
    /// Scrap the card that raised the prompt from play
    ScrapSelf,
    ScrapFromTradeRow,
    ScrapFromHandOrDiscard,
    ScrapFromHand,
    /// Destroy any opponent base, ignoring outposts
    DestroyBase,
    /// Replay the on-play abilities of another ship played this turn
    CopyShip,
    /// An opponent must discard a card from hand
    OpponentDiscards,
    /// Choose up to `max_cards` hand cards to discard or scrap, then draw that many
    DiscardOrScrapAndDraw { action: DiscardOrScrap, max_cards: u32 },
}

/// A single card effect
///
/// Every variant carries its own typed payload; nothing is shape-cast at
/// resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    AddTrade { amount: i32 },
    AddCombat { amount: i32 },
    AddAuthority { amount: i32 },
    DrawCards { amount: u32 },
    /// Marks the ability as player-activated by scrapping the card itself
    ScrapSelf,
    /// Next acquired card goes on top of the deck
    NextAcquireTop,
    /// Next acquired card costs nothing
    NextAcquireFree,
    /// Draw `amount` cards if the player has two or more bases
    MultiBaseCondition { amount: u32 },
    /// Count as an ally for every faction for the rest of the turn
    AddAllFactionTags,
    /// Scrap up to `max_cards` from hand, then draw that many
    ScrapAndDraw { max_cards: u32 },
    /// Draw a card for each card of `faction` played this turn
    DrawPerFactionPlayed { faction: Faction },
    Prompt { kind: PromptKind, optional: bool },
}

impl Effect {
    pub fn trade(amount: i32) -> Self {
        Effect::AddTrade { amount }
    }

    pub fn combat(amount: i32) -> Self {
        Effect::AddCombat { amount }
    }

    pub fn authority(amount: i32) -> Self {
        Effect::AddAuthority { amount }
    }

    pub fn draw(amount: u32) -> Self {
        Effect::DrawCards { amount }
    }

    pub fn may(kind: PromptKind) -> Self {
        Effect::Prompt {
            kind,
            optional: true,
        }
    }

    pub fn must(kind: PromptKind) -> Self {
        Effect::Prompt {
            kind,
            optional: false,
        }
    }

    pub fn is_prompt(&self) -> bool {
        matches!(self, Effect::Prompt { .. })
    }
}

/// A triggered ability with its ordered effects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub trigger: Trigger,
    pub effects: SmallVec<[Effect; 4]>,
}

impl Ability {
    pub fn new(trigger: Trigger, effects: impl IntoIterator<Item = Effect>) -> Self {
        Ability {
            trigger,
            effects: effects.into_iter().collect(),
        }
    }
}
