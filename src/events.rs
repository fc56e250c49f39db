//! Event model and append-only event log
//!
//! The game is stored as an ordered list of discrete events. Causal order is
//! list position; the timestamp is for display only. Once appended, an event
//! is never edited or removed - cascades are recorded as further events.

use crate::core::{CardId, DiscardOrScrap, Faction, PlayerId, PromptKind};
use crate::game::Phase;
use crate::zones::Zone;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Where a purchase is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum PurchaseSource {
    Row { slot: usize },
    Explorer,
}

/// Everything that can happen in a game
///
/// Root events come from players; the rest are emitted by rules. Both kinds
/// share one closed set so the log can be replayed without knowing which is
/// which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameAction {
    /// A ship played from hand
    CardPlayed { player: PlayerId, hand_index: usize },

    BasePlayed { player: PlayerId, hand_index: usize },

    /// Notice that a ship entered play (fleet bonuses key off this)
    ShipPlayed { player: PlayerId, card: CardId },

    /// Use a base's primary ability again on a later turn
    BaseActivated { player: PlayerId, base_index: usize },

    TradeAdded { player: PlayerId, amount: i32 },
    CombatAdded { player: PlayerId, amount: i32 },
    AuthorityAdded { player: PlayerId, amount: i32 },

    /// Pay for a purchase (or consume a free-acquire)
    TradeSpent { player: PlayerId, amount: u32 },

    CardPurchased { player: PlayerId, source: PurchaseSource },

    RowRefilled { slot: usize },

    CardScrapped { player: PlayerId, zone: Zone, index: usize },

    CardDiscarded { player: PlayerId, hand_index: usize },

    CardsDrawn { player: PlayerId, count: u32 },
    DrawOne { player: PlayerId },

    /// Replace the deck with an already-shuffled sequence and empty the discard
    DeckShuffle { player: PlayerId, new_deck: Vec<CardId> },

    /// Turn cleanup reset
    DiscardInPlayAndHand { player: PlayerId },

    DamageDealt { attacker: PlayerId, defender: PlayerId, amount: i32 },

    /// Combat spent on a base, paid from the active player's pool
    BaseDamaged { owner: PlayerId, base_index: usize, amount: i32 },

    /// Destroy a base outright, bypassing combat and shields
    BaseChosenToDestroy { player: PlayerId, owner: PlayerId, base_index: usize },

    BasesReadied { player: PlayerId },

    TurnAdvanced,

    PhaseChanged { phase: Phase },

    NextAcquireToTopSet { player: PlayerId },
    NextAcquireFreeSet { player: PlayerId },

    TwoOrMoreBasesInPlay { player: PlayerId, amount: u32 },
    DrawPerFactionPlayed { player: PlayerId, faction: Faction },

    FactionTagAdded { player: PlayerId, faction: Faction },

    /// Re-evaluate a card's ally threshold against the current board
    AllyAbilitiesChecked { player: PlayerId, card: CardId },

    DiscardOrScrapAndDrawChosen {
        player: PlayerId,
        action: DiscardOrScrap,
        max_cards: u32,
    },

    DiscardOrScrapAndDrawResolved {
        player: PlayerId,
        action: DiscardOrScrap,
        hand_indices: Vec<usize>,
    },

    PromptShown {
        player: PlayerId,
        kind: PromptKind,
        optional: bool,
        source: Option<CardId>,
    },

    PromptCancelled { player: PlayerId },

    /// Copy target for a copy-ship prompt, by in-play index
    TargetCardChosen { player: PlayerId, in_play_index: usize },

    PlayerEliminated { player: PlayerId },

    GameOver { winner: PlayerId },

    CombatNoticesAcknowledged { player: PlayerId },
}

/// Discriminant of `GameAction`, used to bind rules to event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    CardPlayed,
    BasePlayed,
    ShipPlayed,
    BaseActivated,
    TradeAdded,
    CombatAdded,
    AuthorityAdded,
    TradeSpent,
    CardPurchased,
    RowRefilled,
    CardScrapped,
    CardDiscarded,
    CardsDrawn,
    DrawOne,
    DeckShuffle,
    DiscardInPlayAndHand,
    DamageDealt,
    BaseDamaged,
    BaseChosenToDestroy,
    BasesReadied,
    TurnAdvanced,
    PhaseChanged,
    NextAcquireToTopSet,
    NextAcquireFreeSet,
    TwoOrMoreBasesInPlay,
    DrawPerFactionPlayed,
    FactionTagAdded,
    AllyAbilitiesChecked,
    DiscardOrScrapAndDrawChosen,
    DiscardOrScrapAndDrawResolved,
    PromptShown,
    PromptCancelled,
    TargetCardChosen,
    PlayerEliminated,
    GameOver,
    CombatNoticesAcknowledged,
}

impl GameAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            GameAction::CardPlayed { .. } => ActionKind::CardPlayed,
            GameAction::BasePlayed { .. } => ActionKind::BasePlayed,
            GameAction::ShipPlayed { .. } => ActionKind::ShipPlayed,
            GameAction::BaseActivated { .. } => ActionKind::BaseActivated,
            GameAction::TradeAdded { .. } => ActionKind::TradeAdded,
            GameAction::CombatAdded { .. } => ActionKind::CombatAdded,
            GameAction::AuthorityAdded { .. } => ActionKind::AuthorityAdded,
            GameAction::TradeSpent { .. } => ActionKind::TradeSpent,
            GameAction::CardPurchased { .. } => ActionKind::CardPurchased,
            GameAction::RowRefilled { .. } => ActionKind::RowRefilled,
            GameAction::CardScrapped { .. } => ActionKind::CardScrapped,
            GameAction::CardDiscarded { .. } => ActionKind::CardDiscarded,
            GameAction::CardsDrawn { .. } => ActionKind::CardsDrawn,
            GameAction::DrawOne { .. } => ActionKind::DrawOne,
            GameAction::DeckShuffle { .. } => ActionKind::DeckShuffle,
            GameAction::DiscardInPlayAndHand { .. } => ActionKind::DiscardInPlayAndHand,
            GameAction::DamageDealt { .. } => ActionKind::DamageDealt,
            GameAction::BaseDamaged { .. } => ActionKind::BaseDamaged,
            GameAction::BaseChosenToDestroy { .. } => ActionKind::BaseChosenToDestroy,
            GameAction::BasesReadied { .. } => ActionKind::BasesReadied,
            GameAction::TurnAdvanced => ActionKind::TurnAdvanced,
            GameAction::PhaseChanged { .. } => ActionKind::PhaseChanged,
            GameAction::NextAcquireToTopSet { .. } => ActionKind::NextAcquireToTopSet,
            GameAction::NextAcquireFreeSet { .. } => ActionKind::NextAcquireFreeSet,
            GameAction::TwoOrMoreBasesInPlay { .. } => ActionKind::TwoOrMoreBasesInPlay,
            GameAction::DrawPerFactionPlayed { .. } => ActionKind::DrawPerFactionPlayed,
            GameAction::FactionTagAdded { .. } => ActionKind::FactionTagAdded,
            GameAction::AllyAbilitiesChecked { .. } => ActionKind::AllyAbilitiesChecked,
            GameAction::DiscardOrScrapAndDrawChosen { .. } => ActionKind::DiscardOrScrapAndDrawChosen,
            GameAction::DiscardOrScrapAndDrawResolved { .. } => ActionKind::DiscardOrScrapAndDrawResolved,
            GameAction::PromptShown { .. } => ActionKind::PromptShown,
            GameAction::PromptCancelled { .. } => ActionKind::PromptCancelled,
            GameAction::TargetCardChosen { .. } => ActionKind::TargetCardChosen,
            GameAction::PlayerEliminated { .. } => ActionKind::PlayerEliminated,
            GameAction::GameOver { .. } => ActionKind::GameOver,
            GameAction::CombatNoticesAcknowledged { .. } => ActionKind::CombatNoticesAcknowledged,
        }
    }

    /// The player acting, if the event has one
    pub fn player(&self) -> Option<&PlayerId> {
        match self {
            GameAction::CardPlayed { player, .. }
            | GameAction::BasePlayed { player, .. }
            | GameAction::ShipPlayed { player, .. }
            | GameAction::BaseActivated { player, .. }
            | GameAction::TradeAdded { player, .. }
            | GameAction::CombatAdded { player, .. }
            | GameAction::AuthorityAdded { player, .. }
            | GameAction::TradeSpent { player, .. }
            | GameAction::CardPurchased { player, .. }
            | GameAction::CardScrapped { player, .. }
            | GameAction::CardDiscarded { player, .. }
            | GameAction::CardsDrawn { player, .. }
            | GameAction::DrawOne { player }
            | GameAction::DeckShuffle { player, .. }
            | GameAction::DiscardInPlayAndHand { player }
            | GameAction::BaseChosenToDestroy { player, .. }
            | GameAction::BasesReadied { player }
            | GameAction::NextAcquireToTopSet { player }
            | GameAction::NextAcquireFreeSet { player }
            | GameAction::TwoOrMoreBasesInPlay { player, .. }
            | GameAction::DrawPerFactionPlayed { player, .. }
            | GameAction::FactionTagAdded { player, .. }
            | GameAction::AllyAbilitiesChecked { player, .. }
            | GameAction::DiscardOrScrapAndDrawChosen { player, .. }
            | GameAction::DiscardOrScrapAndDrawResolved { player, .. }
            | GameAction::PromptShown { player, .. }
            | GameAction::PromptCancelled { player }
            | GameAction::TargetCardChosen { player, .. }
            | GameAction::PlayerEliminated { player }
            | GameAction::CombatNoticesAcknowledged { player } => Some(player),
            GameAction::DamageDealt { attacker, .. } => Some(attacker),
            GameAction::GameOver { winner } => Some(winner),
            GameAction::BaseDamaged { .. }
            | GameAction::RowRefilled { .. }
            | GameAction::TurnAdvanced
            | GameAction::PhaseChanged { .. } => None,
        }
    }

    /// One-line human readable description for the display log
    pub fn describe(&self) -> String {
        match self {
            GameAction::CardPlayed { player, hand_index } => {
                format!("{player} plays the ship at hand position {hand_index}")
            }
            GameAction::BasePlayed { player, hand_index } => {
                format!("{player} deploys the base at hand position {hand_index}")
            }
            GameAction::ShipPlayed { player, card } => format!("{player} launched {card}"),
            GameAction::BaseActivated { player, base_index } => {
                format!("{player} activates base #{base_index}")
            }
            GameAction::TradeAdded { player, amount } => format!("{player} gains {amount} trade"),
            GameAction::CombatAdded { player, amount } => format!("{player} gains {amount} combat"),
            GameAction::AuthorityAdded { player, amount } => {
                format!("{player} authority changes by {amount}")
            }
            GameAction::TradeSpent { player, amount } => format!("{player} spends {amount} trade"),
            GameAction::CardPurchased { player, source } => match source {
                PurchaseSource::Row { slot } => format!("{player} buys from trade row slot {slot}"),
                PurchaseSource::Explorer => format!("{player} buys an explorer"),
            },
            GameAction::RowRefilled { slot } => format!("trade row slot {slot} refilled"),
            GameAction::CardScrapped { player, zone, index } => {
                format!("{player} scraps card {index} from {zone:?}")
            }
            GameAction::CardDiscarded { player, hand_index } => {
                format!("{player} discards hand card {hand_index}")
            }
            GameAction::CardsDrawn { player, count } => format!("{player} draws {count}"),
            GameAction::DrawOne { player } => format!("{player} draws a card"),
            GameAction::DeckShuffle { player, new_deck } => {
                format!("{player} shuffles {} cards into a new deck", new_deck.len())
            }
            GameAction::DiscardInPlayAndHand { player } => format!("{player} cleans up"),
            GameAction::DamageDealt {
                attacker,
                defender,
                amount,
            } => format!("{attacker} deals {amount} damage to {defender}"),
            GameAction::BaseDamaged {
                owner,
                base_index,
                amount,
            } => format!("{amount} damage to {owner}'s base #{base_index}"),
            GameAction::BaseChosenToDestroy {
                player,
                owner,
                base_index,
            } => format!("{player} destroys {owner}'s base #{base_index}"),
            GameAction::BasesReadied { player } => format!("{player}'s bases are ready"),
            GameAction::TurnAdvanced => "turn passes".to_string(),
            GameAction::PhaseChanged { phase } => format!("phase is now {phase:?}"),
            GameAction::NextAcquireToTopSet { player } => {
                format!("{player}'s next purchase goes on top of the deck")
            }
            GameAction::NextAcquireFreeSet { player } => format!("{player}'s next purchase is free"),
            GameAction::TwoOrMoreBasesInPlay { player, amount } => {
                format!("{player} checks for two bases (draw {amount})")
            }
            GameAction::DrawPerFactionPlayed { player, faction } => {
                format!("{player} draws for each {faction} card played")
            }
            GameAction::FactionTagAdded { player, faction } => {
                format!("{player} counts as a {faction} ally")
            }
            GameAction::AllyAbilitiesChecked { player, card } => {
                format!("{player} checks ally abilities of {card}")
            }
            GameAction::DiscardOrScrapAndDrawChosen {
                player,
                action,
                max_cards,
            } => format!("{player} may {action:?} up to {max_cards} and draw"),
            GameAction::DiscardOrScrapAndDrawResolved {
                player,
                action,
                hand_indices,
            } => format!("{player} chose to {action:?} {} cards", hand_indices.len()),
            GameAction::PromptShown { player, kind, .. } => format!("{player} must decide: {kind:?}"),
            GameAction::PromptCancelled { player } => format!("{player} skips the decision"),
            GameAction::TargetCardChosen {
                player,
                in_play_index,
            } => format!("{player} copies in-play card {in_play_index}"),
            GameAction::PlayerEliminated { player } => format!("{player} has been eliminated"),
            GameAction::GameOver { winner } => format!("{winner} wins the game"),
            GameAction::CombatNoticesAcknowledged { player } => {
                format!("{player} acknowledges combat reports")
            }
        }
    }

    /// Stamp this action into an event
    pub fn at(self, timestamp: u64) -> GameEvent {
        GameEvent {
            timestamp,
            action: self,
        }
    }

    pub fn stamped(self, clock: &mut dyn Clock) -> GameEvent {
        let timestamp = clock.now();
        self.at(timestamp)
    }
}

/// A stamped event as stored in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Display-only logical timestamp; causal order is log position
    pub timestamp: u64,
    pub action: GameAction,
}

impl GameEvent {
    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }
}

/// Source of event timestamps
pub trait Clock {
    fn now(&mut self) -> u64;
}

/// Wall-clock milliseconds since the Unix epoch, never going backwards
#[derive(Debug, Default)]
pub struct SystemClock {
    last: u64,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { last: 0 }
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> u64 {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last = wall.max(self.last);
        self.last
    }
}

/// Counter clock for tests and deterministic tooling
#[derive(Debug, Default)]
pub struct LogicalClock {
    next: u64,
}

impl LogicalClock {
    pub fn new() -> Self {
        LogicalClock { next: 0 }
    }

    pub fn starting_at(next: u64) -> Self {
        LogicalClock { next }
    }
}

impl Clock for LogicalClock {
    fn now(&mut self) -> u64 {
        let t = self.next;
        self.next += 1;
        t
    }
}

/// Append-only event log, saved as a plain JSON array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    /// Events in causal order (most recent at end)
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    pub fn append(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        self.events.extend(events);
    }

    /// Get the most recent event without removing it
    pub fn peek(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}

impl From<Vec<GameEvent>> for EventLog {
    fn from(events: Vec<GameEvent>) -> Self {
        EventLog { events }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> PlayerId {
        PlayerId::new("alice")
    }

    #[test]
    fn test_event_log() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.append(GameAction::DrawOne { player: alice() }.at(1));
        log.append(GameAction::TurnAdvanced.at(2));

        assert_eq!(log.len(), 2);
        assert_eq!(log.peek().unwrap().kind(), ActionKind::TurnAdvanced);
        assert_eq!(log.events()[0].kind(), ActionKind::DrawOne);
    }

    #[test]
    fn test_wire_format_is_tagged_record() {
        let event = GameAction::CardPurchased {
            player: alice(),
            source: PurchaseSource::Row { slot: 2 },
        }
        .at(7);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "timestamp": 7,
                "action": {
                    "type": "card_purchased",
                    "player": "alice",
                    "source": {"from": "row", "slot": 2}
                }
            })
        );

        let back: GameEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_logical_clock_is_monotonic() {
        let mut clock = LogicalClock::starting_at(10);
        let a = GameAction::TurnAdvanced.stamped(&mut clock);
        let b = GameAction::TurnAdvanced.stamped(&mut clock);
        assert_eq!(a.timestamp, 10);
        assert_eq!(b.timestamp, 11);
    }

    #[test]
    fn test_system_clock_never_goes_backwards() {
        let mut clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_player_accessor() {
        assert_eq!(GameAction::DrawOne { player: alice() }.player(), Some(&alice()));
        assert_eq!(GameAction::TurnAdvanced.player(), None);
    }
}
