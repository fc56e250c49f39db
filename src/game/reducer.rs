//! The reducer: one local state mutation per event
//!
//! `apply_event` never looks at any other event and never emits follow-ups.
//! An event that is not legal in the current state (wrong index, not enough
//! trade, dead target, ...) leaves the state untouched and reports
//! `Reduction::Rejected`. The only error is an id the registry cannot resolve.

use crate::core::{AcquireLocation, BaseInstance, CardId, Faction, PlayerId, PlayerState, PromptKind};
use crate::events::{GameAction, GameEvent, PurchaseSource};
use crate::game::{CombatNotice, GameState, LogLine, Prompt};
use crate::loader::CardRegistry;
use crate::zones::Zone;
use crate::Result;

/// Outcome of folding one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Applied,
    /// Silent no-op: the state is as it was
    Rejected,
}

impl Reduction {
    pub fn is_applied(self) -> bool {
        self == Reduction::Applied
    }

    fn from_bool(applied: bool) -> Self {
        if applied {
            Reduction::Applied
        } else {
            Reduction::Rejected
        }
    }
}

/// Fold a single event into `state`
///
/// A pending prompt is cleared only by an applied event that answers it; a
/// rejected answer leaves the state, prompt included, exactly as it was.
pub fn apply_event(state: &mut GameState, event: &GameEvent, registry: &CardRegistry) -> Result<Reduction> {
    if state.game_over {
        return Ok(Reduction::Rejected);
    }

    let action = &event.action;

    let resolved = state.prompt.clone().filter(|p| p.is_resolved_by(action));

    // An unanswered mandatory prompt holds up its owner
    if resolved.is_none() {
        if let Some(pending) = &state.prompt {
            if pending.blocks(action, state.active_player_id()) {
                return Ok(Reduction::Rejected);
            }
        }
    }

    let outcome = reduce(state, action, resolved.as_ref(), registry)?;

    if outcome.is_applied() {
        if resolved.is_some() {
            state.prompt = None;
        }
        state.log.push(LogLine {
            timestamp: event.timestamp,
            message: action.describe(),
        });
    }

    Ok(outcome)
}

fn live_mut<'a>(state: &'a mut GameState, id: &PlayerId) -> Option<&'a mut PlayerState> {
    state.players.get_mut(id).filter(|p| !p.is_dead)
}

fn live<'a>(state: &'a GameState, id: &PlayerId) -> Option<&'a PlayerState> {
    state.players.get(id).filter(|p| !p.is_dead)
}

fn reduce(
    state: &mut GameState,
    action: &GameAction,
    resolved: Option<&Prompt>,
    registry: &CardRegistry,
) -> Result<Reduction> {
    use Reduction::Rejected;

    let applied = match action {
        GameAction::CardPlayed { player, hand_index } => {
            let Some(p) = live_mut(state, player) else {
                return Ok(Rejected);
            };
            let Some(card) = p.hand.get(*hand_index).cloned() else {
                return Ok(Rejected);
            };
            if !registry.get(&card)?.is_ship() {
                return Ok(Rejected);
            }
            p.hand.remove_at(*hand_index);
            p.in_play.add(card.clone());
            state.turn.played_this_turn.push(card);
            true
        }

        GameAction::BasePlayed { player, hand_index } => {
            let Some(p) = live_mut(state, player) else {
                return Ok(Rejected);
            };
            let Some(card) = p.hand.get(*hand_index).cloned() else {
                return Ok(Rejected);
            };
            if !registry.get(&card)?.is_base() {
                return Ok(Rejected);
            }
            p.hand.remove_at(*hand_index);
            p.bases.push(BaseInstance::new(card.clone()));
            state.turn.played_this_turn.push(card);
            true
        }

        GameAction::BaseActivated { player, base_index } => {
            match live_mut(state, player).and_then(|p| p.bases.get_mut(*base_index)) {
                Some(base) if !base.activated_this_turn => {
                    base.activated_this_turn = true;
                    true
                }
                _ => false,
            }
        }

        GameAction::TradeAdded { player, amount } => match live_mut(state, player) {
            Some(p) => {
                p.trade = p.trade.saturating_add_signed(*amount);
                true
            }
            None => false,
        },

        GameAction::CombatAdded { player, amount } => match live_mut(state, player) {
            Some(p) => {
                p.combat = p.combat.saturating_add_signed(*amount);
                true
            }
            None => false,
        },

        GameAction::AuthorityAdded { player, amount } => match live_mut(state, player) {
            Some(p) => {
                // Floored at zero; elimination is a rule, not done here
                p.authority = p.authority.saturating_add_signed(*amount);
                true
            }
            None => false,
        },

        GameAction::TradeSpent { player, amount } => match live_mut(state, player) {
            Some(p) if p.free_next_acquire => {
                p.free_next_acquire = false;
                true
            }
            Some(p) if p.trade >= *amount => {
                p.trade -= amount;
                true
            }
            _ => false,
        },

        GameAction::CardPurchased { player, source } => purchase(state, player, *source, registry)?,

        GameAction::RowRefilled { slot } => match state.row.get(*slot) {
            Some(None) => {
                match state.trade_deck.draw_top() {
                    Some(card) => state.row[*slot] = Some(card),
                    // Supply exhausted: the row shrinks
                    None => {
                        state.row.remove(*slot);
                    }
                }
                true
            }
            _ => false,
        },

        GameAction::CardScrapped { player, zone, index } => scrap(state, player, *zone, *index),

        GameAction::CardDiscarded { player, hand_index } => match live_mut(state, player) {
            Some(p) => match p.hand.remove_at(*hand_index) {
                Some(card) => {
                    p.discard.add(card);
                    true
                }
                None => false,
            },
            None => false,
        },

        GameAction::CardsDrawn { player, .. }
        | GameAction::ShipPlayed { player, .. }
        | GameAction::TwoOrMoreBasesInPlay { player, .. }
        | GameAction::DrawPerFactionPlayed { player, .. }
        | GameAction::AllyAbilitiesChecked { player, .. }
        | GameAction::DiscardOrScrapAndDrawChosen { player, .. } => {
            // Notices only; the rule engine does the work
            live(state, player).is_some()
        }

        GameAction::DrawOne { player } => match live_mut(state, player) {
            Some(p) => match p.deck.draw_top() {
                Some(card) => {
                    p.hand.add(card);
                    true
                }
                None => false,
            },
            None => false,
        },

        GameAction::DeckShuffle { player, new_deck } => match live_mut(state, player) {
            Some(p) if is_reshuffle_of(p, new_deck) => {
                p.deck.cards = new_deck.clone();
                p.discard.clear();
                true
            }
            _ => false,
        },

        GameAction::DiscardInPlayAndHand { player } => match live_mut(state, player) {
            Some(p) => {
                let in_play = p.in_play.take_all();
                let hand = p.hand.take_all();
                p.discard.extend(in_play);
                p.discard.extend(hand);
                p.trade = 0;
                p.combat = 0;
                p.acquire_location = AcquireLocation::Discard;
                p.free_next_acquire = false;
                p.faction_tags.clear();
                state.turn.played_this_turn.clear();
                true
            }
            None => false,
        },

        GameAction::DamageDealt {
            attacker,
            defender,
            amount,
        } => damage_player(state, attacker, defender, *amount, registry)?,

        GameAction::BaseDamaged {
            owner,
            base_index,
            amount,
        } => damage_base(state, owner, *base_index, *amount, registry)?,

        GameAction::BaseChosenToDestroy { player, owner, base_index } => {
            if live(state, player).is_none() {
                return Ok(Rejected);
            }
            match state.players.get_mut(owner) {
                Some(o) if *base_index < o.bases.len() => {
                    let base = o.bases.remove(*base_index);
                    o.discard.add(base.card);
                    true
                }
                _ => false,
            }
        }

        GameAction::BasesReadied { player } => match live_mut(state, player) {
            Some(p) => {
                for base in &mut p.bases {
                    base.activated_this_turn = false;
                }
                true
            }
            None => false,
        },

        GameAction::TurnAdvanced => match state.next_live_index() {
            Some(next) => {
                state.active_index = next;
                state.turn.turn_number += 1;
                true
            }
            None => false,
        },

        GameAction::PhaseChanged { phase } => {
            if state.turn.phase == *phase {
                false
            } else {
                state.turn.phase = *phase;
                true
            }
        }

        GameAction::NextAcquireToTopSet { player } => match live_mut(state, player) {
            Some(p) => {
                p.acquire_location = AcquireLocation::Top;
                true
            }
            None => false,
        },

        GameAction::NextAcquireFreeSet { player } => match live_mut(state, player) {
            Some(p) => {
                p.free_next_acquire = true;
                true
            }
            None => false,
        },

        GameAction::FactionTagAdded { player, faction } => {
            // Machine Cult never receives additive tags
            if matches!(faction, Faction::MachineCult | Faction::Unaligned) {
                return Ok(Rejected);
            }
            match live_mut(state, player) {
                Some(p) => {
                    *p.faction_tags.entry(*faction).or_insert(0) += 1;
                    true
                }
                None => false,
            }
        }

        GameAction::DiscardOrScrapAndDrawResolved {
            player,
            action,
            hand_indices,
        } => {
            let max = match resolved.map(|p| p.kind) {
                Some(PromptKind::DiscardOrScrapAndDraw { action: wanted, max_cards }) if wanted == *action => max_cards,
                _ => return Ok(Rejected),
            };
            let Some(p) = live(state, player) else {
                return Ok(Rejected);
            };
            let mut seen = hand_indices.clone();
            seen.sort_unstable();
            seen.dedup();
            seen.len() == hand_indices.len()
                && hand_indices.len() as u32 <= max
                && hand_indices.iter().all(|&i| i < p.hand.len())
        }

        GameAction::PromptShown { player, .. } => {
            if live(state, player).is_none() {
                return Ok(Rejected);
            }
            state.prompt = Prompt::from_action(action);
            true
        }

        GameAction::PromptCancelled { .. } => resolved.is_some(),

        GameAction::TargetCardChosen { player, in_play_index } => {
            let Some(prompt) = resolved.filter(|p| p.kind == PromptKind::CopyShip) else {
                return Ok(Rejected);
            };
            match live(state, player).and_then(|p| p.in_play.get(*in_play_index)) {
                // A ship cannot copy itself
                Some(target) => prompt.source.as_ref() != Some(target),
                None => false,
            }
        }

        GameAction::PlayerEliminated { player } => {
            let rank = state.live_count().saturating_sub(1) as u32;
            match live_mut(state, player) {
                Some(p) => {
                    p.is_dead = true;
                    p.elimination_order = Some(rank);
                    true
                }
                None => false,
            }
        }

        GameAction::GameOver { winner } => match live_mut(state, winner) {
            Some(p) => {
                p.elimination_order = Some(0);
                state.game_over = true;
                state.winner = Some(winner.clone());
                true
            }
            None => false,
        },

        GameAction::CombatNoticesAcknowledged { player } => state.combat_notices.remove(player).is_some(),
    };

    Ok(Reduction::from_bool(applied))
}

/// `new_deck` must be a permutation of the cards it replaces
fn is_reshuffle_of(p: &PlayerState, new_deck: &[CardId]) -> bool {
    if new_deck.len() != p.deck.len() + p.discard.len() {
        return false;
    }
    let mut before: Vec<&CardId> = p.deck.iter().chain(p.discard.iter()).collect();
    let mut after: Vec<&CardId> = new_deck.iter().collect();
    before.sort_unstable();
    after.sort_unstable();
    before == after
}

fn purchase(
    state: &mut GameState,
    player: &PlayerId,
    source: PurchaseSource,
    registry: &CardRegistry,
) -> Result<bool> {
    let card = match source {
        PurchaseSource::Row { slot } => state.row.get(slot).cloned().flatten(),
        PurchaseSource::Explorer => state.explorer_deck.peek_top().cloned(),
    };
    let Some(card) = card else {
        return Ok(false);
    };
    let cost = registry.get(&card)?.cost;

    let Some(p) = state.players.get(player).filter(|p| !p.is_dead) else {
        return Ok(false);
    };
    if cost > p.trade && !p.free_next_acquire {
        return Ok(false);
    }

    match source {
        PurchaseSource::Row { slot } => {
            state.row[slot] = None;
            if let Some(p) = live_mut(state, player) {
                match p.acquire_location {
                    AcquireLocation::Top => p.deck.add(card),
                    AcquireLocation::Discard => p.discard.add(card),
                }
                p.acquire_location = AcquireLocation::Discard;
            }
        }
        PurchaseSource::Explorer => {
            state.explorer_deck.draw_top();
            if let Some(p) = live_mut(state, player) {
                p.discard.add(card);
            }
        }
    }
    Ok(true)
}

fn scrap(state: &mut GameState, player: &PlayerId, zone: Zone, index: usize) -> bool {
    let card = match zone {
        Zone::Row => {
            if live(state, player).is_none() {
                return false;
            }
            state.row.get_mut(index).and_then(Option::take)
        }
        Zone::Hand | Zone::Discard | Zone::InPlay | Zone::Bases => {
            let Some(p) = live_mut(state, player) else {
                return false;
            };
            match zone {
                Zone::Hand => p.hand.remove_at(index),
                Zone::Discard => p.discard.remove_at(index),
                Zone::InPlay => p.in_play.remove_at(index),
                _ => (index < p.bases.len()).then(|| p.bases.remove(index).card),
            }
        }
    };

    match card {
        Some(card) => {
            state.scrap_pile.add(card);
            true
        }
        None => false,
    }
}

fn damage_player(
    state: &mut GameState,
    attacker: &PlayerId,
    defender: &PlayerId,
    amount: i32,
    registry: &CardRegistry,
) -> Result<bool> {
    let amount = amount.max(0) as u32;

    if attacker == defender || live(state, defender).is_none() {
        return Ok(false);
    }
    // Outposts shield their owner
    if state.has_outpost(defender, registry)? {
        return Ok(false);
    }
    match live_mut(state, attacker) {
        Some(a) if a.combat >= amount => a.combat -= amount,
        _ => return Ok(false),
    }
    if let Some(d) = state.players.get_mut(defender) {
        d.authority = d.authority.saturating_sub(amount);
    }

    if amount > 0 {
        state.combat_notices.entry(defender.clone()).or_default().push(CombatNotice {
            attacker: attacker.clone(),
            amount,
            base: None,
            destroyed: false,
        });
    }
    Ok(true)
}

fn damage_base(
    state: &mut GameState,
    owner: &PlayerId,
    base_index: usize,
    amount: i32,
    registry: &CardRegistry,
) -> Result<bool> {
    if amount <= 0 {
        return Ok(false);
    }
    let amount = amount as u32;

    let Some(attacker) = state.active_player_id().cloned() else {
        return Ok(false);
    };
    if attacker == *owner {
        return Ok(false);
    }

    let Some(base) = state.players.get(owner).and_then(|o| o.bases.get(base_index)) else {
        return Ok(false);
    };
    let card = base.card.clone();
    let damage = base.damage;
    let def = registry.get(&card)?;

    // A normal base is out of reach while its owner has an outpost up
    if !def.is_outpost() && state.has_outpost(owner, registry)? {
        return Ok(false);
    }

    let remaining = def.defence().saturating_sub(damage);
    let destroyed = amount >= remaining;
    let cost = amount.min(remaining);

    match live_mut(state, &attacker) {
        Some(a) if a.combat >= cost => a.combat -= cost,
        _ => return Ok(false),
    }

    if let Some(o) = state.players.get_mut(owner) {
        if destroyed {
            let base = o.bases.remove(base_index);
            o.discard.add(base.card);
        } else {
            o.bases[base_index].damage += amount;
        }
    }

    state.combat_notices.entry(owner.clone()).or_default().push(CombatNotice {
        attacker,
        amount: cost,
        base: Some(card),
        destroyed,
    });
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Phase;

    fn alice() -> PlayerId {
        PlayerId::new("alice")
    }

    fn bob() -> PlayerId {
        PlayerId::new("bob")
    }

    fn table() -> GameState {
        GameState::new(vec![alice(), bob()], 50)
    }

    fn apply(state: &mut GameState, action: GameAction) -> Reduction {
        apply_event(state, &action.at(0), CardRegistry::standard()).unwrap()
    }

    #[test]
    fn test_play_ship_moves_to_in_play() {
        let mut state = table();
        state.player_mut(&alice()).unwrap().hand.add(CardId::new("scout"));

        let outcome = apply(
            &mut state,
            GameAction::CardPlayed {
                player: alice(),
                hand_index: 0,
            },
        );

        assert_eq!(outcome, Reduction::Applied);
        let p = state.player(&alice()).unwrap();
        assert!(p.hand.is_empty());
        assert_eq!(p.in_play.cards, vec![CardId::new("scout")]);
        assert_eq!(state.turn.played_this_turn, vec![CardId::new("scout")]);
        assert_eq!(state.log.len(), 1);
    }

    #[test]
    fn test_play_base_as_ship_is_rejected() {
        let mut state = table();
        state.player_mut(&alice()).unwrap().hand.add(CardId::new("the_hive"));
        let before = state.clone();

        let outcome = apply(
            &mut state,
            GameAction::CardPlayed {
                player: alice(),
                hand_index: 0,
            },
        );

        assert_eq!(outcome, Reduction::Rejected);
        assert_eq!(state, before);
    }

    #[test]
    fn test_base_enters_activated() {
        let mut state = table();
        state.player_mut(&alice()).unwrap().hand.add(CardId::new("the_hive"));

        apply(
            &mut state,
            GameAction::BasePlayed {
                player: alice(),
                hand_index: 0,
            },
        );

        let base = &state.player(&alice()).unwrap().bases[0];
        assert_eq!(base.damage, 0);
        assert!(base.activated_this_turn);

        let again = apply(
            &mut state,
            GameAction::BaseActivated {
                player: alice(),
                base_index: 0,
            },
        );
        assert_eq!(again, Reduction::Rejected);
    }

    #[test]
    fn test_unknown_card_is_fatal() {
        let mut state = table();
        state.player_mut(&alice()).unwrap().hand.add(CardId::new("ghost"));

        let err = apply_event(
            &mut state,
            &GameAction::CardPlayed {
                player: alice(),
                hand_index: 0,
            }
            .at(0),
            CardRegistry::standard(),
        )
        .unwrap_err();
        assert!(matches!(err, crate::RealmsError::UnknownCard(_)));
    }

    #[test]
    fn test_authority_floor() {
        let mut state = table();
        apply(
            &mut state,
            GameAction::AuthorityAdded {
                player: bob(),
                amount: -80,
            },
        );
        assert_eq!(state.player(&bob()).unwrap().authority, 0);
    }

    #[test]
    fn test_trade_spent_consumes_free_flag_once() {
        let mut state = table();
        state.player_mut(&alice()).unwrap().free_next_acquire = true;
        let spend = GameAction::TradeSpent {
            player: alice(),
            amount: 3,
        };

        assert_eq!(apply(&mut state, spend.clone()), Reduction::Applied);
        assert!(!state.player(&alice()).unwrap().free_next_acquire);
        assert_eq!(apply(&mut state, spend), Reduction::Rejected);
    }

    #[test]
    fn test_purchase_to_top_resets_location() {
        let mut state = table();
        state.row = vec![Some(CardId::new("cutter"))];
        {
            let p = state.player_mut(&alice()).unwrap();
            p.trade = 5;
            p.acquire_location = AcquireLocation::Top;
        }

        apply(
            &mut state,
            GameAction::CardPurchased {
                player: alice(),
                source: PurchaseSource::Row { slot: 0 },
            },
        );

        let p = state.player(&alice()).unwrap();
        assert_eq!(p.deck.peek_top(), Some(&CardId::new("cutter")));
        assert_eq!(p.acquire_location, AcquireLocation::Discard);
        assert_eq!(state.row, vec![None]);
    }

    #[test]
    fn test_unaffordable_purchase_is_noop() {
        let mut state = table();
        state.row = vec![Some(CardId::new("battlecruiser"))];
        state.player_mut(&alice()).unwrap().trade = 2;
        let before = state.clone();

        let outcome = apply(
            &mut state,
            GameAction::CardPurchased {
                player: alice(),
                source: PurchaseSource::Row { slot: 0 },
            },
        );
        assert_eq!(outcome, Reduction::Rejected);
        assert_eq!(state, before);
    }

    #[test]
    fn test_row_refill_shrinks_when_supply_is_out() {
        let mut state = table();
        state.row = vec![Some(CardId::new("cutter")), None, Some(CardId::new("ram"))];

        apply(&mut state, GameAction::RowRefilled { slot: 1 });
        assert_eq!(state.row, vec![Some(CardId::new("cutter")), Some(CardId::new("ram"))]);

        // Filled slots are never refilled
        assert_eq!(apply(&mut state, GameAction::RowRefilled { slot: 0 }), Reduction::Rejected);
    }

    #[test]
    fn test_scrap_base_keeps_only_id() {
        let mut state = table();
        state
            .player_mut(&alice())
            .unwrap()
            .bases
            .push(BaseInstance::new(CardId::new("the_hive")));

        apply(
            &mut state,
            GameAction::CardScrapped {
                player: alice(),
                zone: Zone::Bases,
                index: 0,
            },
        );

        assert!(state.player(&alice()).unwrap().bases.is_empty());
        assert_eq!(state.scrap_pile.cards, vec![CardId::new("the_hive")]);

        let out_of_range = apply(
            &mut state,
            GameAction::CardScrapped {
                player: alice(),
                zone: Zone::Hand,
                index: 3,
            },
        );
        assert_eq!(out_of_range, Reduction::Rejected);
    }

    #[test]
    fn test_deck_shuffle_must_be_permutation() {
        let mut state = table();
        state.player_mut(&alice()).unwrap().discard = vec![CardId::new("scout"), CardId::new("viper")].into();

        let forged = apply(
            &mut state,
            GameAction::DeckShuffle {
                player: alice(),
                new_deck: vec![CardId::new("battlecruiser"), CardId::new("viper")],
            },
        );
        assert_eq!(forged, Reduction::Rejected);

        let genuine = apply(
            &mut state,
            GameAction::DeckShuffle {
                player: alice(),
                new_deck: vec![CardId::new("viper"), CardId::new("scout")],
            },
        );
        assert_eq!(genuine, Reduction::Applied);
        let p = state.player(&alice()).unwrap();
        assert!(p.discard.is_empty());
        assert_eq!(p.deck.len(), 2);
    }

    #[test]
    fn test_outpost_blocks_player_damage() {
        let mut state = table();
        state.player_mut(&alice()).unwrap().combat = 10;
        state
            .player_mut(&bob())
            .unwrap()
            .bases
            .push(BaseInstance::new(CardId::new("trading_post")));

        let hit = GameAction::DamageDealt {
            attacker: alice(),
            defender: bob(),
            amount: 4,
        };
        assert_eq!(apply(&mut state, hit.clone()), Reduction::Rejected);

        state.player_mut(&bob()).unwrap().bases.clear();
        assert_eq!(apply(&mut state, hit), Reduction::Applied);
        assert_eq!(state.player(&bob()).unwrap().authority, 46);
        assert_eq!(state.player(&alice()).unwrap().combat, 6);
        assert_eq!(state.combat_notices[&bob()].len(), 1);
    }

    #[test]
    fn test_faction_tag_skips_machine_cult() {
        let mut state = table();
        for faction in [Faction::Blob, Faction::MachineCult] {
            apply(
                &mut state,
                GameAction::FactionTagAdded {
                    player: alice(),
                    faction,
                },
            );
        }
        let p = state.player(&alice()).unwrap();
        assert_eq!(p.faction_tag(Faction::Blob), 1);
        assert_eq!(p.faction_tag(Faction::MachineCult), 0);
    }

    #[test]
    fn test_turn_advance_skips_dead() {
        let mut state = GameState::new(vec![alice(), bob(), PlayerId::new("carol")], 50);
        state.player_mut(&bob()).unwrap().is_dead = true;

        apply(&mut state, GameAction::TurnAdvanced);
        assert_eq!(state.active_player_id(), Some(&PlayerId::new("carol")));
        assert_eq!(state.turn.turn_number, 2);
    }

    #[test]
    fn test_same_phase_is_rejected() {
        let mut state = table();
        assert_eq!(
            apply(&mut state, GameAction::PhaseChanged { phase: Phase::Main }),
            Reduction::Rejected
        );
    }

    #[test]
    fn test_elimination_ranks() {
        let mut state = GameState::new(vec![alice(), bob(), PlayerId::new("carol")], 50);

        apply(&mut state, GameAction::PlayerEliminated { player: bob() });
        assert_eq!(state.player(&bob()).unwrap().elimination_order, Some(2));

        // Exactly once
        assert_eq!(
            apply(&mut state, GameAction::PlayerEliminated { player: bob() }),
            Reduction::Rejected
        );

        apply(&mut state, GameAction::GameOver { winner: alice() });
        assert!(state.game_over);
        assert_eq!(state.player(&alice()).unwrap().elimination_order, Some(0));

        // Nothing applies after the game ends
        assert_eq!(apply(&mut state, GameAction::TurnAdvanced), Reduction::Rejected);
    }

    #[test]
    fn test_mandatory_prompt_blocks_play() {
        let mut state = table();
        state.player_mut(&alice()).unwrap().hand.add(CardId::new("scout"));
        state.player_mut(&alice()).unwrap().hand.add(CardId::new("viper"));
        apply(
            &mut state,
            GameAction::PromptShown {
                player: alice(),
                kind: PromptKind::ScrapFromHand,
                optional: false,
                source: None,
            },
        );

        let play = GameAction::CardPlayed {
            player: alice(),
            hand_index: 0,
        };
        assert_eq!(apply(&mut state, play.clone()), Reduction::Rejected);

        // Cancelling a mandatory prompt does nothing
        assert_eq!(
            apply(&mut state, GameAction::PromptCancelled { player: alice() }),
            Reduction::Rejected
        );

        apply(
            &mut state,
            GameAction::CardScrapped {
                player: alice(),
                zone: Zone::Hand,
                index: 1,
            },
        );
        assert!(state.prompt.is_none());
        assert_eq!(apply(&mut state, play), Reduction::Applied);
    }

    #[test]
    fn test_rejected_answer_keeps_mandatory_prompt() {
        let mut state = table();
        state.player_mut(&alice()).unwrap().hand.add(CardId::new("scout"));
        apply(
            &mut state,
            GameAction::PromptShown {
                player: alice(),
                kind: PromptKind::ScrapFromHand,
                optional: false,
                source: None,
            },
        );
        let before = state.clone();

        let out_of_range = GameAction::CardScrapped {
            player: alice(),
            zone: Zone::Hand,
            index: 99,
        };
        assert_eq!(apply(&mut state, out_of_range), Reduction::Rejected);
        assert_eq!(state, before);
        assert_eq!(state.prompt.as_ref().map(|p| p.kind), Some(PromptKind::ScrapFromHand));
        assert_eq!(state.player(&alice()).unwrap().hand.cards, vec![CardId::new("scout")]);
        assert!(state.scrap_pile.is_empty());
    }
}
