//! Scripted self-play for exercising the engine end to end
//!
//! Not an opponent: the policy is fixed and greedy. Each step it picks one
//! batch of root events for the active player, runs it through the engine
//! and repeats until the game ends, a turn limit is hit, or nothing changes.

use crate::core::{PlayerId, PromptKind};
use crate::events::{Clock, GameAction, GameEvent, PurchaseSource};
use crate::game::{Engine, GameState, Phase, Prompt};
use crate::loader::CardRegistry;
use crate::zones::Zone;
use crate::Result;

/// Reason the simulation stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEndReason {
    /// Every opponent was eliminated
    LastPlayerStanding(PlayerId),
    /// Reached the turn limit
    TurnLimit,
    /// A step left the state unchanged (e.g. an unanswerable mandatory prompt)
    Stalled,
}

/// Result of a simulated match
#[derive(Debug, Clone)]
pub struct GameResult {
    pub winner: Option<PlayerId>,
    pub turns_played: u32,
    pub end_reason: GameEndReason,
    pub state: GameState,
    /// Full expanded log from the base state
    pub events: Vec<GameEvent>,
}

/// Drives a match with the greedy policy
pub struct GameLoop<'e, 'r> {
    engine: &'e mut Engine<'r>,
    max_turns: u32,
}

impl<'e, 'r> GameLoop<'e, 'r> {
    pub fn new(engine: &'e mut Engine<'r>) -> Self {
        GameLoop {
            engine,
            max_turns: 200,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn run_game(&mut self, base: &GameState, clock: &mut dyn Clock) -> Result<GameResult> {
        let mut state = base.clone();
        let mut events = Vec::new();

        loop {
            if let Some(winner) = state.winner.clone() {
                let reason = GameEndReason::LastPlayerStanding(winner.clone());
                return Ok(self.finish(base, state, events, Some(winner), reason));
            }
            if state.turn.turn_number > self.max_turns {
                return Ok(self.finish(base, state, events, None, GameEndReason::TurnLimit));
            }

            let roots: Vec<GameEvent> = next_roots(&state, self.engine.registry())?
                .into_iter()
                .map(|action| action.stamped(clock))
                .collect();

            let before = state.clone();
            for root in &roots {
                self.engine.fold_root(&mut state, root, &mut events)?;
            }
            if state == before {
                return Ok(self.finish(base, state, events, None, GameEndReason::Stalled));
            }
        }
    }

    fn finish(
        &self,
        base: &GameState,
        state: GameState,
        events: Vec<GameEvent>,
        winner: Option<PlayerId>,
        end_reason: GameEndReason,
    ) -> GameResult {
        let turns_played = state.turn.turn_number.saturating_sub(base.turn.turn_number);
        self.engine.logger().minimal(&format!(
            "Simulation ended after {} turns: {:?}",
            turns_played, end_reason
        ));
        GameResult {
            winner,
            turns_played,
            end_reason,
            state,
            events,
        }
    }
}

/// The greedy policy's next root batch
pub fn next_roots(state: &GameState, registry: &CardRegistry) -> Result<Vec<GameAction>> {
    let Some(active) = state.active_player() else {
        return Ok(Vec::new());
    };
    let me = active.id.clone();

    if let Some(prompt) = &state.prompt {
        return Ok(answer_prompt(state, prompt));
    }

    // Play everything in hand, one card per step
    if let Some(card) = active.hand.get(0) {
        let action = if registry.get(card)?.is_base() {
            GameAction::BasePlayed {
                player: me,
                hand_index: 0,
            }
        } else {
            GameAction::CardPlayed {
                player: me,
                hand_index: 0,
            }
        };
        return Ok(vec![action]);
    }

    if let Some(i) = active.bases.iter().position(|b| !b.activated_this_turn) {
        return Ok(vec![GameAction::BaseActivated {
            player: me,
            base_index: i,
        }]);
    }

    // Buy the most expensive affordable card
    let mut best: Option<(usize, u32)> = None;
    for (slot, card) in state.row.iter().enumerate() {
        let Some(card) = card else { continue };
        let cost = registry.get(card)?.cost;
        let affordable = cost <= active.trade || active.free_next_acquire;
        if affordable && best.map_or(true, |(_, c)| cost > c) {
            best = Some((slot, cost));
        }
    }
    if let Some((slot, cost)) = best {
        return Ok(vec![
            GameAction::CardPurchased {
                player: me.clone(),
                source: PurchaseSource::Row { slot },
            },
            GameAction::TradeSpent { player: me, amount: cost },
        ]);
    }
    if let Some(explorer) = state.explorer_deck.peek_top() {
        let cost = registry.get(explorer)?.cost;
        if cost <= active.trade {
            return Ok(vec![
                GameAction::CardPurchased {
                    player: me.clone(),
                    source: PurchaseSource::Explorer,
                },
                GameAction::TradeSpent { player: me, amount: cost },
            ]);
        }
    }

    if active.combat > 0 {
        if let Some(attack) = attack(state, registry, &me, active.combat)? {
            return Ok(vec![attack]);
        }
    }

    Ok(vec![GameAction::PhaseChanged { phase: Phase::Cleanup }])
}

/// Attack the next live opponent: outposts first, then the player
fn attack(state: &GameState, registry: &CardRegistry, me: &PlayerId, combat: u32) -> Result<Option<GameAction>> {
    let Some(target) = state.live_players().find(|id| *id != me) else {
        return Ok(None);
    };
    let Some(defender) = state.player(target) else {
        return Ok(None);
    };

    for (i, base) in defender.bases.iter().enumerate() {
        let def = registry.get(&base.card)?;
        if def.is_outpost() {
            let remaining = def.defence().saturating_sub(base.damage);
            // Only swing at an outpost we can finish
            if combat >= remaining {
                return Ok(Some(GameAction::BaseDamaged {
                    owner: target.clone(),
                    base_index: i,
                    amount: remaining as i32,
                }));
            }
            return Ok(None);
        }
    }

    Ok(Some(GameAction::DamageDealt {
        attacker: me.clone(),
        defender: target.clone(),
        amount: combat as i32,
    }))
}

fn answer_prompt(state: &GameState, prompt: &Prompt) -> Vec<GameAction> {
    let owner = prompt.player.clone();
    match prompt.kind {
        PromptKind::ScrapFromHand => {
            if state.player(&owner).map_or(false, |p| !p.hand.is_empty()) {
                return vec![GameAction::CardScrapped {
                    player: owner,
                    zone: Zone::Hand,
                    index: 0,
                }];
            }
        }
        PromptKind::OpponentDiscards => {
            let victim = state
                .live_players()
                .find(|id| **id != owner && state.player(id).map_or(false, |p| !p.hand.is_empty()));
            if let Some(victim) = victim {
                return vec![GameAction::CardDiscarded {
                    player: victim.clone(),
                    hand_index: 0,
                }];
            }
        }
        PromptKind::DestroyBase => {
            let target = state
                .live_players()
                .filter(|id| **id != owner)
                .find(|id| state.player(id).map_or(false, |p| !p.bases.is_empty()));
            if let Some(target) = target {
                return vec![GameAction::BaseChosenToDestroy {
                    player: owner,
                    owner: target.clone(),
                    base_index: 0,
                }];
            }
        }
        PromptKind::CopyShip => {
            let target = state.player(&owner).and_then(|p| {
                p.in_play
                    .iter()
                    .position(|card| prompt.source.as_ref() != Some(card))
            });
            if let Some(in_play_index) = target {
                return vec![GameAction::TargetCardChosen {
                    player: owner,
                    in_play_index,
                }];
            }
        }
        // Choosing nothing is always a legal answer
        PromptKind::DiscardOrScrapAndDraw { action, .. } if !prompt.optional => {
            return vec![GameAction::DiscardOrScrapAndDrawResolved {
                player: owner,
                action,
                hand_indices: Vec::new(),
            }];
        }
        _ => {}
    }

    if prompt.optional {
        vec![GameAction::PromptCancelled { player: owner }]
    } else {
        Vec::new()
    }
}
