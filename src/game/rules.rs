//! Reactive rules
//!
//! A rule is bound to one event kind. After each reduction the engine runs
//! every rule bound to the event's kind, in table order, against the
//! post-reduction state. Rules never mutate state: they only return
//! follow-up events for the engine to fold next.
//!
//! Card ability semantics, ally thresholds, deck refresh and turn handoff
//! all live here so the reducer can stay a set of local mutations.

use crate::config::GameConfig;
use crate::core::{CardDef, CardId, DiscardOrScrap, Effect, Faction, PlayerId, PromptKind, Trigger};
use crate::events::{ActionKind, GameAction, PurchaseSource};
use crate::game::{GameState, Phase, Reduction, Shuffler};
use crate::loader::CardRegistry;
use crate::zones::Zone;
use crate::Result;

/// Everything a rule may consult while reacting to one event
pub struct RuleContext<'a> {
    /// State after the triggering event was folded
    pub state: &'a GameState,
    pub registry: &'a CardRegistry,
    pub config: &'a GameConfig,
    /// Whether the triggering event was applied or rejected
    pub outcome: Reduction,
    pub shuffler: &'a mut dyn Shuffler,
    prompt_budget: bool,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        state: &'a GameState,
        registry: &'a CardRegistry,
        config: &'a GameConfig,
        outcome: Reduction,
        shuffler: &'a mut dyn Shuffler,
    ) -> Self {
        RuleContext {
            state,
            registry,
            config,
            outcome,
            shuffler,
            prompt_budget: prompt_slot_free(state),
        }
    }

    pub fn applied(&self) -> bool {
        self.outcome.is_applied()
    }

    /// At most one prompt per triggering event, and none while another
    /// decision is pending
    fn take_prompt_budget(&mut self) -> bool {
        std::mem::replace(&mut self.prompt_budget, false)
    }
}

/// A pending self-scrap offer is passive and gives way to any new prompt
fn prompt_slot_free(state: &GameState) -> bool {
    match &state.prompt {
        None => true,
        Some(p) => p.kind == PromptKind::ScrapSelf,
    }
}

pub type RuleFn = fn(&mut RuleContext<'_>, &GameAction) -> Result<Vec<GameAction>>;

/// A reactive rule bound to a single event kind
pub struct Rule {
    pub name: &'static str,
    pub trigger: ActionKind,
    pub fire: RuleFn,
}

/// The rule table, in firing order
pub static RULES: &[Rule] = &[
    Rule {
        name: "card_abilities",
        trigger: ActionKind::CardPlayed,
        fire: card_abilities,
    },
    Rule {
        name: "base_abilities",
        trigger: ActionKind::BasePlayed,
        fire: base_abilities,
    },
    Rule {
        name: "base_activation",
        trigger: ActionKind::BaseActivated,
        fire: base_activation,
    },
    Rule {
        name: "fleet_bonus",
        trigger: ActionKind::ShipPlayed,
        fire: fleet_bonus,
    },
    Rule {
        name: "scrap_abilities",
        trigger: ActionKind::CardScrapped,
        fire: scrap_abilities,
    },
    Rule {
        name: "row_refill_after_scrap",
        trigger: ActionKind::CardScrapped,
        fire: row_refill_after_scrap,
    },
    Rule {
        name: "row_refill_after_purchase",
        trigger: ActionKind::CardPurchased,
        fire: row_refill_after_purchase,
    },
    Rule {
        name: "draw_expansion",
        trigger: ActionKind::CardsDrawn,
        fire: draw_expansion,
    },
    Rule {
        name: "reshuffle_on_empty",
        trigger: ActionKind::DrawOne,
        fire: reshuffle_on_empty,
    },
    Rule {
        name: "cleanup_sequence",
        trigger: ActionKind::PhaseChanged,
        fire: cleanup_sequence,
    },
    Rule {
        name: "turn_start_bases",
        trigger: ActionKind::TurnAdvanced,
        fire: turn_start_bases,
    },
    Rule {
        name: "multi_base_draw",
        trigger: ActionKind::TwoOrMoreBasesInPlay,
        fire: multi_base_draw,
    },
    Rule {
        name: "faction_count_draw",
        trigger: ActionKind::DrawPerFactionPlayed,
        fire: faction_count_draw,
    },
    Rule {
        name: "discard_or_scrap_prompt",
        trigger: ActionKind::DiscardOrScrapAndDrawChosen,
        fire: discard_or_scrap_prompt,
    },
    Rule {
        name: "discard_or_scrap_resolution",
        trigger: ActionKind::DiscardOrScrapAndDrawResolved,
        fire: discard_or_scrap_resolution,
    },
    Rule {
        name: "copy_ship",
        trigger: ActionKind::TargetCardChosen,
        fire: copy_ship,
    },
    Rule {
        name: "ally_recheck",
        trigger: ActionKind::AllyAbilitiesChecked,
        fire: ally_recheck,
    },
    Rule {
        name: "elimination",
        trigger: ActionKind::DamageDealt,
        fire: elimination,
    },
    Rule {
        name: "elimination",
        trigger: ActionKind::AuthorityAdded,
        fire: elimination,
    },
    Rule {
        name: "game_over",
        trigger: ActionKind::PlayerEliminated,
        fire: game_over,
    },
];

/// Rules bound to `kind`, in table order
pub fn rules_for(kind: ActionKind) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |r| r.trigger == kind)
}

/// Follow-ups produced by one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired {
    pub rule: &'static str,
    pub events: Vec<GameAction>,
}

/// Run every rule bound to `action`'s kind; rules that emit nothing are left out
pub fn run_rules(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<Fired>> {
    let mut fired = Vec::new();
    for rule in rules_for(action.kind()) {
        let events = (rule.fire)(ctx, action)?;
        if !events.is_empty() {
            fired.push(Fired {
                rule: rule.name,
                events,
            });
        }
    }
    Ok(fired)
}

// ---------------------------------------------------------------------------
// Effect expansion
// ---------------------------------------------------------------------------

/// Append the follow-up events for one effect
fn push_effect(ctx: &mut RuleContext<'_>, player: &PlayerId, source: &CardId, effect: &Effect, out: &mut Vec<GameAction>) {
    let player = player.clone();
    match effect {
        Effect::AddTrade { amount } => out.push(GameAction::TradeAdded {
            player,
            amount: *amount,
        }),
        Effect::AddCombat { amount } => out.push(GameAction::CombatAdded {
            player,
            amount: *amount,
        }),
        Effect::AddAuthority { amount } => out.push(GameAction::AuthorityAdded {
            player,
            amount: *amount,
        }),
        Effect::DrawCards { amount } => out.push(GameAction::CardsDrawn {
            player,
            count: *amount,
        }),
        // Marker only; the scrap itself is a player action
        Effect::ScrapSelf => {}
        Effect::NextAcquireTop => out.push(GameAction::NextAcquireToTopSet { player }),
        Effect::NextAcquireFree => out.push(GameAction::NextAcquireFreeSet { player }),
        Effect::MultiBaseCondition { amount } => out.push(GameAction::TwoOrMoreBasesInPlay {
            player,
            amount: *amount,
        }),
        Effect::AddAllFactionTags => {
            for faction in [Faction::Blob, Faction::TradeFederation, Faction::StarEmpire] {
                out.push(GameAction::FactionTagAdded {
                    player: player.clone(),
                    faction,
                });
            }
        }
        Effect::ScrapAndDraw { max_cards } => out.push(GameAction::DiscardOrScrapAndDrawChosen {
            player,
            action: DiscardOrScrap::Scrap,
            max_cards: *max_cards,
        }),
        Effect::DrawPerFactionPlayed { faction } => out.push(GameAction::DrawPerFactionPlayed {
            player,
            faction: *faction,
        }),
        Effect::Prompt { kind, optional } => {
            if ctx.take_prompt_budget() {
                out.push(GameAction::PromptShown {
                    player,
                    kind: *kind,
                    optional: *optional,
                    source: Some(source.clone()),
                });
            }
        }
    }
}

fn push_trigger(
    ctx: &mut RuleContext<'_>,
    player: &PlayerId,
    card: &CardDef,
    trigger: Trigger,
    out: &mut Vec<GameAction>,
) {
    for effect in card.effects(trigger) {
        push_effect(ctx, player, &card.id, effect, out);
    }
}

/// Fire `card`'s ally effects if its faction counter reaches two
fn push_ally(ctx: &mut RuleContext<'_>, player: &PlayerId, card: &CardDef, out: &mut Vec<GameAction>) -> Result<()> {
    if !card.faction.is_aligned() || !card.has_trigger(Trigger::OnAlly) {
        return Ok(());
    }
    if ctx.state.faction_count(player, card.faction, ctx.registry)? >= 2 {
        push_trigger(ctx, player, card, Trigger::OnAlly, out);
    }
    Ok(())
}

/// On-play then ally effects for a card that just entered play
fn play_effects(ctx: &mut RuleContext<'_>, player: &PlayerId, card: &CardDef, out: &mut Vec<GameAction>) -> Result<()> {
    // Offer "scrap me?" unless one of the card's own prompts needs the slot
    let has_own_prompt = card
        .effects(Trigger::OnPlay)
        .chain(card.effects(Trigger::OnAlly))
        .any(Effect::is_prompt);
    if card.is_self_scrappable() && !has_own_prompt && ctx.take_prompt_budget() {
        out.push(GameAction::PromptShown {
            player: player.clone(),
            kind: PromptKind::ScrapSelf,
            optional: true,
            source: Some(card.id.clone()),
        });
    }

    push_trigger(ctx, player, card, Trigger::OnPlay, out);
    push_ally(ctx, player, card, out)
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn card_abilities(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::CardPlayed { player, .. } = action else {
        return Ok(Vec::new());
    };
    if !ctx.applied() {
        return Ok(Vec::new());
    }
    let Some(card) = ctx.state.player(player).and_then(|p| p.in_play.peek_top()) else {
        return Ok(Vec::new());
    };
    let def = ctx.registry.get(card)?;

    let mut out = vec![GameAction::ShipPlayed {
        player: player.clone(),
        card: def.id.clone(),
    }];
    play_effects(ctx, player, def, &mut out)?;
    Ok(out)
}

fn base_abilities(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::BasePlayed { player, .. } = action else {
        return Ok(Vec::new());
    };
    if !ctx.applied() {
        return Ok(Vec::new());
    }
    let Some(base) = ctx.state.player(player).and_then(|p| p.bases.last()) else {
        return Ok(Vec::new());
    };
    let def = ctx.registry.get(&base.card)?;

    let mut out = Vec::new();
    play_effects(ctx, player, def, &mut out)?;
    Ok(out)
}

fn base_activation(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::BaseActivated { player, base_index } = action else {
        return Ok(Vec::new());
    };
    if !ctx.applied() {
        return Ok(Vec::new());
    }
    let Some(base) = ctx.state.player(player).and_then(|p| p.bases.get(*base_index)) else {
        return Ok(Vec::new());
    };
    let def = ctx.registry.get(&base.card)?;

    let mut out = Vec::new();
    push_trigger(ctx, player, def, Trigger::OnPlay, &mut out);
    push_ally(ctx, player, def, &mut out)?;
    Ok(out)
}

fn fleet_bonus(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::ShipPlayed { player, .. } = action else {
        return Ok(Vec::new());
    };
    if !ctx.applied() {
        return Ok(Vec::new());
    }
    let owns_hq = ctx
        .state
        .player(player)
        .map(|p| p.has_base(&ctx.config.fleet_bonus_base))
        .unwrap_or(false);
    if !owns_hq {
        return Ok(Vec::new());
    }
    Ok(vec![GameAction::CombatAdded {
        player: player.clone(),
        amount: 1,
    }])
}

fn scrap_abilities(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::CardScrapped { player, .. } = action else {
        return Ok(Vec::new());
    };
    if !ctx.applied() {
        return Ok(Vec::new());
    }
    // The card just scrapped sits on top of the pile
    let Some(card) = ctx.state.scrap_pile.peek_top() else {
        return Ok(Vec::new());
    };
    let def = ctx.registry.get(card)?;

    let mut out = Vec::new();
    push_trigger(ctx, player, def, Trigger::OnScrap, &mut out);
    Ok(out)
}

fn row_refill_after_scrap(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    match action {
        GameAction::CardScrapped {
            zone: Zone::Row,
            index,
            ..
        } if ctx.applied() => Ok(vec![GameAction::RowRefilled { slot: *index }]),
        _ => Ok(Vec::new()),
    }
}

fn row_refill_after_purchase(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    match action {
        // Only a purchase that actually went through empties its slot
        GameAction::CardPurchased {
            source: PurchaseSource::Row { slot },
            ..
        } if ctx.applied() => Ok(vec![GameAction::RowRefilled { slot: *slot }]),
        _ => Ok(Vec::new()),
    }
}

fn draw_expansion(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::CardsDrawn { player, count } = action else {
        return Ok(Vec::new());
    };
    if !ctx.applied() {
        return Ok(Vec::new());
    }
    Ok((0..*count).map(|_| GameAction::DrawOne { player: player.clone() }).collect())
}

fn reshuffle_on_empty(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::DrawOne { player } = action else {
        return Ok(Vec::new());
    };
    // Only a draw that failed needs a fresh deck
    if ctx.applied() {
        return Ok(Vec::new());
    }
    let Some(p) = ctx.state.player(player).filter(|p| !p.is_dead) else {
        return Ok(Vec::new());
    };
    if !p.deck.is_empty() || p.discard.is_empty() {
        return Ok(Vec::new());
    }

    let new_deck = ctx.shuffler.shuffle(p.discard.cards.clone());
    Ok(vec![
        GameAction::DeckShuffle {
            player: player.clone(),
            new_deck,
        },
        GameAction::DrawOne { player: player.clone() },
    ])
}

fn cleanup_sequence(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::PhaseChanged { phase: Phase::Cleanup } = action else {
        return Ok(Vec::new());
    };
    if !ctx.applied() {
        return Ok(Vec::new());
    }
    let Some(active) = ctx.state.active_player_id() else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(5);
    // An offer the outgoing player never took lapses with their turn
    if let Some(prompt) = &ctx.state.prompt {
        if prompt.optional && prompt.player == *active {
            out.push(GameAction::PromptCancelled { player: active.clone() });
        }
    }
    out.extend([
        GameAction::DiscardInPlayAndHand { player: active.clone() },
        GameAction::CardsDrawn {
            player: active.clone(),
            count: ctx.config.hand_size,
        },
        GameAction::TurnAdvanced,
        GameAction::PhaseChanged { phase: Phase::Main },
    ]);
    Ok(out)
}

fn turn_start_bases(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    if !matches!(action, GameAction::TurnAdvanced) || !ctx.applied() {
        return Ok(Vec::new());
    }
    // Only the incoming player's bases are readied
    match ctx.state.active_player() {
        Some(p) if !p.bases.is_empty() => Ok(vec![GameAction::BasesReadied { player: p.id.clone() }]),
        _ => Ok(Vec::new()),
    }
}

fn multi_base_draw(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::TwoOrMoreBasesInPlay { player, amount } = action else {
        return Ok(Vec::new());
    };
    if !ctx.applied() || *amount == 0 {
        return Ok(Vec::new());
    }
    let bases = ctx.state.player(player).map(|p| p.bases.len()).unwrap_or(0);
    if bases < 2 {
        return Ok(Vec::new());
    }
    Ok(vec![GameAction::CardsDrawn {
        player: player.clone(),
        count: *amount,
    }])
}

fn faction_count_draw(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::DrawPerFactionPlayed { player, faction } = action else {
        return Ok(Vec::new());
    };
    if !ctx.applied() {
        return Ok(Vec::new());
    }
    let count = ctx.state.played_this_turn_of(*faction, ctx.registry)?;
    if count == 0 {
        return Ok(Vec::new());
    }
    Ok(vec![GameAction::CardsDrawn {
        player: player.clone(),
        count,
    }])
}

fn discard_or_scrap_prompt(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::DiscardOrScrapAndDrawChosen {
        player,
        action: choice,
        max_cards,
    } = action
    else {
        return Ok(Vec::new());
    };
    if !ctx.applied() || !ctx.take_prompt_budget() {
        return Ok(Vec::new());
    }
    Ok(vec![GameAction::PromptShown {
        player: player.clone(),
        kind: PromptKind::DiscardOrScrapAndDraw {
            action: *choice,
            max_cards: *max_cards,
        },
        optional: true,
        source: None,
    }])
}

fn discard_or_scrap_resolution(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::DiscardOrScrapAndDrawResolved {
        player,
        action: choice,
        hand_indices,
    } = action
    else {
        return Ok(Vec::new());
    };
    if !ctx.applied() || hand_indices.is_empty() {
        return Ok(Vec::new());
    }

    // Highest index first so the lower ones stay valid
    let mut indices = hand_indices.clone();
    indices.sort_unstable_by(|a, b| b.cmp(a));

    let mut out: Vec<GameAction> = indices
        .iter()
        .map(|&i| match choice {
            DiscardOrScrap::Discard => GameAction::CardDiscarded {
                player: player.clone(),
                hand_index: i,
            },
            DiscardOrScrap::Scrap => GameAction::CardScrapped {
                player: player.clone(),
                zone: Zone::Hand,
                index: i,
            },
        })
        .collect();
    out.push(GameAction::CardsDrawn {
        player: player.clone(),
        count: indices.len() as u32,
    });
    Ok(out)
}

fn copy_ship(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::TargetCardChosen { player, in_play_index } = action else {
        return Ok(Vec::new());
    };
    if !ctx.applied() {
        return Ok(Vec::new());
    }
    let Some(target) = ctx.state.player(player).and_then(|p| p.in_play.get(*in_play_index)) else {
        return Ok(Vec::new());
    };
    let def = ctx.registry.get(target)?;

    let mut out = Vec::new();
    push_trigger(ctx, player, def, Trigger::OnPlay, &mut out);
    if def.faction.is_aligned() {
        out.push(GameAction::FactionTagAdded {
            player: player.clone(),
            faction: def.faction,
        });
    }
    // Deferred so the tag above is counted
    out.push(GameAction::AllyAbilitiesChecked {
        player: player.clone(),
        card: def.id.clone(),
    });
    Ok(out)
}

fn ally_recheck(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let GameAction::AllyAbilitiesChecked { player, card } = action else {
        return Ok(Vec::new());
    };
    if !ctx.applied() {
        return Ok(Vec::new());
    }
    let def = ctx.registry.get(card)?;
    let mut out = Vec::new();
    push_ally(ctx, player, def, &mut out)?;
    Ok(out)
}

fn elimination(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    let target = match action {
        GameAction::DamageDealt { defender, .. } => defender,
        GameAction::AuthorityAdded { player, .. } => player,
        _ => return Ok(Vec::new()),
    };
    if !ctx.applied() {
        return Ok(Vec::new());
    }
    match ctx.state.player(target) {
        Some(p) if p.authority == 0 && !p.is_dead => Ok(vec![GameAction::PlayerEliminated { player: target.clone() }]),
        _ => Ok(Vec::new()),
    }
}

fn game_over(ctx: &mut RuleContext<'_>, action: &GameAction) -> Result<Vec<GameAction>> {
    if !matches!(action, GameAction::PlayerEliminated { .. }) || !ctx.applied() {
        return Ok(Vec::new());
    }
    let mut live = ctx.state.live_players();
    match (live.next(), live.next()) {
        (Some(winner), None) => Ok(vec![GameAction::GameOver { winner: winner.clone() }]),
        _ => Ok(Vec::new()),
    }
}
