//! Orchestrator: folds events through the reducer and expands cascades
//!
//! `materialize` is the write path: it folds root events, runs the rules
//! after every reduction and returns the fully expanded log. `replay` is the
//! read path: a pure reducer fold over an already expanded log that never
//! consults the rules or the shuffler.

use crate::config::GameConfig;
use crate::core::PlayerId;
use crate::events::{GameAction, GameEvent};
use crate::game::reducer::{apply_event, Reduction};
use crate::game::rules::{run_rules, RuleContext};
use crate::game::{GameInitializer, GameLogger, GameState, SeededShuffler, Shuffler};
use crate::loader::CardRegistry;
use crate::{RealmsError, Result};
use std::collections::VecDeque;

/// Upper bound on events folded for a single root event
///
/// The longest legal cascade (a cleanup that reshuffles mid-draw) is a few
/// dozen events; anything near this means a rule loop.
pub const MAX_CASCADE: usize = 10_000;

/// Log a cascade event only when the verbose-logging feature is enabled
macro_rules! log_cascade {
    ($logger:expr, $root:expr, $msg:expr) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.event($root, &$msg);
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            if $root {
                $logger.event(true, &$msg);
            }
        }
    };
}

/// State plus the expanded log that produced it from the base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub state: GameState,
    /// Every applied root and cascade event, in fold order
    pub events: Vec<GameEvent>,
    /// Events the reducer rejected; they are not in `events`
    pub ignored: usize,
}

/// The rules engine for one match configuration
pub struct Engine<'a> {
    registry: &'a CardRegistry,
    config: GameConfig,
    shuffler: Box<dyn Shuffler + 'a>,
    logger: GameLogger,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a CardRegistry, config: GameConfig, shuffler: Box<dyn Shuffler + 'a>) -> Self {
        Engine {
            registry,
            config,
            shuffler,
            logger: GameLogger::new(),
        }
    }

    /// Standard engine: default config, ChaCha shuffler from `seed`
    pub fn seeded(registry: &'a CardRegistry, seed: u64) -> Self {
        Self::new(registry, GameConfig::default(), Box::new(SeededShuffler::new(seed)))
    }

    pub fn with_logger(mut self, logger: GameLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn logger(&self) -> &GameLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut GameLogger {
        &mut self.logger
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn registry(&self) -> &'a CardRegistry {
        self.registry
    }

    /// Initial state for a new match
    pub fn setup(&mut self, players: &[PlayerId]) -> Result<GameState> {
        let state = GameInitializer::new(self.registry, &self.config).init_game(players, self.shuffler.as_mut())?;
        self.logger.normal(&format!(
            "New match: {} players, {} cards in the trade deck",
            players.len(),
            state.trade_deck.len()
        ));
        Ok(state)
    }

    /// Set up a fresh match and fold `events` (unexpanded roots) atop it
    pub fn recompute(&mut self, events: &[GameEvent], players: &[PlayerId]) -> Result<Materialized> {
        let base = self.setup(players)?;
        self.materialize(&base, events)
    }

    /// Fold `roots` and their cascades onto a copy of `base`
    pub fn materialize(&mut self, base: &GameState, roots: &[GameEvent]) -> Result<Materialized> {
        let mut state = base.clone();
        let mut events = Vec::with_capacity(roots.len() * 4);
        let mut ignored = 0;
        for root in roots {
            ignored += self.fold_root(&mut state, root, &mut events)?;
        }
        Ok(Materialized { state, events, ignored })
    }

    /// Only the expanded log of `materialize`
    pub fn expand(&mut self, base: &GameState, roots: &[GameEvent]) -> Result<Vec<GameEvent>> {
        Ok(self.materialize(base, roots)?.events)
    }

    /// Fold one root event and its cascade into `state`, appending every
    /// applied event to `out`
    ///
    /// Rejected events still run the rules (a failed draw asks for a
    /// reshuffle) but stay out of the log. Returns how many were rejected.
    pub fn fold_root(&mut self, state: &mut GameState, root: &GameEvent, out: &mut Vec<GameEvent>) -> Result<usize> {
        check_players(state, &root.action)?;

        let mut queue: VecDeque<(GameEvent, bool)> = VecDeque::new();
        queue.push_back((root.clone(), true));
        let mut folded = 0usize;
        let mut ignored = 0usize;

        while let Some((event, is_root)) = queue.pop_front() {
            folded += 1;
            if folded > MAX_CASCADE {
                return Err(RealmsError::CascadeLimit(folded));
            }

            let outcome = apply_event(state, &event, self.registry)?;
            match outcome {
                Reduction::Applied => {
                    log_cascade!(self.logger, is_root, event.action.describe());
                    self.log_milestone(&event.action);
                }
                Reduction::Rejected => {
                    ignored += 1;
                    self.logger.ignored(&event.action.describe());
                }
            }

            let fired = {
                let mut ctx = RuleContext::new(state, self.registry, &self.config, outcome, self.shuffler.as_mut());
                run_rules(&mut ctx, &event.action)?
            };

            // Depth-first: this event's follow-ups run before anything queued earlier
            let mut follow_ups = Vec::new();
            for f in fired {
                self.logger.rule_fired(f.rule, f.events.len());
                follow_ups.extend(f.events);
            }
            for action in follow_ups.into_iter().rev() {
                queue.push_front((action.at(event.timestamp), false));
            }

            if outcome.is_applied() {
                out.push(event);
            }
        }
        Ok(ignored)
    }

    /// Pure reducer fold; see [`replay`]
    pub fn replay(&self, base: &GameState, events: &[GameEvent]) -> Result<GameState> {
        replay(base, events, self.registry)
    }

    fn log_milestone(&self, action: &GameAction) {
        if matches!(action, GameAction::PlayerEliminated { .. } | GameAction::GameOver { .. }) {
            self.logger.minimal(&action.describe());
        }
    }
}

/// Rebuild a state from a fully expanded log without running any rule
///
/// Deterministic: every shuffle is already baked into the `DeckShuffle`
/// payloads.
pub fn replay(base: &GameState, events: &[GameEvent], registry: &CardRegistry) -> Result<GameState> {
    let mut state = base.clone();
    for event in events {
        apply_event(&mut state, event, registry)?;
    }
    Ok(state)
}

/// Every player a root event names must be seated
fn check_players(state: &GameState, action: &GameAction) -> Result<()> {
    let mut named: Vec<&PlayerId> = action.player().into_iter().collect();
    match action {
        GameAction::DamageDealt { defender, .. } => named.push(defender),
        GameAction::BaseDamaged { owner, .. } | GameAction::BaseChosenToDestroy { owner, .. } => named.push(owner),
        _ => {}
    }
    for id in named {
        if !state.players.contains_key(id) {
            return Err(RealmsError::UnknownPlayer(id.to_string()));
        }
    }
    Ok(())
}
