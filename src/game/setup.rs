//! Match initialization
//!
//! Builds the starting `GameState`: shuffled trade deck, explorer pile,
//! shuffled starter decks, opening hands and a full trade row. This is the
//! only place a `GameState` is built outside the reducer.

use crate::config::GameConfig;
use crate::core::{CardId, PlayerId};
use crate::game::{GameState, Shuffler};
use crate::loader::catalog::{EXPLORER, SCOUT, VIPER};
use crate::loader::CardRegistry;
use crate::{RealmsError, Result};
use std::collections::BTreeSet;

/// Game builder for a fresh match
pub struct GameInitializer<'a> {
    registry: &'a CardRegistry,
    config: &'a GameConfig,
}

impl<'a> GameInitializer<'a> {
    pub fn new(registry: &'a CardRegistry, config: &'a GameConfig) -> Self {
        GameInitializer { registry, config }
    }

    /// Set up a match for `players`, seated in the given order
    pub fn init_game(&self, players: &[PlayerId], shuffler: &mut dyn Shuffler) -> Result<GameState> {
        self.config.validate()?;

        if players.len() < 2 {
            return Err(RealmsError::InvalidConfig(format!(
                "a match needs at least two players, got {}",
                players.len()
            )));
        }
        let unique: BTreeSet<&PlayerId> = players.iter().collect();
        if unique.len() != players.len() {
            return Err(RealmsError::InvalidConfig("duplicate player id".to_string()));
        }

        // Every starter must resolve before any card is dealt
        for id in [SCOUT, VIPER, EXPLORER] {
            self.registry.get(&CardId::new(id))?;
        }

        let mut game = GameState::new(players.to_vec(), self.config.starting_authority);

        // Shared supply
        game.trade_deck.extend(shuffler.shuffle(self.registry.trade_deck_cards()));
        game.explorer_deck
            .extend(std::iter::repeat(CardId::new(EXPLORER)).take(self.config.explorer_count));

        // Personal decks and opening hands
        for (seat, player) in players.iter().enumerate() {
            let hand_size = if seat == 0 {
                self.config.first_player_hand
            } else {
                self.config.hand_size
            };
            let deck = shuffler.shuffle(self.starter_deck());

            if let Some(p) = game.player_mut(player) {
                p.deck.extend(deck);
                for _ in 0..hand_size {
                    match p.deck.draw_top() {
                        Some(card) => p.hand.add(card),
                        None => break,
                    }
                }
            }
        }

        // Seed the row; a short trade deck just means fewer slots
        for _ in 0..self.config.row_width {
            match game.trade_deck.draw_top() {
                Some(card) => game.row.push(Some(card)),
                None => break,
            }
        }

        Ok(game)
    }

    fn starter_deck(&self) -> Vec<CardId> {
        std::iter::repeat(CardId::new(SCOUT))
            .take(self.config.scouts_per_player)
            .chain(std::iter::repeat(CardId::new(VIPER)).take(self.config.vipers_per_player))
            .collect()
    }
}
