//! Ability registry: read-only lookup from card id to definition
//!
//! The registry is loaded once and never mutated while a game runs. The
//! engine only ever borrows it immutably.

use crate::core::{CardDef, CardId};
use crate::{RealmsError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// How many copies of a card go into the shared trade deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeDeckEntry {
    pub card: CardId,
    pub copies: u32,
}

/// On-disk form of a registry
#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    cards: Vec<CardDef>,
    #[serde(default)]
    trade_deck: Vec<TradeDeckEntry>,
}

/// Database of card definitions
#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDef>,
    trade_deck: Vec<TradeDeckEntry>,
}

static STANDARD: OnceLock<CardRegistry> = OnceLock::new();

impl CardRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        CardRegistry {
            cards: FxHashMap::default(),
            trade_deck: Vec::new(),
        }
    }

    /// The process-wide base-set registry, built on first use
    pub fn standard() -> &'static CardRegistry {
        STANDARD.get_or_init(crate::loader::catalog::standard_registry)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(json)?;
        let mut registry = CardRegistry::new();
        for card in file.cards {
            if registry.contains(&card.id) {
                return Err(RealmsError::InvalidRegistry(format!("duplicate card id {}", card.id)));
            }
            registry.add_card(card);
        }
        registry.trade_deck = file.trade_deck;
        registry.validate()?;
        Ok(registry)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        let mut cards: Vec<CardDef> = self.cards.values().cloned().collect();
        cards.sort_by(|a, b| a.id.cmp(&b.id));
        let file = RegistryFile {
            cards,
            trade_deck: self.trade_deck.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Check the structural invariants of every definition
    pub fn validate(&self) -> Result<()> {
        for card in self.cards.values() {
            if card.is_base() && card.base.is_none() {
                return Err(RealmsError::InvalidRegistry(format!("base {} has no defence", card.id)));
            }
            if card.is_ship() && card.base.is_some() {
                return Err(RealmsError::InvalidRegistry(format!("ship {} has base stats", card.id)));
            }
        }
        for entry in &self.trade_deck {
            self.get(&entry.card)?;
        }
        Ok(())
    }

    /// Add a single card definition
    pub fn add_card(&mut self, card: CardDef) {
        self.cards.insert(card.id.clone(), card);
    }

    pub fn add_to_trade_deck(&mut self, card: &str, copies: u32) {
        self.trade_deck.push(TradeDeckEntry {
            card: CardId::new(card),
            copies,
        });
    }

    /// Look up a card; an unknown id is a configuration error
    pub fn get(&self, id: &CardId) -> Result<&CardDef> {
        self.cards
            .get(id)
            .ok_or_else(|| RealmsError::UnknownCard(id.to_string()))
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All definitions sorted by id
    pub fn cards(&self) -> Vec<&CardDef> {
        let mut cards: Vec<&CardDef> = self.cards.values().collect();
        cards.sort_by(|a, b| a.id.cmp(&b.id));
        cards
    }

    pub fn trade_deck(&self) -> &[TradeDeckEntry] {
        &self.trade_deck
    }

    /// The trade deck expanded to one id per copy, in registry order
    pub fn trade_deck_cards(&self) -> Vec<CardId> {
        self.trade_deck
            .iter()
            .flat_map(|e| std::iter::repeat(e.card.clone()).take(e.copies as usize))
            .collect()
    }
}
