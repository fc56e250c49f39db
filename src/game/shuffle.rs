//! Shuffle primitive
//!
//! Shuffles happen only while expanding root events or during setup. The
//! result is baked into `DeckShuffle` payloads, so replay never needs an RNG.

use crate::core::CardId;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Produces a permutation of a card sequence
pub trait Shuffler {
    fn shuffle(&mut self, cards: Vec<CardId>) -> Vec<CardId>;
}

/// Lend a shuffler to an engine while keeping ownership of its state
impl<S: Shuffler + ?Sized> Shuffler for &mut S {
    fn shuffle(&mut self, cards: Vec<CardId>) -> Vec<CardId> {
        (**self).shuffle(cards)
    }
}

/// Fisher-Yates over a seeded ChaCha stream
///
/// The RNG state serializes with the snapshot, so a saved match keeps
/// shuffling the same way after it is reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededShuffler {
    rng: ChaCha12Rng,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        SeededShuffler {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededShuffler {
    fn default() -> Self {
        SeededShuffler::new(0)
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle(&mut self, mut cards: Vec<CardId>) -> Vec<CardId> {
        cards.shuffle(&mut self.rng);
        cards
    }
}

/// Leaves the order untouched; useful for scripted tests
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityShuffler;

impl Shuffler for IdentityShuffler {
    fn shuffle(&mut self, cards: Vec<CardId>) -> Vec<CardId> {
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(n: usize) -> Vec<CardId> {
        (0..n).map(|i| CardId::new(format!("c{i}"))).collect()
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = SeededShuffler::new(42);
        let mut b = SeededShuffler::new(42);
        assert_eq!(a.shuffle(cards(20)), b.shuffle(cards(20)));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut shuffler = SeededShuffler::new(7);
        let mut shuffled = shuffler.shuffle(cards(20));
        shuffled.sort();
        let mut expected = cards(20);
        expected.sort();
        assert_eq!(shuffled, expected);
    }

    #[test]
    fn test_rng_state_survives_serde() {
        let mut original = SeededShuffler::new(9);
        original.shuffle(cards(5));

        let json = serde_json::to_string(&original).unwrap();
        let mut restored: SeededShuffler = serde_json::from_str(&json).unwrap();

        assert_eq!(original.shuffle(cards(10)), restored.shuffle(cards(10)));
    }
}
