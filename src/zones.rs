//! Card zones (deck, hand, discard, in-play, bases, trade row)

use crate::core::CardId;
use serde::{Deserialize, Serialize};

/// Zones a card can be scrapped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// The shared trade row
    Row,
    Hand,
    Discard,
    InPlay,
    Bases,
}

/// An ordered pile of card ids
///
/// Order matters for every pile: the end of the sequence is the "top", so a
/// deck draws by popping from the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardZone {
    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new() -> Self {
        CardZone { cards: Vec::new() }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.cards.extend(cards);
    }

    pub fn get(&self, index: usize) -> Option<&CardId> {
        self.cards.get(index)
    }

    /// Remove the card at `index`, keeping the order of the rest.
    /// Out-of-range indices remove nothing.
    pub fn remove_at(&mut self, index: usize) -> Option<CardId> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    pub fn contains(&self, card_id: &CardId) -> bool {
        self.cards.contains(card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw from top
    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    /// Look at top card without removing it
    pub fn peek_top(&self) -> Option<&CardId> {
        self.cards.last()
    }

    /// Empty the zone, returning its cards in order
    pub fn take_all(&mut self) -> Vec<CardId> {
        std::mem::take(&mut self.cards)
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardId> {
        self.cards.iter()
    }
}

impl From<Vec<CardId>> for CardZone {
    fn from(cards: Vec<CardId>) -> Self {
        CardZone { cards }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_zone() {
        let mut zone = CardZone::new();
        assert!(zone.is_empty());

        zone.add(CardId::new("scout"));
        zone.add(CardId::new("viper"));

        assert_eq!(zone.len(), 2);
        assert!(zone.contains(&CardId::new("scout")));

        assert_eq!(zone.remove_at(0), Some(CardId::new("scout")));
        assert_eq!(zone.remove_at(5), None);
        assert_eq!(zone.cards, vec![CardId::new("viper")]);
    }

    #[test]
    fn test_deck_operations() {
        let mut deck = CardZone::from(vec![
            CardId::new("bottom"),
            CardId::new("middle"),
            CardId::new("top"),
        ]);

        assert_eq!(deck.peek_top(), Some(&CardId::new("top")));
        assert_eq!(deck.draw_top(), Some(CardId::new("top")));
        assert_eq!(deck.draw_top(), Some(CardId::new("middle")));
        assert_eq!(deck.draw_top(), Some(CardId::new("bottom")));
        assert_eq!(deck.draw_top(), None);
    }

    #[test]
    fn test_take_all() {
        let mut zone = CardZone::from(vec![CardId::new("a"), CardId::new("b")]);
        let taken = zone.take_all();
        assert_eq!(taken, vec![CardId::new("a"), CardId::new("b")]);
        assert!(zone.is_empty());
    }
}
