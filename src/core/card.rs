//! Card definitions
//!
//! A `CardDef` is registry-owned static data. Zones never hold definitions,
//! only `CardId`s that resolve against the registry.

use crate::core::{Ability, CardId, CardName, Effect, Trigger};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card factions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Blob,
    TradeFederation,
    StarEmpire,
    MachineCult,
    /// Starter cards and explorers
    Unaligned,
}

impl Faction {
    pub const ALIGNED: [Faction; 4] = [
        Faction::Blob,
        Faction::TradeFederation,
        Faction::StarEmpire,
        Faction::MachineCult,
    ];

    pub fn is_aligned(self) -> bool {
        self != Faction::Unaligned
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Blob => write!(f, "Blob"),
            Faction::TradeFederation => write!(f, "Trade Federation"),
            Faction::StarEmpire => write!(f, "Star Empire"),
            Faction::MachineCult => write!(f, "Machine Cult"),
            Faction::Unaligned => write!(f, "Unaligned"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Ship,
    Base,
}

/// Outposts must be destroyed before their owner or other bases can be attacked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shield {
    Outpost,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub shield: Shield,
    pub defence: u32,
}

/// Static definition of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDef {
    pub id: CardId,
    pub name: CardName,
    pub cost: u32,
    pub faction: Faction,
    pub card_type: CardType,

    /// Present exactly when `card_type` is `Base`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<BaseStats>,

    #[serde(default)]
    pub abilities: Vec<Ability>,
}

impl CardDef {
    pub fn ship(id: &str, name: &str, cost: u32, faction: Faction) -> Self {
        CardDef {
            id: CardId::new(id),
            name: CardName::new(name),
            cost,
            faction,
            card_type: CardType::Ship,
            base: None,
            abilities: Vec::new(),
        }
    }

    pub fn base(id: &str, name: &str, cost: u32, faction: Faction, shield: Shield, defence: u32) -> Self {
        CardDef {
            id: CardId::new(id),
            name: CardName::new(name),
            cost,
            faction,
            card_type: CardType::Base,
            base: Some(BaseStats { shield, defence }),
            abilities: Vec::new(),
        }
    }

    pub fn on_play(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.abilities.push(Ability::new(Trigger::OnPlay, effects));
        self
    }

    pub fn on_ally(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.abilities.push(Ability::new(Trigger::OnAlly, effects));
        self
    }

    /// Scrap abilities are always player-activated, so the list is led by
    /// the `ScrapSelf` marker.
    pub fn on_scrap(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        let effects = std::iter::once(Effect::ScrapSelf).chain(effects);
        self.abilities.push(Ability::new(Trigger::OnScrap, effects));
        self
    }

    pub fn is_ship(&self) -> bool {
        self.card_type == CardType::Ship
    }

    pub fn is_base(&self) -> bool {
        self.card_type == CardType::Base
    }

    pub fn is_outpost(&self) -> bool {
        matches!(
            self.base,
            Some(BaseStats {
                shield: Shield::Outpost,
                ..
            })
        )
    }

    /// Defence of a base, 0 for ships
    pub fn defence(&self) -> u32 {
        self.base.map(|b| b.defence).unwrap_or(0)
    }

    pub fn has_trigger(&self, trigger: Trigger) -> bool {
        self.abilities.iter().any(|a| a.trigger == trigger)
    }

    /// All effects bound to `trigger`, in ability then effect order
    pub fn effects(&self, trigger: Trigger) -> impl Iterator<Item = &Effect> + '_ {
        self.abilities
            .iter()
            .filter(move |a| a.trigger == trigger)
            .flat_map(|a| a.effects.iter())
    }

    /// Whether the card offers a "scrap me" choice when played
    pub fn is_self_scrappable(&self) -> bool {
        self.abilities
            .iter()
            .any(|a| a.effects.iter().any(|e| *e == Effect::ScrapSelf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_builder() {
        let ram = CardDef::ship("ram", "Ram", 3, Faction::Blob)
            .on_play([Effect::combat(5)])
            .on_ally([Effect::combat(2)])
            .on_scrap([Effect::trade(3)]);

        assert!(ram.is_ship());
        assert!(!ram.is_outpost());
        assert_eq!(ram.defence(), 0);
        assert!(ram.is_self_scrappable());
        assert!(ram.has_trigger(Trigger::OnAlly));

        let scrap: Vec<_> = ram.effects(Trigger::OnScrap).cloned().collect();
        assert_eq!(scrap, vec![Effect::ScrapSelf, Effect::trade(3)]);
    }

    #[test]
    fn test_base_builder() {
        let station = CardDef::base("space_station", "Space Station", 4, Faction::StarEmpire, Shield::Outpost, 4)
            .on_play([Effect::combat(2)]);

        assert!(station.is_base());
        assert!(station.is_outpost());
        assert_eq!(station.defence(), 4);
        assert!(!station.is_self_scrappable());
    }

    #[test]
    fn test_effects_in_ability_order() {
        let card = CardDef::ship("x", "X", 1, Faction::Blob)
            .on_play([Effect::trade(1)])
            .on_ally([Effect::draw(1)])
            .on_play([Effect::combat(2)]);

        let on_play: Vec<_> = card.effects(Trigger::OnPlay).cloned().collect();
        assert_eq!(on_play, vec![Effect::trade(1), Effect::combat(2)]);
    }
}
