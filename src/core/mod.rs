//! Core game types: card data, abilities, players

pub mod card;
pub mod effects;
pub mod player;
pub mod types;

pub use card::{BaseStats, CardDef, CardType, Faction, Shield};
pub use effects::{Ability, DiscardOrScrap, Effect, PromptKind, Trigger};
pub use player::{AcquireLocation, BaseInstance, PlayerState};
pub use types::{CardId, CardName, PlayerId};
