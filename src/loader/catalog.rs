//! Base-set card catalog
//!
//! Cards with an either/or primary ability in print are given their most
//! commonly chosen option, since the registry has no branching effects.

use crate::core::{CardDef, DiscardOrScrap, Effect, Faction, PromptKind, Shield};
use crate::loader::CardRegistry;

pub const SCOUT: &str = "scout";
pub const VIPER: &str = "viper";
pub const EXPLORER: &str = "explorer";
pub const FLEET_HQ: &str = "fleet_hq";

fn starter_cards() -> Vec<CardDef> {
    vec![
        CardDef::ship(SCOUT, "Scout", 0, Faction::Unaligned).on_play([Effect::trade(1)]),
        CardDef::ship(VIPER, "Viper", 0, Faction::Unaligned).on_play([Effect::combat(1)]),
        CardDef::ship(EXPLORER, "Explorer", 2, Faction::Unaligned)
            .on_play([Effect::trade(2)])
            .on_scrap([Effect::combat(2)]),
    ]
}

fn blob_cards() -> Vec<(CardDef, u32)> {
    use Faction::Blob;
    vec![
        (
            CardDef::ship("blob_fighter", "Blob Fighter", 1, Blob)
                .on_play([Effect::combat(3)])
                .on_ally([Effect::draw(1)]),
            3,
        ),
        (
            CardDef::ship("trade_pod", "Trade Pod", 2, Blob)
                .on_play([Effect::trade(3)])
                .on_ally([Effect::combat(2)]),
            3,
        ),
        (
            CardDef::ship("battle_pod", "Battle Pod", 2, Blob)
                .on_play([Effect::combat(4), Effect::may(PromptKind::ScrapFromTradeRow)])
                .on_ally([Effect::combat(2)]),
            2,
        ),
        (
            CardDef::ship("ram", "Ram", 3, Blob)
                .on_play([Effect::combat(5)])
                .on_ally([Effect::combat(2)])
                .on_scrap([Effect::trade(3)]),
            2,
        ),
        (
            CardDef::ship("blob_destroyer", "Blob Destroyer", 4, Blob)
                .on_play([Effect::combat(6)])
                .on_ally([Effect::may(PromptKind::DestroyBase)]),
            2,
        ),
        (
            CardDef::ship("battle_blob", "Battle Blob", 6, Blob)
                .on_play([Effect::combat(8)])
                .on_ally([Effect::draw(1)])
                .on_scrap([Effect::combat(4)]),
            1,
        ),
        (
            CardDef::ship("blob_carrier", "Blob Carrier", 6, Blob)
                .on_play([Effect::combat(7)])
                .on_ally([Effect::NextAcquireFree, Effect::NextAcquireTop]),
            1,
        ),
        (
            CardDef::ship("mothership", "Mothership", 7, Blob)
                .on_play([Effect::combat(6), Effect::draw(1)])
                .on_ally([Effect::draw(1)]),
            1,
        ),
        (
            CardDef::base("blob_wheel", "Blob Wheel", 3, Blob, Shield::Normal, 5)
                .on_play([Effect::combat(1)])
                .on_scrap([Effect::trade(3)]),
            3,
        ),
        (
            CardDef::base("the_hive", "The Hive", 5, Blob, Shield::Normal, 5)
                .on_play([Effect::combat(3)])
                .on_ally([Effect::draw(1)]),
            1,
        ),
        (
            CardDef::base("blob_world", "Blob World", 8, Blob, Shield::Normal, 7)
                .on_play([Effect::DrawPerFactionPlayed { faction: Blob }]),
            1,
        ),
    ]
}

fn trade_federation_cards() -> Vec<(CardDef, u32)> {
    use Faction::TradeFederation as Tf;
    vec![
        (
            CardDef::ship("federation_shuttle", "Federation Shuttle", 1, Tf)
                .on_play([Effect::trade(2)])
                .on_ally([Effect::authority(4)]),
            3,
        ),
        (
            CardDef::ship("cutter", "Cutter", 2, Tf)
                .on_play([Effect::authority(4), Effect::trade(2)])
                .on_ally([Effect::combat(4)]),
            3,
        ),
        (
            CardDef::ship("embassy_yacht", "Embassy Yacht", 3, Tf).on_play([
                Effect::authority(3),
                Effect::trade(2),
                Effect::MultiBaseCondition { amount: 2 },
            ]),
            2,
        ),
        (
            CardDef::ship("freighter", "Freighter", 4, Tf)
                .on_play([Effect::trade(4)])
                .on_ally([Effect::NextAcquireTop]),
            2,
        ),
        (
            CardDef::ship("trade_escort", "Trade Escort", 5, Tf)
                .on_play([Effect::authority(4), Effect::combat(4)])
                .on_ally([Effect::draw(1)]),
            1,
        ),
        (
            CardDef::ship("flagship", "Flagship", 6, Tf)
                .on_play([Effect::combat(5), Effect::draw(1)])
                .on_ally([Effect::authority(5)]),
            1,
        ),
        (
            CardDef::ship("command_ship", "Command Ship", 8, Tf)
                .on_play([Effect::authority(4), Effect::combat(5), Effect::draw(2)])
                .on_ally([Effect::may(PromptKind::DestroyBase)]),
            1,
        ),
        (
            CardDef::base("trading_post", "Trading Post", 3, Tf, Shield::Outpost, 4)
                .on_play([Effect::trade(1)])
                .on_scrap([Effect::combat(3)]),
            2,
        ),
        (
            CardDef::base("barter_world", "Barter World", 4, Tf, Shield::Normal, 4)
                .on_play([Effect::trade(2)])
                .on_scrap([Effect::combat(5)]),
            2,
        ),
        (
            CardDef::base("defense_center", "Defense Center", 5, Tf, Shield::Outpost, 5)
                .on_play([Effect::authority(3)])
                .on_ally([Effect::combat(2)]),
            1,
        ),
        (
            CardDef::base("port_of_call", "Port of Call", 6, Tf, Shield::Outpost, 6)
                .on_play([Effect::trade(3)])
                .on_scrap([Effect::draw(1), Effect::may(PromptKind::DestroyBase)]),
            1,
        ),
        (
            CardDef::base("central_office", "Central Office", 7, Tf, Shield::Normal, 6)
                .on_play([Effect::trade(2), Effect::NextAcquireTop])
                .on_ally([Effect::draw(1)]),
            1,
        ),
    ]
}

fn star_empire_cards() -> Vec<(CardDef, u32)> {
    use Faction::StarEmpire as Se;
    vec![
        (
            CardDef::ship("imperial_fighter", "Imperial Fighter", 1, Se)
                .on_play([Effect::combat(2), Effect::must(PromptKind::OpponentDiscards)])
                .on_ally([Effect::combat(2)]),
            3,
        ),
        (
            CardDef::ship("corvette", "Corvette", 2, Se)
                .on_play([Effect::combat(1), Effect::draw(1)])
                .on_ally([Effect::combat(2)]),
            2,
        ),
        (
            CardDef::ship("imperial_frigate", "Imperial Frigate", 3, Se)
                .on_play([Effect::combat(4), Effect::must(PromptKind::OpponentDiscards)])
                .on_ally([Effect::combat(2)])
                .on_scrap([Effect::draw(1)]),
            3,
        ),
        (
            CardDef::ship("survey_ship", "Survey Ship", 3, Se)
                .on_play([Effect::trade(1), Effect::draw(1)])
                .on_scrap([Effect::must(PromptKind::OpponentDiscards)]),
            3,
        ),
        (
            CardDef::ship("battlecruiser", "Battlecruiser", 6, Se)
                .on_play([Effect::combat(5), Effect::draw(1)])
                .on_ally([Effect::must(PromptKind::OpponentDiscards)])
                .on_scrap([Effect::draw(1), Effect::may(PromptKind::DestroyBase)]),
            1,
        ),
        (
            CardDef::ship("dreadnaught", "Dreadnaught", 7, Se)
                .on_play([Effect::combat(7), Effect::draw(1)])
                .on_scrap([Effect::combat(5)]),
            1,
        ),
        (
            CardDef::base("space_station", "Space Station", 4, Se, Shield::Outpost, 4)
                .on_play([Effect::combat(2)])
                .on_ally([Effect::combat(2)])
                .on_scrap([Effect::trade(4)]),
            2,
        ),
        (
            CardDef::base("recycling_station", "Recycling Station", 4, Se, Shield::Outpost, 4).on_play([
                Effect::may(PromptKind::DiscardOrScrapAndDraw {
                    action: DiscardOrScrap::Discard,
                    max_cards: 2,
                }),
            ]),
            2,
        ),
        (
            CardDef::base("war_world", "War World", 5, Se, Shield::Outpost, 4)
                .on_play([Effect::combat(3)])
                .on_ally([Effect::combat(4)]),
            1,
        ),
        (
            CardDef::base("royal_redoubt", "Royal Redoubt", 6, Se, Shield::Outpost, 6)
                .on_play([Effect::combat(3)])
                .on_ally([Effect::must(PromptKind::OpponentDiscards)]),
            1,
        ),
        (
            CardDef::base(FLEET_HQ, "Fleet HQ", 8, Se, Shield::Normal, 8),
            1,
        ),
    ]
}

fn machine_cult_cards() -> Vec<(CardDef, u32)> {
    use Faction::MachineCult as Mc;
    vec![
        (
            CardDef::ship("trade_bot", "Trade Bot", 1, Mc)
                .on_play([Effect::trade(1), Effect::may(PromptKind::ScrapFromHandOrDiscard)])
                .on_ally([Effect::combat(2)]),
            3,
        ),
        (
            CardDef::ship("missile_bot", "Missile Bot", 2, Mc)
                .on_play([Effect::combat(2), Effect::may(PromptKind::ScrapFromHandOrDiscard)])
                .on_ally([Effect::combat(2)]),
            3,
        ),
        (
            CardDef::ship("supply_bot", "Supply Bot", 3, Mc)
                .on_play([Effect::trade(2), Effect::may(PromptKind::ScrapFromHandOrDiscard)])
                .on_ally([Effect::combat(2)]),
            3,
        ),
        (
            CardDef::ship("patrol_mech", "Patrol Mech", 4, Mc)
                .on_play([Effect::trade(3)])
                .on_ally([Effect::may(PromptKind::ScrapFromHandOrDiscard)]),
            2,
        ),
        (
            CardDef::ship("stealth_needle", "Stealth Needle", 4, Mc).on_play([Effect::may(PromptKind::CopyShip)]),
            1,
        ),
        (
            CardDef::ship("battle_mech", "Battle Mech", 5, Mc)
                .on_play([Effect::combat(4), Effect::may(PromptKind::ScrapFromHandOrDiscard)])
                .on_ally([Effect::draw(1)]),
            1,
        ),
        (
            CardDef::ship("missile_mech", "Missile Mech", 6, Mc)
                .on_play([Effect::combat(6), Effect::may(PromptKind::DestroyBase)])
                .on_ally([Effect::draw(1)]),
            1,
        ),
        (
            CardDef::base("battle_station", "Battle Station", 3, Mc, Shield::Outpost, 5)
                .on_scrap([Effect::combat(5)]),
            2,
        ),
        (
            CardDef::base("mech_world", "Mech World", 5, Mc, Shield::Outpost, 6)
                .on_play([Effect::AddAllFactionTags]),
            1,
        ),
        (
            CardDef::base("junkyard", "Junkyard", 6, Mc, Shield::Outpost, 5)
                .on_play([Effect::may(PromptKind::ScrapFromHandOrDiscard)]),
            1,
        ),
        (
            CardDef::base("machine_base", "Machine Base", 7, Mc, Shield::Outpost, 6)
                .on_play([Effect::draw(1), Effect::must(PromptKind::ScrapFromHand)]),
            1,
        ),
        (
            CardDef::base("brain_world", "Brain World", 8, Mc, Shield::Outpost, 6)
                .on_play([Effect::ScrapAndDraw { max_cards: 2 }]),
            1,
        ),
    ]
}

/// Build the base-set registry: starters, explorer, and the 80-card trade deck
pub fn standard_registry() -> CardRegistry {
    let mut registry = CardRegistry::new();

    for card in starter_cards() {
        registry.add_card(card);
    }

    let factions = [
        blob_cards(),
        trade_federation_cards(),
        star_empire_cards(),
        machine_cult_cards(),
    ];
    for (card, copies) in factions.into_iter().flatten() {
        registry.add_to_trade_deck(card.id.as_str(), copies);
        registry.add_card(card);
    }

    registry
}
