//! Built-in card catalog.
//!
//! Discovery cards (planets, artifacts, natives), the generator, ability
//! tokens, and a starter faction deck. Abilities are authored directly as
//! typed tags; the rules text is for display only.
//!
//! ## Id ranges
//!
//! | range | contents |
//! |---|---|
//! | 1-99 | starter deck |
//! | 900-949 | discovery cards |
//! | 950 | generator |
//! | 960-969 | tokens |
//! | 1000+ | loaded deck lists |

use super::ability::{Ability, AuraTarget};
use super::definition::{CardDefinition, CardId, CardKind};
use crate::effects::EventEffect;

pub const GENERATOR_ID: CardId = CardId::new(950);
pub const FIGHTER_TOKEN_ID: CardId = CardId::new(960);
pub const GROUND_TOKEN_ID: CardId = CardId::new(961);

fn card(
    id: u32,
    name: &str,
    kind: CardKind,
    cost: u32,
    (attack, defense): (i32, i32),
    text: &str,
) -> CardDefinition {
    CardDefinition::new(CardId::new(id), name, kind)
        .with_cost(cost)
        .with_stats(attack, defense)
        .with_text(text)
}

/// The shared generator structure.
///
/// Its battlefield stats come from `MatchConfig`, not from this definition.
#[must_use]
pub fn generator() -> CardDefinition {
    card(
        950,
        "Generator",
        CardKind::Structure,
        0,
        (0, 4),
        "Whoever holds the generator gains extra energy each turn.",
    )
    .with_flavor("An ancient machine humming beneath the crust.")
}

/// Fighter launched by a carrier.
#[must_use]
pub fn fighter_token(attack: i32, defense: i32) -> CardDefinition {
    card(960, "Fighter", CardKind::Ship, 0, (attack, defense), "")
}

/// Ground unit landed by a dropship.
#[must_use]
pub fn ground_token(attack: i32, defense: i32) -> CardDefinition {
    card(961, "Landing Party", CardKind::GroundUnit, 0, (attack, defense), "")
}

/// Cards that can be found by surveying, in catalog order.
#[must_use]
pub fn discovery_cards() -> Vec<CardDefinition> {
    vec![
        card(900, "Verdant World", CardKind::Planet, 0, (0, 3), "Generates 1 energy.")
            .with_ability(Ability::GeneratesEnergy { amount: 1 }),
        card(901, "Crystal Moon", CardKind::Planet, 0, (0, 2), "Max energy +2.")
            .with_ability(Ability::EnergyCapacity { amount: 2 }),
        card(902, "Precursor Archive", CardKind::Artifact, 0, (0, 1), "Tap: gain 2 energy.")
            .with_ability(Ability::TapForEnergy { amount: 2 }),
        card(
            903,
            "Dormant Consciousness",
            CardKind::Artifact,
            0,
            (0, 3),
            "Consciousness. Tap while you control the generator: you win.",
        )
        .with_ability(Ability::Consciousness),
        card(904, "Native Warband", CardKind::Natives, 1, (2, 2), ""),
        card(905, "Tunnel Dwellers", CardKind::Natives, 1, (1, 3), "Anti-air.")
            .with_ability(Ability::AntiAir),
    ]
}

/// The starter faction deck, one entry per copy.
#[must_use]
pub fn starter_deck() -> Vec<CardDefinition> {
    let scout = card(1, "Scout Frigate", CardKind::Ship, 1, (1, 2), "");
    let lance = card(2, "Lance Cruiser", CardKind::Ship, 3, (3, 3), "Orbital strike.")
        .with_ability(Ability::OrbitalStrike);
    let interceptor = card(3, "Interceptor", CardKind::Ship, 2, (2, 1), "Double attack.")
        .with_ability(Ability::DoubleAttack);
    let carrier = card(
        4,
        "Fleet Carrier",
        CardKind::Ship,
        3,
        (1, 4),
        "Pay 1 energy: deploy 2 fighters (1/1).",
    )
    .with_ability(Ability::Carrier {
        tokens: 2,
        attack: 1,
        defense: 1,
        energy_cost: 1,
    });
    let dropship = card(5, "Assault Dropship", CardKind::Ship, 2, (1, 2), "Land as a 3/3.")
        .with_ability(Ability::Dropship {
            attack: 3,
            defense: 3,
        });
    let skiff = card(6, "Lander Skiff", CardKind::Ship, 1, (1, 1), "Atmospheric.")
        .with_ability(Ability::Atmospheric);
    let drone = card(7, "Survey Drone", CardKind::Ship, 1, (0, 1), "Pay 1 energy: survey.")
        .with_ability(Ability::Survey { energy_cost: 1 });
    let marines = card(8, "Marine Squad", CardKind::GroundUnit, 1, (2, 2), "");
    let flak = card(9, "Flak Battery", CardKind::GroundUnit, 2, (1, 3), "Anti-air.")
        .with_ability(Ability::AntiAir);
    let walker = card(10, "Siege Walker", CardKind::GroundUnit, 3, (3, 4), "No counter-attack.")
        .with_ability(Ability::NoCounter);
    let sentinel = card(11, "Mirror Sentinel", CardKind::GroundUnit, 2, (1, 3), "Reflects 1 damage.")
        .with_ability(Ability::Reflect { amount: 1 });
    let reactor = card(12, "Fusion Reactor", CardKind::Structure, 2, (0, 3), "Generates 2 energy.")
        .with_ability(Ability::GeneratesEnergy { amount: 2 });
    let capacitor = card(13, "Capacitor Bank", CardKind::Structure, 1, (0, 2), "Max energy +3.")
        .with_ability(Ability::EnergyCapacity { amount: 3 });
    let bastion = card(14, "Bastion Wall", CardKind::Structure, 2, (0, 4), "All structures +1 defense.")
        .with_ability(Ability::Aura {
            target: AuraTarget::Structures,
            attack: 0,
            defense: 1,
        });
    let sensor = card(15, "Sensor Array", CardKind::Structure, 2, (0, 2), "Pay 2 energy: quantum sensor.")
        .with_ability(Ability::QuantumSensor { energy_cost: 2 });
    let hive = card(16, "Hive Colony", CardKind::GroundUnit, 2, (1, 1), "Grows +1/+1 at end of turn.")
        .with_ability(Ability::Growth {
            attack: 1,
            defense: 1,
        });
    let bombardment = card(17, "Orbital Bombardment", CardKind::Event, 2, (0, 0), "Deal 3 damage.")
        .with_ability(Ability::Event(EventEffect::TargetedDamage { amount: 3 }));
    let emp = card(18, "EMP Pulse", CardKind::Event, 2, (0, 0), "Deal 2 damage to every enemy ship.")
        .with_ability(Ability::Event(EventEffect::AreaDamage { amount: 2 }));
    let shield = card(19, "Shield Resonance", CardKind::Event, 1, (0, 0), "Your units get +1 defense.")
        .with_ability(Ability::Event(EventEffect::TeamDefense { amount: 1 }));
    let repairs = card(20, "Field Repairs", CardKind::Event, 1, (0, 0), "Repair 2.")
        .with_ability(Ability::Event(EventEffect::Repair { amount: 2 }));
    let recall = card(21, "Tactical Recall", CardKind::Event, 2, (0, 0), "Return target unit to its owner's hand.")
        .with_ability(Ability::Event(EventEffect::Bounce));
    let rifle = card(22, "Rail Rifle", CardKind::Equipment, 1, (0, 0), "+2 attack.")
        .with_ability(Ability::Equip {
            attack: 2,
            defense: 0,
        });

    let mut deck = Vec::with_capacity(30);
    for (card, copies) in [
        (scout, 2),
        (lance, 2),
        (interceptor, 2),
        (carrier, 1),
        (dropship, 2),
        (skiff, 1),
        (drone, 2),
        (marines, 3),
        (flak, 2),
        (walker, 1),
        (sentinel, 1),
        (reactor, 1),
        (capacitor, 1),
        (bastion, 1),
        (sensor, 1),
        (hive, 1),
        (bombardment, 1),
        (emp, 1),
        (shield, 1),
        (repairs, 1),
        (recall, 1),
        (rifle, 1),
    ] {
        deck.extend(std::iter::repeat(card).take(copies));
    }
    deck
}

/// Every built-in definition, each listed once.
#[must_use]
pub fn builtin_cards() -> Vec<CardDefinition> {
    let mut cards = Vec::new();
    for card in starter_deck() {
        if !cards.iter().any(|c: &CardDefinition| c.id == card.id) {
            cards.push(card);
        }
    }
    cards.extend(discovery_cards());
    cards.push(generator());
    cards.push(fighter_token(1, 1));
    cards.push(ground_token(2, 2));
    cards
}
