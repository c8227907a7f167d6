//! Effective combat stats.
//!
//! `effective = base + equipment + auras`, where auras come from the
//! instance owner's own board only.

use crate::cards::{Ability, CardInstance};
use crate::core::MatchState;

/// Summed `(attack, defense)` of every aura on the owner's board that
/// covers this instance (its own aura included).
#[must_use]
pub fn aura_bonus(state: &MatchState, instance: &CardInstance) -> (i32, i32) {
    let kind = instance.kind();
    let generator = state
        .zones
        .generator()
        .map(|g| &g.instance)
        .filter(|g| g.owner == instance.owner);

    state
        .zones
        .battlefield(instance.owner)
        .chain(generator)
        .flat_map(|c| c.card.abilities.iter())
        .fold((0, 0), |(a, d), ability| match ability {
            Ability::Aura {
                target,
                attack,
                defense,
            } if target.covers(kind) => (a + attack, d + defense),
            _ => (a, d),
        })
}

#[must_use]
pub fn effective_attack(state: &MatchState, instance: &CardInstance) -> i32 {
    instance.power + instance.equipment_bonus().0 + aura_bonus(state, instance).0
}

#[must_use]
pub fn effective_toughness(state: &MatchState, instance: &CardInstance) -> i32 {
    instance.toughness + instance.equipment_bonus().1 + aura_bonus(state, instance).1
}

/// Health left: effective toughness minus damage.
#[must_use]
pub fn current_hp(state: &MatchState, instance: &CardInstance) -> i32 {
    effective_toughness(state, instance) - instance.damage
}

/// `damage >= effective toughness`.
#[must_use]
pub fn is_lethal(state: &MatchState, instance: &CardInstance) -> bool {
    instance.damage >= effective_toughness(state, instance)
}

/// Damage reflected onto an attacker, if the card reflects.
#[must_use]
pub fn reflect_amount(instance: &CardInstance) -> Option<i32> {
    instance.card.find(|a| match a {
        Ability::Reflect { amount } => Some(*amount),
        _ => None,
    })
}
