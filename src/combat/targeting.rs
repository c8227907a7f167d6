//! Attack eligibility and legal targets.
//!
//! | attacker | may target |
//! |---|---|
//! | orbit | enemy orbit |
//! | orbit + orbital strike | also enemy planet and an enemy-held generator |
//! | planet | enemy planet and an enemy-held generator |
//! | planet + anti-air | also enemy orbit |
//!
//! Artifacts are never targets, except the consciousness card.

use super::stats;
use crate::cards::{Ability, CardInstance, CardKind};
use crate::core::{MatchState, PlayerId};
use crate::error::{ActionError, ActionResult};
use crate::zones::{Slot, Zone};

/// Whether a card can be chosen as a target at all.
#[must_use]
pub fn is_targetable(card: &CardInstance) -> bool {
    card.kind() != CardKind::Artifact || card.card.is_consciousness()
}

/// Check that the card at `slot` can attack for `player` right now.
pub fn check_attacker(state: &MatchState, player: PlayerId, slot: Slot) -> ActionResult<()> {
    if slot.owner != player || !matches!(slot.zone, Zone::Orbit | Zone::Planet) {
        return Err(ActionError::NoSuchCard);
    }
    let unit = state.zones.get(slot).ok_or(ActionError::NoSuchCard)?;

    if !unit.kind().is_unit() {
        return Err(ActionError::CannotAttack("only units attack"));
    }
    if unit.garrisoned {
        return Err(ActionError::CannotAttack("garrisoned"));
    }
    if unit.summoning_sickness {
        return Err(ActionError::SummoningSick);
    }
    if unit.tapped {
        return Err(ActionError::Tapped);
    }
    if unit.actions_used >= unit.max_actions {
        return Err(ActionError::CannotAttack("no actions left"));
    }
    Ok(())
}

/// Whether a unit is worth sending in: it can attack and has attack power.
#[must_use]
pub fn is_offensive(state: &MatchState, slot: Slot) -> bool {
    check_attacker(state, slot.owner, slot).is_ok()
        && state
            .zones
            .get(slot)
            .is_some_and(|unit| stats::effective_attack(state, unit) > 0)
}

/// Every legal target for the attacker at `attacker`, in zone order.
#[must_use]
pub fn valid_attack_targets(state: &MatchState, attacker: Slot) -> Vec<Slot> {
    let Some(unit) = state.zones.get(attacker) else {
        return Vec::new();
    };
    let enemy = attacker.owner.opponent();
    let orbital_strike = unit.has(|a| matches!(a, Ability::OrbitalStrike));
    let anti_air = unit.has(|a| matches!(a, Ability::AntiAir));

    let (hit_orbit, hit_surface) = match attacker.zone {
        Zone::Orbit => (true, orbital_strike),
        Zone::Planet => (anti_air, true),
        _ => (false, false),
    };

    let mut targets = Vec::new();
    if hit_orbit {
        targets.extend(field_targets(state, enemy, Zone::Orbit));
    }
    if hit_surface {
        targets.extend(field_targets(state, enemy, Zone::Planet));
        if state.zones.generator_owner() == Some(enemy) {
            targets.push(Slot::generator(enemy));
        }
    }
    targets
}

fn field_targets(state: &MatchState, owner: PlayerId, zone: Zone) -> impl Iterator<Item = Slot> + '_ {
    state
        .zones
        .field(owner, zone)
        .into_iter()
        .flat_map(|cards| cards.iter().enumerate())
        .filter(|(_, card)| is_targetable(card))
        .map(move |(index, _)| Slot::new(owner, zone, index))
}

/// Whether `target` is legal for the attacker at `attacker`.
#[must_use]
pub fn is_valid_target(state: &MatchState, attacker: Slot, target: Slot) -> bool {
    valid_attack_targets(state, attacker).contains(&target)
}
