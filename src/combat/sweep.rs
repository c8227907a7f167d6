//! Destruction sweep.
//!
//! Runs after every damage-dealing resolution. Lethality is decided for
//! the whole board first, then applied:
//! - Orbit and planet instances with `damage >= effective toughness` go to
//!   their owner's graveyard, equipment after them.
//! - The generator is never destroyed. It flips to the other player,
//!   resets to its base stats and releases its garrison.
//!
//! The sweep repeats until the board is stable, since a dead garrison
//! member lowers the generator's toughness.

use smallvec::SmallVec;

use super::stack;
use super::stats;
use crate::cards::CardDefinition;
use crate::core::{EntityId, MatchState, PlayerId};
use crate::zones::{Slot, Zone};

/// What a sweep removed or flipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Destroyed cards with their owner, in sweep order.
    pub destroyed: Vec<(PlayerId, CardDefinition)>,
    /// New generator owner, if it flipped.
    pub generator_flipped: Option<PlayerId>,
}

impl SweepReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.destroyed.is_empty() && self.generator_flipped.is_none()
    }
}

/// Sweep the board until nothing else is lethal.
pub fn destruction_sweep(state: &mut MatchState) -> SweepReport {
    let mut report = SweepReport::default();
    loop {
        let pass = sweep_once(state);
        if pass.is_empty() {
            return report;
        }
        report.destroyed.extend(pass.destroyed);
        report.generator_flipped = pass.generator_flipped.or(report.generator_flipped);
    }
}

fn sweep_once(state: &mut MatchState) -> SweepReport {
    let lethal: Vec<Slot> = state
        .zones
        .all_slots()
        .into_iter()
        .filter(|slot| {
            state
                .zones
                .get(*slot)
                .is_some_and(|card| stats::is_lethal(state, card))
        })
        .collect();

    let mut report = SweepReport::default();
    let mut flip = false;

    // Highest index first, so earlier slots stay valid.
    for slot in lethal.into_iter().rev() {
        if slot.zone == Zone::Generator {
            flip = true;
            continue;
        }
        let Some(instance) = state.zones.remove(slot) else {
            continue;
        };
        forget_entity(state, instance.entity_id);
        tracing::debug!(owner = %instance.owner, card = %instance.card.name, "destroyed");

        let owner = instance.owner;
        state.zones.to_graveyard(owner, instance.card.clone());
        for attachment in instance.attachments {
            state.zones.to_graveyard(owner, attachment.card);
        }
        report.destroyed.push((owner, instance.card));
    }
    report.destroyed.reverse();

    if flip {
        report.generator_flipped = flip_generator(state);
    }
    report
}

/// Drop a removed entity from the combat stack and the garrison.
fn forget_entity(state: &mut MatchState, entity: EntityId) {
    stack::forget_attacker(state, entity);
    if let Some(generator) = state.zones.generator_mut() {
        if let Some(pos) = generator.garrison.iter().position(|g| g.entity_id == entity) {
            let entry = generator.garrison.remove(pos);
            generator.instance.power -= entry.attack;
            generator.instance.toughness -= entry.defense;
        }
    }
}

/// Hand the generator to the other player at base stats.
fn flip_generator(state: &mut MatchState) -> Option<PlayerId> {
    let (power, toughness) = (state.config.generator_power, state.config.generator_toughness);
    let generator = state.zones.generator_mut()?;

    let new_owner = generator.instance.owner.opponent();
    generator.instance.owner = new_owner;
    generator.instance.power = power;
    generator.instance.toughness = toughness;
    generator.instance.damage = 0;
    let released: SmallVec<[EntityId; 4]> = generator.garrison.drain(..).map(|g| g.entity_id).collect();

    for id in released {
        if let Some(unit) = state.zones.instance_mut(id) {
            unit.garrisoned = false;
        }
    }
    tracing::info!(%new_owner, "generator changed hands");
    Some(new_owner)
}
