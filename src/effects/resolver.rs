//! Event and equipment resolution.
//!
//! Playing an event either resolves it on the spot or parks it in
//! `SelectingEventTarget` until a target is chosen. Equipment always waits
//! in `SelectingEquipmentTarget`. In both cases the card has already left
//! the hand and been paid for; cancelling sends it to the graveyard.

use super::effect::EventEffect;
use crate::cards::{Attachment, CardDefinition, CardInstance, CardKind};
use crate::combat::{destruction_sweep, effective_toughness, stack, targeting, SweepReport};
use crate::core::{EntityId, MatchState, PendingMode, PlayerId};
use crate::error::{ActionError, ActionResult};
use crate::zones::{Slot, Zone};

/// Result of playing or targeting an event or equipment card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// The effect resolved and the card went to the graveyard.
    Resolved { effect: EventEffect, sweep: SweepReport },
    /// The effect needs a target; the match waits in a selection mode.
    AwaitingTarget(EventEffect),
    /// Equipment was attached to this unit.
    Equipped(EntityId),
}

/// Play an event card that has already been paid for.
pub fn play_event(state: &mut MatchState, player: PlayerId, card: CardDefinition) -> ActionResult<EventOutcome> {
    state.ensure_active(player)?;
    let effect = card.event_effect().unwrap_or(EventEffect::Acknowledge);

    if effect.needs_target() {
        tracing::debug!(%player, card = %card.name, ?effect, "event awaiting target");
        state.enter_pending(PendingMode::SelectingEventTarget { player, card, effect });
        return Ok(EventOutcome::AwaitingTarget(effect));
    }

    apply_immediate(state, player, effect);
    tracing::debug!(%player, card = %card.name, ?effect, "event resolved");
    state.zones.to_graveyard(player, card);
    let sweep = destruction_sweep(state);
    Ok(EventOutcome::Resolved { effect, sweep })
}

/// Park a paid-for equipment card until a friendly unit is chosen.
pub fn play_equipment(state: &mut MatchState, player: PlayerId, card: CardDefinition) -> ActionResult<EventOutcome> {
    state.ensure_active(player)?;
    if card.kind != CardKind::Equipment {
        return Err(ActionError::InvalidTarget);
    }
    tracing::debug!(%player, card = %card.name, "equipment awaiting target");
    state.enter_pending(PendingMode::SelectingEquipmentTarget { player, card });
    Ok(EventOutcome::AwaitingTarget(EventEffect::Acknowledge))
}

/// Resolve the pending event or equipment against `target`.
///
/// An illegal target leaves the selection pending.
pub fn resolve_target(state: &mut MatchState, player: PlayerId, target: Slot) -> ActionResult<EventOutcome> {
    state.ensure_active(player)?;
    match &state.pending {
        PendingMode::SelectingEventTarget { player: owner, effect, .. } if *owner == player => {
            let effect = *effect;
            if !event_targets(state, player).contains(&target) {
                return Err(ActionError::InvalidTarget);
            }
            let PendingMode::SelectingEventTarget { card, .. } = std::mem::take(&mut state.pending) else {
                return Err(ActionError::NothingPending);
            };
            apply_targeted(state, effect, target);
            tracing::debug!(%player, card = %card.name, ?effect, ?target, "targeted event resolved");
            state.zones.to_graveyard(player, card);
            let sweep = destruction_sweep(state);
            Ok(EventOutcome::Resolved { effect, sweep })
        }
        PendingMode::SelectingEquipmentTarget { player: owner, .. } if *owner == player => {
            if !equipment_targets(state, player).contains(&target) {
                return Err(ActionError::InvalidTarget);
            }
            let PendingMode::SelectingEquipmentTarget { card, .. } = std::mem::take(&mut state.pending) else {
                return Err(ActionError::NothingPending);
            };
            let unit = state.zones.get_mut(target).ok_or(ActionError::InvalidTarget)?;
            tracing::debug!(%player, card = %card.name, unit = %unit.card.name, "equipment attached");
            unit.attachments.push(Attachment::from_equipment(card));
            Ok(EventOutcome::Equipped(unit.entity_id))
        }
        _ => Err(ActionError::NothingPending),
    }
}

/// Legal targets for a targeted event: targetable enemy orbit and planet cards.
#[must_use]
pub fn event_targets(state: &MatchState, player: PlayerId) -> Vec<Slot> {
    let enemy = player.opponent();
    battlefield_slots(state, enemy, |card| targeting::is_targetable(card))
}

/// Legal equipment targets: the player's own units.
#[must_use]
pub fn equipment_targets(state: &MatchState, player: PlayerId) -> Vec<Slot> {
    battlefield_slots(state, player, |card| card.kind().is_unit())
}

fn battlefield_slots(
    state: &MatchState,
    owner: PlayerId,
    filter: impl Fn(&CardInstance) -> bool,
) -> Vec<Slot> {
    [Zone::Orbit, Zone::Planet]
        .into_iter()
        .flat_map(|zone| {
            state
                .zones
                .field(owner, zone)
                .into_iter()
                .flat_map(|cards| cards.iter().enumerate())
                .filter(|(_, card)| filter(card))
                .map(move |(index, _)| Slot::new(owner, zone, index))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn apply_immediate(state: &mut MatchState, player: PlayerId, effect: EventEffect) {
    let enemy = player.opponent();
    match effect {
        EventEffect::AreaDamage { amount } => {
            let slots: Vec<Slot> = (0..state.zones.orbit(enemy).len())
                .map(|i| Slot::orbit(enemy, i))
                .collect();
            for slot in slots {
                if let Some(unit) = state.zones.get_mut(slot) {
                    unit.take_damage(amount);
                }
            }
        }
        EventEffect::TeamDefense { amount } => {
            state.zones.for_each_instance_mut(|unit| {
                if unit.owner == player && unit.kind().is_unit() && !unit.garrisoned {
                    unit.toughness += amount;
                }
            });
        }
        EventEffect::Repair { amount } => {
            let damaged = state
                .zones
                .battlefield(player)
                .find(|unit| unit.damage > 0)
                .map(|unit| unit.entity_id);
            if let Some(unit) = damaged.and_then(|id| state.zones.instance_mut(id)) {
                unit.damage = (unit.damage - amount).max(0);
            }
        }
        EventEffect::Draw { count } => {
            state.zones.draw_many(player, count as usize);
        }
        EventEffect::Discard { count } => {
            state.zones.discard_from_hand(enemy, count as usize);
        }
        EventEffect::Mill { count } => {
            state.zones.mill(enemy, count as usize);
        }
        EventEffect::Acknowledge
        | EventEffect::TargetedDamage { .. }
        | EventEffect::Destroy
        | EventEffect::Bounce
        | EventEffect::TapTarget => {}
    }
}

fn apply_targeted(state: &mut MatchState, effect: EventEffect, target: Slot) {
    match effect {
        EventEffect::TargetedDamage { amount } => {
            if let Some(unit) = state.zones.get_mut(target) {
                unit.take_damage(amount);
            }
        }
        EventEffect::Destroy => {
            let toughness = state
                .zones
                .get(target)
                .map(|unit| effective_toughness(state, unit));
            if let (Some(toughness), Some(unit)) = (toughness, state.zones.get_mut(target)) {
                unit.damage = unit.damage.max(toughness);
            }
        }
        EventEffect::Bounce => bounce(state, target),
        EventEffect::TapTarget => {
            if let Some(unit) = state.zones.get_mut(target) {
                unit.tapped = true;
            }
        }
        _ => {}
    }
}

/// Return a battlefield card to its owner's hand. Tokens cease to exist;
/// equipment goes to the graveyard.
fn bounce(state: &mut MatchState, target: Slot) {
    let Some(unit) = state.zones.remove(target) else {
        return;
    };
    stack::forget_attacker(state, unit.entity_id);
    let owner = unit.owner;
    for attachment in unit.attachments {
        state.zones.to_graveyard(owner, attachment.card);
    }
    if !unit.token {
        state.zones.add_to_hand(owner, unit.card);
    }
}
