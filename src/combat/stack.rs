//! Attacker-stack construction.
//!
//! Clicking a friendly unit toggles it in the stack. The match is in
//! combat selection while the stack is non-empty; choosing a target
//! executes it (see `resolver::execute_stack`).

use smallvec::SmallVec;

use super::targeting;
use crate::core::{EntityId, MatchState, PendingMode, PlayerId};
use crate::error::{ActionError, ActionResult};
use crate::zones::Slot;

/// Add the unit at `slot` to the stack, or remove it if already there.
///
/// Returns `true` if the unit is now in the stack.
pub fn toggle_attacker(state: &mut MatchState, player: PlayerId, slot: Slot) -> ActionResult<bool> {
    state.ensure_active(player)?;
    let entity = state
        .zones
        .get(slot)
        .filter(|unit| unit.owner == player)
        .map(|unit| unit.entity_id)
        .ok_or(ActionError::NoSuchCard)?;

    if state.combat_attackers().contains(&entity) {
        if let PendingMode::CombatSelection { attackers, .. } = &mut state.pending {
            attackers.retain(|id| *id != entity);
            if attackers.is_empty() {
                state.pending = PendingMode::None;
            }
        }
        if let Some(unit) = state.zones.get_mut(slot) {
            unit.selected = false;
        }
        tracing::debug!(%player, %entity, "attacker removed from stack");
        return Ok(false);
    }

    targeting::check_attacker(state, player, slot)?;
    if let PendingMode::CombatSelection { attackers, .. } = &mut state.pending {
        attackers.push(entity);
    } else {
        let mut attackers = SmallVec::new();
        attackers.push(entity);
        state.enter_pending(PendingMode::CombatSelection { player, attackers });
    }
    if let Some(unit) = state.zones.get_mut(slot) {
        unit.selected = true;
    }
    tracing::debug!(%player, %entity, "attacker added to stack");
    Ok(true)
}

/// Replace the stack with exactly these attackers.
///
/// Used when replaying an `attack` message. Every slot must hold a unit
/// able to attack; on failure nothing changes.
pub fn set_stack(state: &mut MatchState, player: PlayerId, slots: &[Slot]) -> ActionResult<()> {
    state.ensure_active(player)?;
    if slots.is_empty() {
        return Err(ActionError::EmptyStack);
    }

    let mut attackers: SmallVec<[EntityId; 4]> = SmallVec::new();
    for slot in slots {
        targeting::check_attacker(state, player, *slot)?;
        let entity = state.zones.get(*slot).ok_or(ActionError::NoSuchCard)?.entity_id;
        if !attackers.contains(&entity) {
            attackers.push(entity);
        }
    }

    state.enter_pending(PendingMode::CombatSelection {
        player,
        attackers: attackers.clone(),
    });
    for entity in attackers {
        if let Some(unit) = state.zones.instance_mut(entity) {
            unit.selected = true;
        }
    }
    Ok(())
}

/// Abandon the stack and un-mark its members.
pub fn cancel_stack(state: &mut MatchState) -> bool {
    if !matches!(state.pending, PendingMode::CombatSelection { .. }) {
        return false;
    }
    state.cancel_pending()
}

/// Drop an entity leaving the battlefield from the stack.
pub(crate) fn forget_attacker(state: &mut MatchState, entity: EntityId) {
    if let PendingMode::CombatSelection { attackers, .. } = &mut state.pending {
        attackers.retain(|id| *id != entity);
        if attackers.is_empty() {
            state.pending = PendingMode::None;
        }
    }
}

/// Current slots of the stack members, in stack order.
#[must_use]
pub fn stack_slots(state: &MatchState) -> Vec<Slot> {
    state
        .combat_attackers()
        .iter()
        .filter_map(|id| state.zones.locate(*id))
        .collect()
}

/// Targets legal for every member of the stack.
#[must_use]
pub fn stack_targets(state: &MatchState) -> Vec<Slot> {
    let slots = stack_slots(state);
    let Some((first, rest)) = slots.split_first() else {
        return Vec::new();
    };
    let mut targets = targeting::valid_attack_targets(state, *first);
    for slot in rest {
        let allowed = targeting::valid_attack_targets(state, *slot);
        targets.retain(|t| allowed.contains(t));
    }
    targets
}
