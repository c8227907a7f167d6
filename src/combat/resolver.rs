//! Combat resolution.
//!
//! ## Stack combat
//!
//! 1. Total attacker power is the sum of effective attacks.
//! 2. Attackers are sorted ascending by effective attack (stable).
//! 3. The defender's effective attack is a damage budget soaked up in that
//!    order, each attacker taking `min(budget, current hp)`.
//! 4. The defender takes the total in one batch.
//! 5. A reflecting defender hits the first (weakest) attacker.
//! 6. Attackers are tapped and un-marked; the stack is cleared.
//! 7. Destruction sweep.
//!
//! ## Single combat
//!
//! One attacker against one defender. The defender strikes back unless
//! the attacker has no-counter; reflect still applies; a double-attack
//! unit stays untapped after its first strike.

use smallvec::SmallVec;

use super::stack;
use super::stats;
use super::sweep::{destruction_sweep, SweepReport};
use super::targeting;
use crate::cards::Ability;
use crate::core::{EntityId, MatchState, PendingMode, PlayerId};
use crate::error::{ActionError, ActionResult};
use crate::zones::Slot;

/// Outcome of one combat resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CombatReport {
    /// Damage dealt to the defender.
    pub defender_damage: i32,
    /// Retaliation absorbed per attacker, in absorption order.
    pub absorbed: SmallVec<[(EntityId, i32); 4]>,
    /// Reflect damage and the attacker it hit.
    pub reflected: Option<(EntityId, i32)>,
    pub sweep: SweepReport,
}

struct Attacker {
    entity: EntityId,
    attack: i32,
    hp: i32,
}

/// Resolve the pending stack against `target`.
///
/// The target must be legal for every stack member. On error nothing
/// changes and the stack stays pending.
pub fn execute_stack(state: &mut MatchState, player: PlayerId, target: Slot) -> ActionResult<CombatReport> {
    state.ensure_active(player)?;
    let slots = stack::stack_slots(state);
    if slots.is_empty() {
        return Err(ActionError::EmptyStack);
    }
    for slot in &slots {
        targeting::check_attacker(state, player, *slot)?;
    }
    if !stack::stack_targets(state).contains(&target) {
        return Err(ActionError::InvalidTarget);
    }

    let defender = state.zones.get(target).ok_or(ActionError::InvalidTarget)?;
    let defender_id = defender.entity_id;
    let mut budget = stats::effective_attack(state, defender).max(0);
    let reflect = stats::reflect_amount(defender);

    let mut attackers: Vec<Attacker> = slots
        .iter()
        .filter_map(|slot| state.zones.get(*slot))
        .map(|unit| Attacker {
            entity: unit.entity_id,
            attack: stats::effective_attack(state, unit),
            hp: stats::current_hp(state, unit),
        })
        .collect();
    attackers.sort_by_key(|a| a.attack);
    let total: i32 = attackers.iter().map(|a| a.attack.max(0)).sum();

    let mut report = CombatReport {
        defender_damage: total,
        ..CombatReport::default()
    };

    for attacker in &attackers {
        let absorbed = budget.min(attacker.hp.max(0));
        budget -= absorbed;
        if let Some(unit) = state.zones.instance_mut(attacker.entity) {
            unit.take_damage(absorbed);
        }
        report.absorbed.push((attacker.entity, absorbed));
    }

    if let Some(unit) = state.zones.instance_mut(defender_id) {
        unit.take_damage(total);
    }

    if let (Some(amount), Some(first)) = (reflect, attackers.first()) {
        if let Some(unit) = state.zones.instance_mut(first.entity) {
            unit.take_damage(amount);
        }
        report.reflected = Some((first.entity, amount));
    }

    for attacker in &attackers {
        if let Some(unit) = state.zones.instance_mut(attacker.entity) {
            unit.tapped = true;
            unit.selected = false;
            unit.actions_used += 1;
        }
    }
    state.pending = PendingMode::None;

    tracing::debug!(
        %player,
        attackers = attackers.len(),
        total,
        defender = %defender_id,
        "stack combat resolved"
    );
    report.sweep = destruction_sweep(state);
    Ok(report)
}

/// One attacker against one defender.
pub fn single_combat(
    state: &mut MatchState,
    player: PlayerId,
    attacker: Slot,
    target: Slot,
) -> ActionResult<CombatReport> {
    state.ensure_active(player)?;
    targeting::check_attacker(state, player, attacker)?;
    if !targeting::is_valid_target(state, attacker, target) {
        return Err(ActionError::InvalidTarget);
    }

    let unit = state.zones.get(attacker).ok_or(ActionError::NoSuchCard)?;
    let defender = state.zones.get(target).ok_or(ActionError::InvalidTarget)?;
    let (attacker_id, defender_id) = (unit.entity_id, defender.entity_id);
    let attack = stats::effective_attack(state, unit).max(0);
    let counter = if unit.has(|a| matches!(a, Ability::NoCounter)) {
        0
    } else {
        stats::effective_attack(state, defender).max(0)
    };
    let reflect = stats::reflect_amount(defender);

    stack::cancel_stack(state);

    if let Some(defender) = state.zones.instance_mut(defender_id) {
        defender.take_damage(attack);
    }
    let mut report = CombatReport {
        defender_damage: attack,
        ..CombatReport::default()
    };

    if let Some(unit) = state.zones.instance_mut(attacker_id) {
        unit.take_damage(counter);
        if let Some(amount) = reflect {
            unit.take_damage(amount);
        }
        unit.spend_action();
    }
    report.absorbed.push((attacker_id, counter));
    report.reflected = reflect.map(|amount| (attacker_id, amount));

    tracing::debug!(%player, attacker = %attacker_id, defender = %defender_id, attack, counter, "single combat resolved");
    report.sweep = destruction_sweep(state);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{catalog, CardDefinition, CardId, CardKind};
    use crate::core::MatchConfig;
    use crate::zones::Zone;

    fn ready(state: &mut MatchState, id: u32, stats: (i32, i32), owner: PlayerId, zone: Zone) -> Slot {
        let kind = if zone == Zone::Orbit { CardKind::Ship } else { CardKind::GroundUnit };
        let card = CardDefinition::new(CardId::new(id), format!("Unit {id}"), kind)
            .with_stats(stats.0, stats.1);
        ready_card(state, card, owner, zone)
    }

    fn ready_card(state: &mut MatchState, card: CardDefinition, owner: PlayerId, zone: Zone) -> Slot {
        let mut instance = state.spawn(card, owner);
        instance.summoning_sickness = false;
        state.zones.deploy(zone, instance).unwrap()
    }

    #[test]
    fn test_stack_absorbs_weakest_first() {
        let mut state = MatchState::new(MatchConfig::default());
        let strong = ready(&mut state, 1, (5, 6), PlayerId::P1, Zone::Planet);
        let weak = ready(&mut state, 2, (2, 2), PlayerId::P1, Zone::Planet);
        let target = ready(&mut state, 3, (4, 10), PlayerId::P2, Zone::Planet);

        stack::toggle_attacker(&mut state, PlayerId::P1, strong).unwrap();
        stack::toggle_attacker(&mut state, PlayerId::P1, weak).unwrap();
        let report = execute_stack(&mut state, PlayerId::P1, target).unwrap();

        assert_eq!(report.defender_damage, 7);
        assert_eq!(report.absorbed[0].1, 2);
        assert_eq!(report.absorbed[1].1, 2);
        // The weak attacker died; the strong one survived with 2 damage.
        assert_eq!(report.sweep.destroyed.len(), 1);
        let survivor = &state.zones.planet(PlayerId::P1)[0];
        assert_eq!(survivor.damage, 2);
        assert!(survivor.tapped);
        assert!(!survivor.selected);
        assert_eq!(state.zones.planet(PlayerId::P2)[0].damage, 7);
        assert!(state.pending.is_none());
    }

    #[test]
    fn test_stack_reflect_hits_weakest() {
        let mut state = MatchState::new(MatchConfig::default());
        let a = ready(&mut state, 1, (3, 5), PlayerId::P1, Zone::Planet);
        let b = ready(&mut state, 2, (1, 5), PlayerId::P1, Zone::Planet);
        let mirror = CardDefinition::new(CardId::new(3), "Mirror", CardKind::GroundUnit)
            .with_stats(0, 9)
            .with_ability(Ability::Reflect { amount: 2 });
        let target = ready_card(&mut state, mirror, PlayerId::P2, Zone::Planet);

        stack::set_stack(&mut state, PlayerId::P1, &[a, b]).unwrap();
        let weak_id = state.zones.get(b).unwrap().entity_id;
        let report = execute_stack(&mut state, PlayerId::P1, target).unwrap();

        assert_eq!(report.reflected, Some((weak_id, 2)));
        assert_eq!(state.zones.get(b).unwrap().damage, 2);
        assert_eq!(state.zones.get(a).unwrap().damage, 0);
    }

    #[test]
    fn test_stack_rejects_illegal_target() {
        let mut state = MatchState::new(MatchConfig::default());
        let ship = ready(&mut state, 1, (2, 2), PlayerId::P1, Zone::Orbit);
        let ground = ready(&mut state, 2, (2, 2), PlayerId::P2, Zone::Planet);

        stack::toggle_attacker(&mut state, PlayerId::P1, ship).unwrap();
        assert_eq!(
            execute_stack(&mut state, PlayerId::P1, ground),
            Err(ActionError::InvalidTarget)
        );
        assert_eq!(state.combat_attackers().len(), 1);
        assert_eq!(state.zones.get(ground).unwrap().damage, 0);
    }

    #[test]
    fn test_single_combat_counter_and_no_counter() {
        let mut state = MatchState::new(MatchConfig::default());
        let plain = ready(&mut state, 1, (2, 5), PlayerId::P1, Zone::Planet);
        let walker = CardDefinition::new(CardId::new(2), "Walker", CardKind::GroundUnit)
            .with_stats(2, 5)
            .with_ability(Ability::NoCounter);
        let walker = ready_card(&mut state, walker, PlayerId::P1, Zone::Planet);
        let target = ready(&mut state, 3, (3, 10), PlayerId::P2, Zone::Planet);

        single_combat(&mut state, PlayerId::P1, plain, target).unwrap();
        assert_eq!(state.zones.get(plain).unwrap().damage, 3);
        assert!(state.zones.get(plain).unwrap().tapped);

        single_combat(&mut state, PlayerId::P1, walker, target).unwrap();
        assert_eq!(state.zones.get(walker).unwrap().damage, 0);
        assert_eq!(state.zones.get(target).unwrap().damage, 4);
    }

    #[test]
    fn test_single_combat_double_attack() {
        let mut state = MatchState::new(MatchConfig::default());
        let interceptor = CardDefinition::new(CardId::new(1), "Interceptor", CardKind::Ship)
            .with_stats(1, 5)
            .with_ability(Ability::DoubleAttack);
        let attacker = ready_card(&mut state, interceptor, PlayerId::P1, Zone::Orbit);
        let target = ready(&mut state, 2, (0, 10), PlayerId::P2, Zone::Orbit);

        single_combat(&mut state, PlayerId::P1, attacker, target).unwrap();
        let unit = state.zones.get(attacker).unwrap();
        assert!(!unit.tapped);
        assert!(unit.attacked_twice);

        single_combat(&mut state, PlayerId::P1, attacker, target).unwrap();
        assert!(state.zones.get(attacker).unwrap().tapped);
        assert!(single_combat(&mut state, PlayerId::P1, attacker, target).is_err());
        assert_eq!(state.zones.get(target).unwrap().damage, 2);
    }

    #[test]
    fn test_attack_generator_flips_it() {
        let mut state = MatchState::new(MatchConfig::default());
        let attacker = ready(&mut state, 1, (4, 4), PlayerId::P1, Zone::Planet);
        let generator = state.spawn(catalog::generator(), PlayerId::P2);
        state.zones.install_generator(generator);
        state.zones.generator_mut().unwrap().instance.toughness = 4;

        let report = single_combat(&mut state, PlayerId::P1, attacker, Slot::generator(PlayerId::P2)).unwrap();

        assert_eq!(report.sweep.generator_flipped, Some(PlayerId::P1));
        assert_eq!(state.zones.generator_owner(), Some(PlayerId::P1));
    }
}
