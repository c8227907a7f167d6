//! Playing cards and activating battlefield abilities.
//!
//! Every function checks ownership and turn first and returns an
//! `ActionError` without touching the state when the action is illegal.

use crate::cards::{catalog, Ability, CardDefinition, CardInstance, CardKind};
use crate::combat::stack;
use crate::core::{Discovery, MatchState, PendingMode, PlayerId};
use crate::effects::{self, EventOutcome};
use crate::error::{ActionError, ActionResult};
use crate::resources::{energy, gates, research};
use crate::zones::{GarrisonEntry, Slot, Zone};

/// What playing a card did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    /// A permanent entered the battlefield.
    Deployed(Slot),
    /// An event or equipment card was handed to the event engine.
    Event(EventOutcome),
}

/// What tapping a card did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// The consciousness card was tapped under the generator: game over.
    Won,
    /// Energy was gained.
    Energy(i32),
}

// === Playing from hand ===

/// Pick a hand card and wait for a gate choice.
pub fn select_card(state: &mut MatchState, player: PlayerId, hand_index: usize) -> ActionResult<()> {
    state.ensure_active(player)?;
    let cost = state
        .zones
        .hand(player)
        .get(hand_index)
        .ok_or(ActionError::NoSuchCard)?
        .cost;
    if gates::find_available_gate(state, cost, player).is_none() {
        return Err(ActionError::NoAvailableGate { cost });
    }
    state.enter_pending(PendingMode::SelectingGate { player, hand_index });
    Ok(())
}

/// Pay for the selected card with `gate_index` and play it.
pub fn choose_gate(state: &mut MatchState, player: PlayerId, gate_index: usize) -> ActionResult<PlayOutcome> {
    let hand_index = match state.pending {
        PendingMode::SelectingGate { player: owner, hand_index } if owner == player => hand_index,
        _ => return Err(ActionError::NothingPending),
    };
    play_card(state, player, hand_index, gate_index)
}

/// Play the hand card at `hand_index`, paying with `gate_index`.
pub fn play_card(
    state: &mut MatchState,
    player: PlayerId,
    hand_index: usize,
    gate_index: usize,
) -> ActionResult<PlayOutcome> {
    let card = state
        .zones
        .hand(player)
        .get(hand_index)
        .cloned()
        .ok_or(ActionError::NoSuchCard)?;
    play_resolved(state, player, Some(hand_index), card, gate_index)
}

/// Play `card`, removing it from the hand at `hand_index` if given.
///
/// Replay uses `None` when the card could not be found in the local hand;
/// the card is then put into play from the payload alone.
pub(crate) fn play_resolved(
    state: &mut MatchState,
    player: PlayerId,
    hand_index: Option<usize>,
    card: CardDefinition,
    gate_index: usize,
) -> ActionResult<PlayOutcome> {
    state.ensure_active(player)?;
    gates::check_gate(state, player, gate_index, card.cost)?;

    if let Some(index) = hand_index {
        state
            .zones
            .take_from_hand(player, index)
            .ok_or(ActionError::NoSuchCard)?;
    }
    gates::mark_used(state, player, gate_index);
    if matches!(state.pending, PendingMode::SelectingGate { .. }) {
        state.pending = PendingMode::None;
    }
    tracing::debug!(%player, card = %card.name, cost = card.cost, gate_index, "card played");

    match card.kind {
        CardKind::Event => effects::play_event(state, player, card).map(PlayOutcome::Event),
        CardKind::Equipment => effects::play_equipment(state, player, card).map(PlayOutcome::Event),
        kind => {
            let zone = kind.home_zone().unwrap_or(Zone::Planet);
            let instance = state.spawn(card, player);
            state
                .zones
                .deploy(zone, instance)
                .map(PlayOutcome::Deployed)
                .ok_or(ActionError::InvalidTarget)
        }
    }
}

// === Battlefield abilities ===

fn own_card(state: &MatchState, player: PlayerId, slot: Slot) -> ActionResult<&CardInstance> {
    state.ensure_active(player)?;
    if slot.owner != player {
        return Err(ActionError::NoSuchCard);
    }
    let card = state.zones.get(slot).ok_or(ActionError::NoSuchCard)?;
    if card.owner != player {
        return Err(ActionError::NoSuchCard);
    }
    Ok(card)
}

fn ensure_ready(card: &CardInstance) -> ActionResult<()> {
    if card.summoning_sickness {
        return Err(ActionError::SummoningSick);
    }
    if card.tapped || card.actions_used >= card.max_actions {
        return Err(ActionError::Tapped);
    }
    Ok(())
}

/// Sacrifice a dropship in orbit and land its ground token on the planet.
pub fn land_dropship(state: &mut MatchState, player: PlayerId, slot: Slot) -> ActionResult<Slot> {
    let ship = own_card(state, player, slot)?;
    if slot.zone != Zone::Orbit {
        return Err(ActionError::InvalidTarget);
    }
    let (attack, defense) = ship
        .card
        .find(|a| match a {
            Ability::Dropship { attack, defense } => Some((*attack, *defense)),
            _ => None,
        })
        .ok_or(ActionError::MissingAbility)?;
    if ship.summoning_sickness {
        return Err(ActionError::SummoningSick);
    }

    let ship = state.zones.remove(slot).ok_or(ActionError::NoSuchCard)?;
    stack::forget_attacker(state, ship.entity_id);
    state.zones.to_graveyard(player, ship.card.clone());
    for attachment in ship.attachments {
        state.zones.to_graveyard(player, attachment.card);
    }

    let token = state.spawn(catalog::ground_token(attack, defense), player).as_token();
    let landed = state
        .zones
        .deploy(Zone::Planet, token)
        .ok_or(ActionError::InvalidTarget)?;
    tracing::debug!(%player, dropship = %ship.card.name, attack, defense, "dropship landed");
    Ok(landed)
}

/// Pay a carrier's energy cost and launch its fighters into orbit.
pub fn deploy_tokens(state: &mut MatchState, player: PlayerId, slot: Slot) -> ActionResult<Vec<Slot>> {
    let carrier = own_card(state, player, slot)?;
    let (count, attack, defense, cost) = carrier
        .card
        .find(|a| match a {
            Ability::Carrier {
                tokens,
                attack,
                defense,
                energy_cost,
            } => Some((*tokens, *attack, *defense, *energy_cost)),
            _ => None,
        })
        .ok_or(ActionError::MissingAbility)?;
    if carrier.tapped {
        return Err(ActionError::Tapped);
    }
    let entity = carrier.entity_id;
    energy::ensure_energy(state, player, cost)?;

    energy::spend(state, player, cost);
    stack::forget_attacker(state, entity);
    if let Some(carrier) = state.zones.get_mut(slot) {
        carrier.tapped = true;
        carrier.selected = false;
    }

    let mut launched = Vec::new();
    for _ in 0..count {
        let token = state.spawn(catalog::fighter_token(attack, defense), player).as_token();
        if let Some(at) = state.zones.deploy(Zone::Orbit, token) {
            launched.push(at);
        }
    }
    tracing::debug!(%player, count, cost, "fighters launched");
    Ok(launched)
}

/// Descend an atmospheric unit from orbit to the planet.
pub fn move_to_planet(state: &mut MatchState, player: PlayerId, slot: Slot) -> ActionResult<Slot> {
    let unit = own_card(state, player, slot)?;
    if slot.zone != Zone::Orbit {
        return Err(ActionError::InvalidTarget);
    }
    if !unit.has(|a| matches!(a, Ability::Atmospheric)) {
        return Err(ActionError::MissingAbility);
    }
    if unit.moved_this_turn || unit.deployed_this_turn {
        return Err(ActionError::AlreadyMoved);
    }

    let mut unit = state.zones.remove(slot).ok_or(ActionError::NoSuchCard)?;
    stack::forget_attacker(state, unit.entity_id);
    unit.moved_this_turn = true;
    unit.selected = false;
    tracing::debug!(%player, card = %unit.card.name, "moved to planet");
    state
        .zones
        .deploy(Zone::Planet, unit)
        .ok_or(ActionError::InvalidTarget)
}

/// Garrison a planet unit in the generator its owner holds.
pub fn garrison(state: &mut MatchState, player: PlayerId, slot: Slot) -> ActionResult<()> {
    let unit = own_card(state, player, slot)?;
    if slot.zone != Zone::Planet || !unit.kind().is_unit() || unit.garrisoned {
        return Err(ActionError::InvalidTarget);
    }
    if unit.tapped {
        return Err(ActionError::Tapped);
    }
    let entry = GarrisonEntry {
        entity_id: unit.entity_id,
        attack: unit.power,
        defense: unit.toughness,
    };
    match state.zones.generator_owner() {
        None => return Err(ActionError::NoGenerator),
        Some(owner) if owner != player => return Err(ActionError::GeneratorNotControlled),
        Some(_) => {}
    }

    stack::forget_attacker(state, entry.entity_id);
    if let Some(unit) = state.zones.get_mut(slot) {
        unit.tapped = true;
        unit.garrisoned = true;
        unit.selected = false;
    }
    if let Some(generator) = state.zones.generator_mut() {
        generator.instance.power += entry.attack;
        generator.instance.toughness += entry.defense;
        generator.garrison.push(entry);
    }
    tracing::debug!(%player, entity = %entry.entity_id, "unit garrisoned");
    Ok(())
}

/// Activate a card's tap ability.
pub fn tap_card(state: &mut MatchState, player: PlayerId, slot: Slot) -> ActionResult<TapOutcome> {
    let card = own_card(state, player, slot)?;

    if card.card.is_consciousness() {
        ensure_ready(card)?;
        if state.zones.generator_owner() != Some(player) {
            return Err(ActionError::GeneratorNotControlled);
        }
        if let Some(card) = state.zones.get_mut(slot) {
            card.tapped = true;
        }
        state.winner = Some(player);
        state.cancel_pending();
        tracing::info!(%player, "consciousness awakened; game over");
        return Ok(TapOutcome::Won);
    }

    let amount = card
        .card
        .find(|a| match a {
            Ability::TapForEnergy { amount } => Some(*amount),
            _ => None,
        })
        .ok_or(ActionError::MissingAbility)?;
    ensure_ready(card)?;
    if let Some(card) = state.zones.get_mut(slot) {
        card.tapped = true;
    }
    let gained = energy::gain(state, player, amount);
    tracing::debug!(%player, gained, "tapped for energy");
    Ok(TapOutcome::Energy(gained))
}

/// Survey: pay energy, gain research, roll for a discovery.
///
/// `given` is the outcome rolled by the remote sender; when present it is
/// applied instead of rolling.
pub fn survey(
    state: &mut MatchState,
    player: PlayerId,
    slot: Slot,
    given: Option<Discovery>,
) -> ActionResult<Discovery> {
    let unit = own_card(state, player, slot)?;
    let cost = unit
        .card
        .find(|a| match a {
            Ability::Survey { energy_cost } => Some(*energy_cost),
            _ => None,
        })
        .ok_or(ActionError::MissingAbility)?;
    ensure_ready(unit)?;
    energy::ensure_energy(state, player, cost)?;

    energy::spend(state, player, cost);
    let research = research::add_research(state, player);
    let discovery = match given {
        Some(discovery) => discovery,
        None => research::roll_discovery(state, player),
    };
    research::apply_discovery(state, player, &discovery);
    if let Some(unit) = state.zones.get_mut(slot) {
        unit.spend_action();
    }
    tracing::debug!(%player, research, ?discovery, "survey");
    Ok(discovery)
}

/// Quantum sensor: pay energy, gain research, draw a card.
///
/// Returns whether a card was drawn.
pub fn quantum_sensor(state: &mut MatchState, player: PlayerId, slot: Slot) -> ActionResult<bool> {
    let sensor = own_card(state, player, slot)?;
    let cost = sensor
        .card
        .find(|a| match a {
            Ability::QuantumSensor { energy_cost } => Some(*energy_cost),
            _ => None,
        })
        .ok_or(ActionError::MissingAbility)?;
    ensure_ready(sensor)?;
    energy::ensure_energy(state, player, cost)?;

    energy::spend(state, player, cost);
    let research = research::add_research(state, player);
    let drew = state.zones.draw(player).is_some();
    if let Some(sensor) = state.zones.get_mut(slot) {
        sensor.tapped = true;
    }
    tracing::debug!(%player, research, drew, "quantum sensor");
    Ok(drew)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;
    use crate::core::MatchConfig;
    use crate::effects::EventEffect;

    fn state() -> MatchState {
        MatchState::new(MatchConfig::default())
    }

    fn ready(state: &mut MatchState, card: CardDefinition, owner: PlayerId, zone: Zone) -> Slot {
        let mut instance = state.spawn(card, owner);
        instance.summoning_sickness = false;
        instance.deployed_this_turn = false;
        state.zones.deploy(zone, instance).unwrap()
    }

    fn install_generator(state: &mut MatchState, owner: PlayerId) {
        let generator = state.spawn(catalog::generator(), owner);
        assert!(state.zones.install_generator(generator));
    }

    #[test]
    fn test_play_unit_uses_gate() {
        let mut state = state();
        let frigate = CardDefinition::new(CardId::new(1), "Frigate", CardKind::Ship).with_cost(1);
        state.zones.add_to_hand(PlayerId::P1, frigate);

        let outcome = play_card(&mut state, PlayerId::P1, 0, 0).unwrap();

        assert_eq!(outcome, PlayOutcome::Deployed(Slot::orbit(PlayerId::P1, 0)));
        assert!(state.zones.hand(PlayerId::P1).is_empty());
        assert!(state.gates[PlayerId::P1][0].used);
        assert!(state.zones.orbit(PlayerId::P1)[0].summoning_sickness);

        let second = CardDefinition::new(CardId::new(2), "Marines", CardKind::GroundUnit).with_cost(1);
        state.zones.add_to_hand(PlayerId::P1, second);
        assert_eq!(
            play_card(&mut state, PlayerId::P1, 0, 0),
            Err(ActionError::GateUnavailable(0))
        );
        assert_eq!(state.zones.hand(PlayerId::P1).len(), 1);
    }

    #[test]
    fn test_select_then_choose_gate() {
        let mut state = state();
        let cruiser = CardDefinition::new(CardId::new(1), "Cruiser", CardKind::Ship).with_cost(2);
        state.zones.add_to_hand(PlayerId::P1, cruiser.clone());
        assert_eq!(
            select_card(&mut state, PlayerId::P1, 0),
            Err(ActionError::NoAvailableGate { cost: 2 })
        );

        state.gates[PlayerId::P1][0].power = 2;
        select_card(&mut state, PlayerId::P1, 0).unwrap();
        assert!(matches!(state.pending, PendingMode::SelectingGate { hand_index: 0, .. }));

        choose_gate(&mut state, PlayerId::P1, 0).unwrap();
        assert!(state.pending.is_none());
        assert_eq!(state.zones.orbit(PlayerId::P1)[0].card, cruiser);
    }

    #[test]
    fn test_play_event_goes_through_event_engine() {
        let mut state = state();
        let emp = CardDefinition::new(CardId::new(1), "EMP", CardKind::Event)
            .with_ability(Ability::Event(EventEffect::AreaDamage { amount: 2 }));
        state.zones.add_to_hand(PlayerId::P1, emp);

        let outcome = play_card(&mut state, PlayerId::P1, 0, 0).unwrap();
        assert!(matches!(outcome, PlayOutcome::Event(EventOutcome::Resolved { .. })));
        assert_eq!(state.zones.graveyard(PlayerId::P1).len(), 1);
    }

    #[test]
    fn test_land_dropship() {
        let mut state = state();
        let dropship = CardDefinition::new(CardId::new(1), "Dropship", CardKind::Ship)
            .with_ability(Ability::Dropship { attack: 3, defense: 3 });
        let fresh = state.spawn(dropship, PlayerId::P1);
        let fresh = state.zones.deploy(Zone::Orbit, fresh).unwrap();
        assert_eq!(land_dropship(&mut state, PlayerId::P1, fresh), Err(ActionError::SummoningSick));

        state.zones.get_mut(fresh).unwrap().summoning_sickness = false;
        let landed = land_dropship(&mut state, PlayerId::P1, fresh).unwrap();

        assert!(state.zones.orbit(PlayerId::P1).is_empty());
        let token = state.zones.get(landed).unwrap();
        assert!(token.token);
        assert_eq!((token.power, token.toughness), (3, 3));
        assert_eq!(state.zones.graveyard(PlayerId::P1)[0].id, CardId::new(1));
    }

    #[test]
    fn test_deploy_tokens_pays_energy() {
        let mut state = state();
        let carrier = CardDefinition::new(CardId::new(1), "Carrier", CardKind::Ship).with_ability(
            Ability::Carrier {
                tokens: 2,
                attack: 1,
                defense: 1,
                energy_cost: 2,
            },
        );
        let slot = ready(&mut state, carrier, PlayerId::P1, Zone::Orbit);

        let launched = deploy_tokens(&mut state, PlayerId::P1, slot).unwrap();

        assert_eq!(launched.len(), 2);
        assert_eq!(state.energy[PlayerId::P1], 1);
        assert!(state.zones.get(slot).unwrap().tapped);
        assert_eq!(deploy_tokens(&mut state, PlayerId::P1, slot), Err(ActionError::Tapped));
    }

    #[test]
    fn test_move_to_planet_once() {
        let mut state = state();
        let skiff = CardDefinition::new(CardId::new(1), "Skiff", CardKind::Ship)
            .with_stats(1, 1)
            .with_ability(Ability::Atmospheric);
        let fresh = state.spawn(skiff.clone(), PlayerId::P1);
        let fresh = state.zones.deploy(Zone::Orbit, fresh).unwrap();
        assert_eq!(move_to_planet(&mut state, PlayerId::P1, fresh), Err(ActionError::AlreadyMoved));
        state.zones.remove(fresh);

        let slot = ready(&mut state, skiff, PlayerId::P1, Zone::Orbit);
        let landed = move_to_planet(&mut state, PlayerId::P1, slot).unwrap();
        assert_eq!(landed, Slot::planet(PlayerId::P1, 0));
        assert!(state.zones.get(landed).unwrap().moved_this_turn);
    }

    #[test]
    fn test_garrison_requires_held_generator() {
        let mut state = state();
        let trooper = CardDefinition::new(CardId::new(1), "Trooper", CardKind::GroundUnit).with_stats(2, 3);
        let slot = ready(&mut state, trooper, PlayerId::P1, Zone::Planet);
        assert_eq!(garrison(&mut state, PlayerId::P1, slot), Err(ActionError::NoGenerator));

        install_generator(&mut state, PlayerId::P2);
        assert_eq!(
            garrison(&mut state, PlayerId::P1, slot),
            Err(ActionError::GeneratorNotControlled)
        );

        state.zones.generator_mut().unwrap().instance.owner = PlayerId::P1;
        garrison(&mut state, PlayerId::P1, slot).unwrap();
        let generator = state.zones.generator().unwrap();
        assert_eq!((generator.instance.power, generator.instance.toughness), (2, 7));
        assert!(state.zones.get(slot).unwrap().garrisoned);
        assert!(state.zones.get(slot).unwrap().tapped);
    }

    #[test]
    fn test_survey_with_given_outcome() {
        let mut state = state();
        let drone = CardDefinition::new(CardId::new(1), "Drone", CardKind::Ship)
            .with_ability(Ability::Survey { energy_cost: 1 });
        let slot = ready(&mut state, drone, PlayerId::P1, Zone::Orbit);

        let outcome = survey(&mut state, PlayerId::P1, slot, Some(Discovery::Generator)).unwrap();

        assert_eq!(outcome, Discovery::Generator);
        assert_eq!(state.research[PlayerId::P1], 1);
        assert_eq!(state.energy[PlayerId::P1], 2);
        assert_eq!(state.zones.generator_owner(), Some(PlayerId::P1));
        assert!(state.zones.get(slot).unwrap().tapped);
    }
}
