//! Action dispatcher.
//!
//! `apply_action` is the single entry point for every mutating action,
//! whether it comes from the local player, the AI, or a remote message.
//! Payload addresses are resolved against the local zone arrays, the
//! action runs, and the applied form is recorded in the history.
//!
//! Applying is all-or-nothing: on error the state is restored to what it
//! was before the call. Match states are persistent (`im`), so the
//! snapshot is cheap.

use super::deploy;
use super::turn;
use crate::cards::CardDefinition;
use crate::combat::{resolver, stack};
use crate::core::{Action, AttackMode, AttackPayload, CardPayload, MatchState, PlayerId};
use crate::effects;
use crate::error::{ActionError, ActionResult};
use crate::resources::gates;
use crate::zones::{Slot, Zone};

/// Apply `action` for the player it names (the active player for
/// `end_turn`).
///
/// Returns the action as applied. For `survey` this carries the resolved
/// discovery, which is what must be sent to the other client.
pub fn apply_action(state: &mut MatchState, action: Action) -> ActionResult<Action> {
    let player = action.seat().unwrap_or(state.active_player);
    let snapshot = state.clone();

    match dispatch(state, player, action) {
        Ok(applied) => {
            tracing::debug!(%player, action = applied.wire_type(), turn = state.turn, "action applied");
            state.record(player, applied.clone());
            Ok(applied)
        }
        Err(err) => {
            *state = snapshot;
            tracing::debug!(%player, error = %err, "action rejected");
            Err(err)
        }
    }
}

fn dispatch(state: &mut MatchState, player: PlayerId, action: Action) -> ActionResult<Action> {
    match action {
        Action::EndTurn => {
            turn::end_turn(state, player)?;
            Ok(Action::EndTurn)
        }
        Action::AddGate(payload) => {
            gates::add_gate(state, player)?;
            Ok(Action::AddGate(payload))
        }
        Action::IncrementGate(payload) => {
            gates::increment_gate(state, player, payload.gate_index)?;
            Ok(Action::IncrementGate(payload))
        }
        Action::PlayCard(payload) => {
            let hand_index = locate_in_hand(state, player, payload.card_index, &payload.card_data);
            deploy::play_resolved(state, player, hand_index, payload.card_data.clone(), payload.gate_index)?;
            Ok(Action::PlayCard(payload))
        }
        Action::Attack(payload) => {
            attack(state, player, &payload)?;
            Ok(Action::Attack(payload))
        }
        Action::LandDropship(payload) => {
            deploy::land_dropship(state, player, card_slot(player, &payload, Zone::Orbit))?;
            Ok(Action::LandDropship(payload))
        }
        Action::TapCard(payload) => {
            deploy::tap_card(state, player, card_slot(player, &payload, Zone::Planet))?;
            Ok(Action::TapCard(payload))
        }
        Action::Survey(mut payload) => {
            let slot = card_slot(player, &payload, Zone::Orbit);
            let discovery = deploy::survey(state, player, slot, payload.discovery.take())?;
            payload.discovery = Some(discovery);
            Ok(Action::Survey(payload))
        }
        Action::QuantumSensor(payload) => {
            deploy::quantum_sensor(state, player, card_slot(player, &payload, Zone::Planet))?;
            Ok(Action::QuantumSensor(payload))
        }
        Action::Garrison(payload) => {
            deploy::garrison(state, player, card_slot(player, &payload, Zone::Planet))?;
            Ok(Action::Garrison(payload))
        }
        Action::DeployTokens(payload) => {
            deploy::deploy_tokens(state, player, card_slot(player, &payload, Zone::Orbit))?;
            Ok(Action::DeployTokens(payload))
        }
        Action::MoveToPlanet(payload) => {
            deploy::move_to_planet(state, player, card_slot(player, &payload, Zone::Orbit))?;
            Ok(Action::MoveToPlanet(payload))
        }
        Action::ResolveTarget(payload) => {
            let owner = PlayerId::from_is_player1(payload.target_is_player1);
            effects::resolve_target(state, player, payload.target.at(owner))?;
            Ok(Action::ResolveTarget(payload))
        }
        Action::CancelSelection(payload) => {
            state.ensure_active(player)?;
            if !state.cancel_pending() {
                return Err(ActionError::NothingPending);
            }
            Ok(Action::CancelSelection(payload))
        }
    }
}

/// Slot of the card an ability payload names.
fn card_slot(player: PlayerId, payload: &CardPayload, default_zone: Zone) -> Slot {
    Slot::new(player, payload.zone.unwrap_or(default_zone), payload.card_index)
}

/// Find the played card in the local hand: at the sent index if the ids
/// agree, else the first copy with the same id.
fn locate_in_hand(
    state: &MatchState,
    player: PlayerId,
    index: usize,
    card: &CardDefinition,
) -> Option<usize> {
    let hand = state.zones.hand(player);
    if hand.get(index).is_some_and(|c| c.id == card.id) {
        return Some(index);
    }
    let found = state.zones.hand_position(player, card.id);
    if found.is_none() {
        tracing::warn!(%player, card = %card.name, index, "played card not in local hand");
    }
    found
}

fn attack(state: &mut MatchState, player: PlayerId, payload: &AttackPayload) -> ActionResult<()> {
    let attackers: Vec<Slot> = payload.attacker_indices.iter().map(|w| w.at(player)).collect();
    let target = Slot::new(player.opponent(), payload.target_zone, payload.target_index);

    match payload.mode {
        AttackMode::Stack => {
            if stack::stack_slots(state) != attackers {
                stack::set_stack(state, player, &attackers)?;
            }
            resolver::execute_stack(state, player, target)?;
        }
        AttackMode::Single => {
            let [attacker] = attackers.as_slice() else {
                return Err(ActionError::InvalidTarget);
            };
            resolver::single_combat(state, player, *attacker, target)?;
        }
    }
    Ok(())
}
