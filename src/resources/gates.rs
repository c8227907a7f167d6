//! Gates: the per-player resource nodes that pay for cards.
//!
//! A gate pays for one card per turn whose cost does not exceed its power.
//! Adding a gate and upgrading one share a single economy action per turn.

use serde::{Deserialize, Serialize};

use crate::core::{MatchState, PlayerId};
use crate::error::{ActionError, ActionResult};

/// A gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gate {
    pub power: u32,
    /// Paid for a card this turn.
    pub used: bool,
}

impl Gate {
    /// A fresh gate: power 1, unused.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            power: 1,
            used: false,
        }
    }

    /// Whether this gate can pay `cost` right now.
    #[must_use]
    pub const fn can_pay(&self, cost: u32) -> bool {
        !self.used && self.power >= cost
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_economy_action(state: &MatchState, player: PlayerId) -> ActionResult<()> {
    state.ensure_active(player)?;
    if state.gate_action_used {
        return Err(ActionError::GateActionUsed);
    }
    Ok(())
}

/// Create a gate at power 1. Returns its index.
pub fn add_gate(state: &mut MatchState, player: PlayerId) -> ActionResult<usize> {
    ensure_economy_action(state, player)?;
    let max = state.config.max_gates;
    let gates = &mut state.gates[player];
    if gates.len() >= max {
        return Err(ActionError::GateLimit(max));
    }

    gates.push(Gate::new());
    state.gate_action_used = true;
    let index = state.gates[player].len() - 1;
    tracing::debug!(%player, index, "gate added");
    Ok(index)
}

/// Raise a gate's power by one. Returns the new power.
pub fn increment_gate(state: &mut MatchState, player: PlayerId, gate_index: usize) -> ActionResult<u32> {
    ensure_economy_action(state, player)?;
    let gate = state.gates[player]
        .get_mut(gate_index)
        .ok_or(ActionError::NoSuchGate(gate_index))?;

    gate.power += 1;
    let power = gate.power;
    state.gate_action_used = true;
    tracing::debug!(%player, gate_index, power, "gate upgraded");
    Ok(power)
}

/// The cheapest unused gate with `power >= cost`; ties go to the lower
/// index. This is the admission check for playing a card.
#[must_use]
pub fn find_available_gate(state: &MatchState, cost: u32, player: PlayerId) -> Option<usize> {
    state.gates[player]
        .iter()
        .enumerate()
        .filter(|(_, g)| g.can_pay(cost))
        .min_by_key(|(i, g)| (g.power, *i))
        .map(|(i, _)| i)
}

/// Index of the lowest-power gate.
#[must_use]
pub fn weakest_gate(state: &MatchState, player: PlayerId) -> Option<usize> {
    state.gates[player]
        .iter()
        .enumerate()
        .min_by_key(|(i, g)| (g.power, *i))
        .map(|(i, _)| i)
}

/// Check that a specific gate can pay `cost`.
pub fn check_gate(state: &MatchState, player: PlayerId, gate_index: usize, cost: u32) -> ActionResult<()> {
    let gate = state.gates[player]
        .get(gate_index)
        .ok_or(ActionError::NoSuchGate(gate_index))?;
    if !gate.can_pay(cost) {
        return Err(ActionError::GateUnavailable(gate_index));
    }
    Ok(())
}

/// Mark a gate used after `check_gate` passed.
pub(crate) fn mark_used(state: &mut MatchState, player: PlayerId, gate_index: usize) {
    if let Some(gate) = state.gates[player].get_mut(gate_index) {
        gate.used = true;
    }
}

/// Clear every gate's `used` flag for a player's new turn.
pub fn refresh_gates(state: &mut MatchState, player: PlayerId) {
    for gate in state.gates[player].iter_mut() {
        gate.used = false;
    }
}
