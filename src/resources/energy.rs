//! Energy pool.
//!
//! Energy is regenerated at end of turn from the board:
//! `income = Σ GeneratesEnergy + generator bonus (if held)` and
//! `cap = base cap + Σ EnergyCapacity`. Neither bonus has an upper bound.

use crate::cards::Ability;
use crate::core::{MatchState, PlayerId};
use crate::error::{ActionError, ActionResult};

fn board_sum(state: &MatchState, player: PlayerId, f: impl Fn(&Ability) -> Option<i32>) -> i32 {
    state
        .zones
        .battlefield(player)
        .flat_map(|c| c.card.abilities.iter())
        .filter_map(f)
        .sum()
}

/// Energy cap: base plus every `EnergyCapacity` on the player's board.
#[must_use]
pub fn energy_cap(state: &MatchState, player: PlayerId) -> i32 {
    state.config.base_energy_cap
        + board_sum(state, player, |a| match a {
            Ability::EnergyCapacity { amount } => Some(*amount),
            _ => None,
        })
}

/// Energy gained at end of turn.
#[must_use]
pub fn energy_income(state: &MatchState, player: PlayerId) -> i32 {
    let generator_bonus = if state.zones.generator_owner() == Some(player) {
        state.config.generator_energy_bonus
    } else {
        0
    };
    generator_bonus
        + board_sum(state, player, |a| match a {
            Ability::GeneratesEnergy { amount } => Some(*amount),
            _ => None,
        })
}

/// Add energy, capped. Returns the amount actually gained.
pub fn gain(state: &mut MatchState, player: PlayerId, amount: i32) -> i32 {
    let cap = energy_cap(state, player);
    let before = state.energy[player];
    state.energy[player] = (before + amount).min(cap).max(before.min(cap));
    state.energy[player] - before
}

/// End-of-turn regeneration for `player`.
pub fn regenerate(state: &mut MatchState, player: PlayerId) -> i32 {
    let income = energy_income(state, player);
    let gained = gain(state, player, income);
    tracing::debug!(%player, income, gained, energy = state.energy[player], "energy regenerated");
    gained
}

/// Debit energy. Fails without a partial spend if the pool is short.
pub fn spend(state: &mut MatchState, player: PlayerId, amount: i32) -> bool {
    if state.energy[player] < amount {
        return false;
    }
    state.energy[player] -= amount;
    true
}

/// Check that `amount` can be spent.
pub fn ensure_energy(state: &MatchState, player: PlayerId, amount: i32) -> ActionResult<()> {
    let available = state.energy[player];
    if available < amount {
        return Err(ActionError::InsufficientEnergy {
            needed: amount,
            available,
        });
    }
    Ok(())
}
