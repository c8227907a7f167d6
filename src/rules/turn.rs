//! Turn controller.
//!
//! `end_turn` is the only phase transition; the consciousness tap in
//! `deploy::tap_card` is the only way to reach game over.

use crate::cards::Ability;
use crate::core::{MatchState, PlayerId};
use crate::error::ActionResult;
use crate::resources::{energy, gates};

/// What happened at a turn boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnChange {
    pub previous: PlayerId,
    pub active: PlayerId,
    pub turn: u32,
    /// Energy gained by the new active player.
    pub energy_gained: i32,
    /// Whether the new active player drew a card.
    pub drew: bool,
}

/// End `player`'s turn and start the opponent's.
pub fn end_turn(state: &mut MatchState, player: PlayerId) -> ActionResult<TurnChange> {
    state.ensure_active(player)?;

    // The ending player's cards have now survived a full cycle.
    state.zones.for_each_instance_mut(|unit| {
        if unit.owner == player {
            unit.summoning_sickness = false;
        }
    });
    state.cancel_pending();
    state.zones.for_each_instance_mut(|unit| unit.reset_turn_flags());
    apply_growth(state, player);

    let next = player.opponent();
    state.active_player = next;
    state.turn += 1;
    state.gate_action_used = false;
    gates::refresh_gates(state, next);

    state.zones.for_each_instance_mut(|unit| unit.damage = 0);
    let energy_gained = energy::regenerate(state, next);
    state.zones.for_each_instance_mut(|unit| {
        if unit.owner == next {
            unit.refresh();
        }
    });
    let drew = state.zones.draw(next).is_some();

    tracing::info!(previous = %player, active = %next, turn = state.turn, "turn started");
    Ok(TurnChange {
        previous: player,
        active: next,
        turn: state.turn,
        energy_gained,
        drew,
    })
}

/// End-of-turn growth for `player`'s cards.
fn apply_growth(state: &mut MatchState, player: PlayerId) {
    state.zones.for_each_instance_mut(|unit| {
        if unit.owner != player {
            return;
        }
        let growth = unit.card.find(|a| match a {
            Ability::Growth { attack, defense } => Some((*attack, *defense)),
            _ => None,
        });
        if let Some((attack, defense)) = growth {
            unit.power += attack;
            unit.toughness += defense;
        }
    });
}
