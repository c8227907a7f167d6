//! Client facade: one seat's view of a match.
//!
//! Local actions are checked with `can_act`, applied, and, in a remote
//! session, broadcast with the resulting snapshot hash. Remote messages
//! are decoded and applied without the permission check; failures are
//! logged and never propagate. A remote survey must carry its discovery
//! outcome and is refused without one.
//!
//! In a single-player session an `AiDriver` plays the other seat, one
//! step per due `update`.

use serde_json::Value;

use super::protocol::{self, RemoteAction};
use super::transport::Transport;
use crate::ai::AiDriver;
use crate::combat::{self, stack};
use crate::core::{Action, AttackMode, CardPayload, MatchState, PendingMode, PlayerId, PublicState};
use crate::error::{ActionError, ActionResult, WireError};
use crate::rules::{self, apply_action};
use crate::zones::{Slot, Zone};

/// Snapshot mismatch seen after applying a remote action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Divergence {
    pub turn: u32,
    pub action_type: String,
    pub expected: u64,
    pub actual: u64,
}

/// What happened to an inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteOutcome {
    Applied,
    /// Applied, but the snapshot hash disagreed with the sender's.
    Diverged(Divergence),
    /// Unknown type or malformed payload.
    Ignored,
    /// The action did not apply locally.
    Rejected(ActionError),
}

pub struct GameClient {
    state: MatchState,
    local_player: PlayerId,
    transport: Option<Box<dyn Transport>>,
    ai: Option<AiDriver>,
    clock_ms: u64,
    notices: Vec<String>,
    divergences: Vec<Divergence>,
}

impl GameClient {
    /// Hot-seat or single-player match. With `with_ai`, player 2 is the
    /// scripted AI.
    #[must_use]
    pub fn local(state: MatchState, with_ai: bool) -> Self {
        let ai = with_ai.then(|| AiDriver::new(&state, PlayerId::P2));
        Self {
            state,
            local_player: PlayerId::P1,
            transport: None,
            ai,
            clock_ms: 0,
            notices: Vec::new(),
            divergences: Vec::new(),
        }
    }

    /// One seat of a remote match.
    #[must_use]
    pub fn remote(state: MatchState, local_player: PlayerId, transport: impl Transport + 'static) -> Self {
        Self {
            state,
            local_player,
            transport: Some(Box::new(transport)),
            ai: None,
            clock_ms: 0,
            notices: Vec::new(),
            divergences: Vec::new(),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn public_state(&self) -> PublicState {
        self.state.public_state()
    }

    #[must_use]
    pub const fn local_player(&self) -> PlayerId {
        self.local_player
    }

    #[must_use]
    pub fn is_multiplayer(&self) -> bool {
        self.transport.is_some()
    }

    /// Whether the local seat may act now. Hot-seat play may always act;
    /// otherwise only on the local seat's turn.
    #[must_use]
    pub fn can_act(&self) -> bool {
        let hot_seat = !self.is_multiplayer() && self.ai.is_none();
        hot_seat || self.state.active_player == self.local_player
    }

    /// The seat local actions are taken for. Outside a remote session this
    /// is whoever is active, so hot-seat play works from one client.
    fn acting_seat(&self) -> PlayerId {
        if self.is_multiplayer() || self.ai.is_some() {
            self.local_player
        } else {
            self.state.active_player
        }
    }

    /// User-facing messages since the last call.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub fn divergences(&self) -> &[Divergence] {
        &self.divergences
    }

    // === Local actions ===

    /// Apply a local action and broadcast it if this is a remote session.
    pub fn perform(&mut self, action: Action) -> ActionResult<Action> {
        if !self.can_act() {
            self.notices.push("Not your turn".to_string());
            return Err(ActionError::NotYourTurn(self.local_player));
        }

        let applied = match apply_action(&mut self.state, action) {
            Ok(applied) => applied,
            Err(err) => {
                self.notices.push(err.to_string());
                return Err(err);
            }
        };
        self.broadcast(&applied);
        self.schedule_ai();
        Ok(applied)
    }

    fn broadcast(&mut self, action: &Action) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        let encoded = protocol::state_hash(&self.state)
            .and_then(|hash| protocol::encode_message(action, hash));
        match encoded {
            Ok((action_type, data)) => transport.send_action(&action_type, data),
            Err(err) => tracing::error!(error = %err, "failed to encode outbound action"),
        }
    }

    pub fn end_turn(&mut self) -> ActionResult<Action> {
        self.perform(Action::EndTurn)
    }

    pub fn add_gate(&mut self) -> ActionResult<Action> {
        self.perform(Action::add_gate(self.acting_seat()))
    }

    pub fn increment_gate(&mut self, gate_index: usize) -> ActionResult<Action> {
        self.perform(Action::increment_gate(self.acting_seat(), gate_index))
    }

    pub fn play_card(&mut self, hand_index: usize, gate_index: usize) -> ActionResult<Action> {
        let seat = self.acting_seat();
        let card = self
            .state
            .zones
            .hand(seat)
            .get(hand_index)
            .cloned()
            .ok_or(ActionError::NoSuchCard)?;
        self.perform(Action::play_card(seat, hand_index, gate_index, card))
    }

    /// Pick a hand card; the next `choose_gate` plays it.
    pub fn select_card(&mut self, hand_index: usize) -> ActionResult<()> {
        self.local_only(|state, seat| rules::select_card(state, seat, hand_index))
    }

    pub fn choose_gate(&mut self, gate_index: usize) -> ActionResult<Action> {
        let hand_index = match self.state.pending {
            PendingMode::SelectingGate { hand_index, .. } => hand_index,
            _ => return Err(ActionError::NothingPending),
        };
        self.play_card(hand_index, gate_index)
    }

    /// Toggle a unit in the attacker stack. Stack building is local; only
    /// the attack itself is sent.
    pub fn toggle_attacker(&mut self, slot: Slot) -> ActionResult<bool> {
        self.local_only(|state, seat| stack::toggle_attacker(state, seat, slot))
    }

    /// Send the current stack against `target`.
    pub fn attack_with_stack(&mut self, target: Slot) -> ActionResult<Action> {
        let attackers = stack::stack_slots(&self.state);
        if attackers.is_empty() {
            return Err(ActionError::EmptyStack);
        }
        self.perform(Action::attack(self.acting_seat(), &attackers, target, AttackMode::Stack))
    }

    /// One attacker against one target.
    pub fn attack_single(&mut self, attacker: Slot, target: Slot) -> ActionResult<Action> {
        self.perform(Action::attack(self.acting_seat(), &[attacker], target, AttackMode::Single))
    }

    pub fn land_dropship(&mut self, orbit_index: usize) -> ActionResult<Action> {
        self.card_action(Action::LandDropship, Zone::Orbit, orbit_index)
    }

    pub fn tap_card(&mut self, slot: Slot) -> ActionResult<Action> {
        self.card_action(Action::TapCard, slot.zone, slot.index)
    }

    pub fn survey(&mut self, slot: Slot) -> ActionResult<Action> {
        self.card_action(Action::Survey, slot.zone, slot.index)
    }

    pub fn quantum_sensor(&mut self, slot: Slot) -> ActionResult<Action> {
        self.card_action(Action::QuantumSensor, slot.zone, slot.index)
    }

    pub fn garrison(&mut self, planet_index: usize) -> ActionResult<Action> {
        self.card_action(Action::Garrison, Zone::Planet, planet_index)
    }

    pub fn deploy_tokens(&mut self, orbit_index: usize) -> ActionResult<Action> {
        self.card_action(Action::DeployTokens, Zone::Orbit, orbit_index)
    }

    pub fn move_to_planet(&mut self, orbit_index: usize) -> ActionResult<Action> {
        self.card_action(Action::MoveToPlanet, Zone::Orbit, orbit_index)
    }

    /// Pick the target of a pending event or equipment card.
    pub fn resolve_target(&mut self, target: Slot) -> ActionResult<Action> {
        self.perform(Action::resolve_target(self.acting_seat(), target))
    }

    /// Abandon the pending selection. Gate choices and attacker stacks are
    /// local; a paid-for event or equipment card is replicated.
    pub fn cancel_selection(&mut self) -> ActionResult<()> {
        match self.state.pending {
            PendingMode::None => Err(ActionError::NothingPending),
            PendingMode::SelectingGate { .. } | PendingMode::CombatSelection { .. } => {
                self.state.cancel_pending();
                Ok(())
            }
            _ => self.perform(Action::cancel_selection(self.acting_seat())).map(|_| ()),
        }
    }

    /// Targets for the attacker stack, for highlighting.
    #[must_use]
    pub fn stack_targets(&self) -> Vec<Slot> {
        combat::stack_targets(&self.state)
    }

    fn card_action(
        &mut self,
        wrap: fn(CardPayload) -> Action,
        zone: Zone,
        index: usize,
    ) -> ActionResult<Action> {
        self.perform(wrap(CardPayload::new(self.acting_seat(), zone, index)))
    }

    fn local_only<T>(&mut self, f: impl FnOnce(&mut MatchState, PlayerId) -> ActionResult<T>) -> ActionResult<T> {
        if !self.can_act() {
            self.notices.push("Not your turn".to_string());
            return Err(ActionError::NotYourTurn(self.local_player));
        }
        let seat = self.acting_seat();
        f(&mut self.state, seat).map_err(|err| {
            self.notices.push(err.to_string());
            err
        })
    }

    // === Remote actions ===

    /// Apply a message from the other client.
    pub fn handle_remote_action(&mut self, action_type: &str, data: &Value) -> RemoteOutcome {
        let RemoteAction { action, state_hash } = match protocol::decode_message(action_type, data) {
            Ok(remote) => remote,
            Err(WireError::UnknownActionType(kind)) => {
                tracing::warn!(action_type = %kind, "unknown remote action type ignored");
                return RemoteOutcome::Ignored;
            }
            Err(err) => {
                tracing::error!(action_type, error = %err, "malformed remote action");
                return RemoteOutcome::Ignored;
            }
        };

        // Only the surveying client rolls; a remote survey must bring its outcome.
        if matches!(&action, Action::Survey(payload) if payload.discovery.is_none()) {
            tracing::warn!(action_type, "remote survey without a discovery outcome");
            return RemoteOutcome::Rejected(ActionError::MissingOutcome);
        }

        match apply_action(&mut self.state, action) {
            Ok(_) => {}
            Err(ActionError::NoSuchCard) => {
                tracing::debug!(action_type, "remote action addressed a missing card");
                return RemoteOutcome::Rejected(ActionError::NoSuchCard);
            }
            Err(err) => {
                tracing::error!(action_type, error = %err, "remote action failed");
                return RemoteOutcome::Rejected(err);
            }
        }

        let Some(expected) = state_hash else {
            return RemoteOutcome::Applied;
        };
        match protocol::state_hash(&self.state) {
            Ok(actual) if actual == expected => RemoteOutcome::Applied,
            Ok(actual) => {
                let divergence = Divergence {
                    turn: self.state.turn,
                    action_type: action_type.to_string(),
                    expected,
                    actual,
                };
                tracing::warn!(turn = divergence.turn, action_type, expected, actual, "state divergence detected");
                self.divergences.push(divergence.clone());
                RemoteOutcome::Diverged(divergence)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to hash local state");
                RemoteOutcome::Applied
            }
        }
    }

    // === Frame update ===

    /// Run whatever AI step is due at `now_ms`. Returns the AI's applied
    /// actions.
    pub fn update(&mut self, now_ms: u64) -> Vec<Action> {
        self.clock_ms = now_ms;
        self.schedule_ai();
        match self.ai.as_mut() {
            Some(ai) => ai.tick(&mut self.state, now_ms),
            None => Vec::new(),
        }
    }

    /// Start the AI's turn if it just became active.
    fn schedule_ai(&mut self) {
        let Some(ai) = self.ai.as_mut() else {
            return;
        };
        if !ai.is_running() && !self.state.is_game_over() && self.state.active_player == ai.player() {
            ai.begin_turn(self.clock_ms);
        }
    }
}

impl std::fmt::Debug for GameClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameClient")
            .field("local_player", &self.local_player)
            .field("multiplayer", &self.is_multiplayer())
            .field("turn", &self.state.turn)
            .field("active_player", &self.state.active_player)
            .field("divergences", &self.divergences.len())
            .finish_non_exhaustive()
    }
}
