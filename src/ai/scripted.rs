//! Scripted opponent.
//!
//! One pass per AI turn, each step due `ai_step_delay_ms` after the
//! previous one:
//!
//! 1. Economy: coin flip to add a gate while under the limit, otherwise
//!    upgrade the weakest gate.
//! 2. Play: every affordable hand card, newest first, on the cheapest
//!    gate that can pay.
//! 3. Deploy: carrier launches, then dropship landings.
//! 4. Attack: ground units hit the weakest enemy ground unit; ships hit
//!    the weakest enemy ship, or with orbital strike the weakest ground
//!    unit.
//! 5. End turn.
//!
//! Sub-steps that turn out to be illegal are skipped.

use crate::cards::Ability;
use crate::combat::{current_hp, targeting};
use crate::core::{Action, AttackMode, CardPayload, EntityId, GameRng, MatchState, PendingMode, PlayerId};
use crate::effects;
use crate::resources::{energy, gates};
use crate::rules::apply_action;
use crate::zones::{Slot, Zone};

/// A step of the AI script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AiStep {
    Economy,
    Play,
    Deploy,
    Attack,
    EndTurn,
}

impl AiStep {
    /// The step after this one, `None` after ending the turn.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Economy => Some(Self::Play),
            Self::Play => Some(Self::Deploy),
            Self::Deploy => Some(Self::Attack),
            Self::Attack => Some(Self::EndTurn),
            Self::EndTurn => None,
        }
    }
}

/// Drives one seat through the script on a clock supplied by the caller.
#[derive(Clone, Debug)]
pub struct AiDriver {
    player: PlayerId,
    delay_ms: u64,
    rng: GameRng,
    next: Option<(AiStep, u64)>,
}

impl AiDriver {
    /// A driver for `player`. Coin flips use their own stream derived
    /// from the match seed, so they never disturb shuffles or discovery
    /// rolls.
    #[must_use]
    pub fn new(state: &MatchState, player: PlayerId) -> Self {
        Self {
            player,
            delay_ms: state.config.ai_step_delay_ms,
            rng: state.rng.for_context("ai"),
            next: None,
        }
    }

    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Next step and when it is due, if a turn is in progress.
    #[must_use]
    pub const fn pending_step(&self) -> Option<(AiStep, u64)> {
        self.next
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Schedule the first step of a turn.
    pub fn begin_turn(&mut self, now_ms: u64) {
        self.next = Some((AiStep::Economy, now_ms + self.delay_ms));
        tracing::debug!(player = %self.player, due = now_ms + self.delay_ms, "ai turn scheduled");
    }

    /// Run the step that is due at `now_ms`, if any. Returns the applied
    /// actions.
    pub fn tick(&mut self, state: &mut MatchState, now_ms: u64) -> Vec<Action> {
        let Some((step, due)) = self.next else {
            return Vec::new();
        };
        if state.is_game_over() || state.active_player != self.player {
            self.next = None;
            return Vec::new();
        }
        if now_ms < due {
            return Vec::new();
        }

        let applied = self.run_step(state, step);
        self.next = step.next().map(|s| (s, now_ms + self.delay_ms));
        applied
    }

    /// Run the whole script immediately.
    pub fn run_to_completion(&mut self, state: &mut MatchState) -> Vec<Action> {
        let mut applied = Vec::new();
        let mut step = Some(AiStep::Economy);
        while let Some(current) = step {
            if state.is_game_over() || state.active_player != self.player {
                break;
            }
            applied.extend(self.run_step(state, current));
            step = current.next();
        }
        self.next = None;
        applied
    }

    fn run_step(&mut self, state: &mut MatchState, step: AiStep) -> Vec<Action> {
        tracing::debug!(player = %self.player, ?step, "ai step");
        let mut log = ActionLog::default();
        match step {
            AiStep::Economy => self.economy(state, &mut log),
            AiStep::Play => play_hand(state, self.player, &mut log),
            AiStep::Deploy => deploy(state, self.player, &mut log),
            AiStep::Attack => attack(state, self.player, &mut log),
            AiStep::EndTurn => {
                log.apply(state, Action::EndTurn);
            }
        }
        log.0
    }

    fn economy(&mut self, state: &mut MatchState, log: &mut ActionLog) {
        let player = self.player;
        let under_limit = state.gates[player].len() < state.config.max_gates;
        if under_limit && self.rng.roll(0.5) {
            log.apply(state, Action::add_gate(player));
        } else if let Some(weakest) = gates::weakest_gate(state, player) {
            log.apply(state, Action::increment_gate(player, weakest));
        }
    }
}

/// Actions applied during one step. Rejections are dropped.
#[derive(Default)]
struct ActionLog(Vec<Action>);

impl ActionLog {
    fn apply(&mut self, state: &mut MatchState, action: Action) -> bool {
        match apply_action(state, action) {
            Ok(applied) => {
                self.0.push(applied);
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "ai sub-step skipped");
                false
            }
        }
    }
}

fn play_hand(state: &mut MatchState, player: PlayerId, log: &mut ActionLog) {
    // Newest first; removing a card never shifts the lower indices.
    for index in (0..state.zones.hand(player).len()).rev() {
        let Some(card) = state.zones.hand(player).get(index).cloned() else {
            continue;
        };
        let Some(gate) = gates::find_available_gate(state, card.cost, player) else {
            continue;
        };
        if log.apply(state, Action::play_card(player, index, gate, card)) {
            settle_selection(state, player, log);
        }
    }
}

/// Finish or abandon a selection left by an event or equipment card.
fn settle_selection(state: &mut MatchState, player: PlayerId, log: &mut ActionLog) {
    let target = match &state.pending {
        PendingMode::SelectingEventTarget { .. } => weakest(state, &effects::event_targets(state, player)),
        PendingMode::SelectingEquipmentTarget { .. } => effects::equipment_targets(state, player).first().copied(),
        _ => return,
    };
    let resolved = target.is_some_and(|slot| log.apply(state, Action::resolve_target(player, slot)));
    if !resolved {
        log.apply(state, Action::cancel_selection(player));
    }
}

fn deploy(state: &mut MatchState, player: PlayerId, log: &mut ActionLog) {
    let orbit = state.zones.orbit(player).len();
    for index in 0..orbit {
        let Some(card) = state.zones.get(Slot::orbit(player, index)) else {
            continue;
        };
        let carrier_cost = card.card.find(|a| match a {
            Ability::Carrier { energy_cost, .. } => Some(*energy_cost),
            _ => None,
        });
        if let Some(cost) = carrier_cost {
            if !card.tapped && energy::ensure_energy(state, player, cost).is_ok() {
                log.apply(state, Action::DeployTokens(CardPayload::new(player, Zone::Orbit, index)));
            }
        }
    }

    // Highest index first: each landing removes its dropship from orbit.
    for index in (0..state.zones.orbit(player).len()).rev() {
        let landable = state.zones.get(Slot::orbit(player, index)).is_some_and(|card| {
            !card.summoning_sickness && card.has(|a| matches!(a, Ability::Dropship { .. }))
        });
        if landable {
            log.apply(state, Action::LandDropship(CardPayload::new(player, Zone::Orbit, index)));
        }
    }
}

fn attack(state: &mut MatchState, player: PlayerId, log: &mut ActionLog) {
    let enemy = player.opponent();

    let ground: Vec<_> = state.zones.planet(player).iter().map(|c| c.entity_id).collect();
    for entity in ground {
        strike_until_spent(state, log, entity, |state, slot| {
            let targets: Vec<Slot> = targeting::valid_attack_targets(state, slot)
                .into_iter()
                .filter(|t| t.owner == enemy && t.zone == Zone::Planet)
                .collect();
            weakest(state, &targets)
        });
    }

    let ships: Vec<_> = state.zones.orbit(player).iter().map(|c| c.entity_id).collect();
    for entity in ships {
        strike_until_spent(state, log, entity, |state, slot| {
            let targets = targeting::valid_attack_targets(state, slot);
            let in_zone = |zone: Zone| -> Vec<Slot> { targets.iter().copied().filter(|t| t.zone == zone).collect() };
            weakest(state, &in_zone(Zone::Orbit)).or_else(|| weakest(state, &in_zone(Zone::Planet)))
        });
    }
}

/// Attack with one unit while it stays offensive and has a target.
fn strike_until_spent(
    state: &mut MatchState,
    log: &mut ActionLog,
    entity: EntityId,
    choose: impl Fn(&MatchState, Slot) -> Option<Slot>,
) {
    loop {
        let Some(slot) = state.zones.locate(entity) else {
            return;
        };
        if !targeting::is_offensive(state, slot) {
            return;
        }
        let Some(target) = choose(state, slot) else {
            return;
        };
        let action = Action::attack(slot.owner, &[slot], target, AttackMode::Single);
        if !log.apply(state, action) {
            return;
        }
    }
}

/// Lowest current hp among `slots`; ties go to the earliest.
fn weakest(state: &MatchState, slots: &[Slot]) -> Option<Slot> {
    slots
        .iter()
        .filter_map(|slot| state.zones.get(*slot).map(|card| (*slot, current_hp(state, card))))
        .enumerate()
        .min_by_key(|(order, (_, hp))| (*hp, *order))
        .map(|(_, (slot, _))| slot)
}
