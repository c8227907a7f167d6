//! Action representation.
//!
//! Every state-mutating intent is an `Action`. The same value is applied
//! locally, recorded in the match history, and replicated to the remote
//! client, so the payloads use the wire field names (`cardIndex`,
//! `isPlayer1`, ...).
//!
//! Cards are addressed by zone and positional index, never by entity id:
//! the two clients do not share object identity.
//!
//! Outcomes that the acting client rolled (survey discoveries) travel in
//! the payload. A receiver applies the outcome it is given.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::cards::CardDefinition;
use crate::zones::{Slot, Zone};

/// `{zone, idx}` address used by attack and target payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireSlot {
    pub zone: Zone,
    pub idx: usize,
}

impl WireSlot {
    #[must_use]
    pub const fn new(zone: Zone, idx: usize) -> Self {
        Self { zone, idx }
    }

    /// Re-attach an owner to get a local slot.
    #[must_use]
    pub const fn at(self, owner: PlayerId) -> Slot {
        Slot::new(owner, self.zone, self.idx)
    }
}

impl From<Slot> for WireSlot {
    fn from(slot: Slot) -> Self {
        Self::new(slot.zone, slot.index)
    }
}

/// How an attack resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackMode {
    /// Every attacker in the stack hits together.
    #[default]
    Stack,
    /// One attacker, with counter-attack and double-attack rules.
    Single,
}

/// Resolved result of a survey's discovery roll.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discovery {
    /// Roll failed.
    Nothing,
    /// The generator was found and enters play under the surveyor.
    Generator,
    /// A discovery card was found and goes to the surveyor's hand.
    Card(CardDefinition),
}

/// Payload naming only the acting seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatPayload {
    pub is_player1: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncrementGatePayload {
    pub gate_index: usize,
    pub is_player1: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCardPayload {
    pub card_index: usize,
    pub is_player1: bool,
    pub gate_index: usize,
    /// Full definition, since the receiver's hand ordering may differ.
    pub card_data: CardDefinition,
}

/// Payload for abilities activated from a battlefield card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPayload {
    pub card_index: usize,
    /// Zone of the card. Each action has its own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<Zone>,
    pub is_player1: bool,
    /// Survey outcome rolled by the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery: Option<Discovery>,
}

impl CardPayload {
    #[must_use]
    pub fn new(player: PlayerId, zone: Zone, card_index: usize) -> Self {
        Self {
            card_index,
            zone: Some(zone),
            is_player1: player.is_player1(),
            discovery: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackPayload {
    pub attacker_indices: Vec<WireSlot>,
    pub target_index: usize,
    pub attacker_zone: Zone,
    pub target_zone: Zone,
    pub is_player1: bool,
    #[serde(default)]
    pub mode: AttackMode,
}

/// Resolves a pending equipment or event target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPayload {
    pub target: WireSlot,
    pub target_is_player1: bool,
    pub is_player1: bool,
}

/// A complete game action.
///
/// ## Example
///
/// ```
/// use orbital_ccg::core::{Action, IncrementGatePayload};
///
/// let upgrade = Action::IncrementGate(IncrementGatePayload { gate_index: 0, is_player1: true });
/// assert_eq!(upgrade.wire_type(), "increment_gate");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Action {
    EndTurn,
    AddGate(SeatPayload),
    IncrementGate(IncrementGatePayload),
    PlayCard(PlayCardPayload),
    LandDropship(CardPayload),
    Attack(AttackPayload),
    TapCard(CardPayload),
    Survey(CardPayload),
    QuantumSensor(CardPayload),
    Garrison(CardPayload),
    DeployTokens(CardPayload),
    MoveToPlanet(CardPayload),
    ResolveTarget(TargetPayload),
    CancelSelection(SeatPayload),
}

impl Action {
    /// Every wire type string, in declaration order.
    pub const WIRE_TYPES: [&'static str; 14] = [
        "end_turn",
        "add_gate",
        "increment_gate",
        "play_card",
        "land_dropship",
        "attack",
        "tap_card",
        "survey",
        "quantum_sensor",
        "garrison",
        "deploy_tokens",
        "move_to_planet",
        "resolve_target",
        "cancel_selection",
    ];

    /// The wire `actionType` string.
    #[must_use]
    pub fn wire_type(&self) -> &'static str {
        let index = match self {
            Self::EndTurn => 0,
            Self::AddGate(_) => 1,
            Self::IncrementGate(_) => 2,
            Self::PlayCard(_) => 3,
            Self::LandDropship(_) => 4,
            Self::Attack(_) => 5,
            Self::TapCard(_) => 6,
            Self::Survey(_) => 7,
            Self::QuantumSensor(_) => 8,
            Self::Garrison(_) => 9,
            Self::DeployTokens(_) => 10,
            Self::MoveToPlanet(_) => 11,
            Self::ResolveTarget(_) => 12,
            Self::CancelSelection(_) => 13,
        };
        Self::WIRE_TYPES[index]
    }

    #[must_use]
    pub fn add_gate(player: PlayerId) -> Self {
        Self::AddGate(SeatPayload {
            is_player1: player.is_player1(),
        })
    }

    #[must_use]
    pub fn increment_gate(player: PlayerId, gate_index: usize) -> Self {
        Self::IncrementGate(IncrementGatePayload {
            gate_index,
            is_player1: player.is_player1(),
        })
    }

    #[must_use]
    pub fn play_card(player: PlayerId, card_index: usize, gate_index: usize, card: CardDefinition) -> Self {
        Self::PlayCard(PlayCardPayload {
            card_index,
            is_player1: player.is_player1(),
            gate_index,
            card_data: card,
        })
    }

    /// Attack `target` with the given attackers. The first attacker's zone
    /// is reported as `attackerZone`.
    #[must_use]
    pub fn attack(player: PlayerId, attackers: &[Slot], target: Slot, mode: AttackMode) -> Self {
        Self::Attack(AttackPayload {
            attacker_indices: attackers.iter().map(|s| WireSlot::from(*s)).collect(),
            target_index: target.index,
            attacker_zone: attackers.first().map_or(Zone::Orbit, |s| s.zone),
            target_zone: target.zone,
            is_player1: player.is_player1(),
            mode,
        })
    }

    #[must_use]
    pub fn resolve_target(player: PlayerId, target: Slot) -> Self {
        Self::ResolveTarget(TargetPayload {
            target: target.into(),
            target_is_player1: target.owner.is_player1(),
            is_player1: player.is_player1(),
        })
    }

    #[must_use]
    pub fn cancel_selection(player: PlayerId) -> Self {
        Self::CancelSelection(SeatPayload {
            is_player1: player.is_player1(),
        })
    }

    /// The seat named in the payload. `EndTurn` names none; it always acts
    /// for the active player.
    #[must_use]
    pub fn seat(&self) -> Option<PlayerId> {
        let is_player1 = match self {
            Self::EndTurn => return None,
            Self::AddGate(p) | Self::CancelSelection(p) => p.is_player1,
            Self::IncrementGate(p) => p.is_player1,
            Self::PlayCard(p) => p.is_player1,
            Self::Attack(p) => p.is_player1,
            Self::ResolveTarget(p) => p.is_player1,
            Self::LandDropship(p)
            | Self::TapCard(p)
            | Self::Survey(p)
            | Self::QuantumSensor(p)
            | Self::Garrison(p)
            | Self::DeployTokens(p)
            | Self::MoveToPlanet(p) => p.is_player1,
        };
        Some(PlayerId::from_is_player1(is_player1))
    }
}

/// An applied action, as kept in the match history.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Player who took the action.
    pub player: PlayerId,
    /// The action as applied, with any rolled outcome filled in.
    pub action: Action,
    /// Turn number when the action was taken.
    pub turn: u32,
    /// Sequence number within the match (0-based).
    pub sequence: u32,
}
