//! Match state: the single value every subsystem operates on.
//!
//! ## MatchState
//!
//! Complete state of one match as seen by one client:
//! - Turn counter, active player, winner
//! - Gates, research and energy per player
//! - Zones (decks, hands, graveyards, orbit, planet, generator)
//! - Shared discovery deck
//! - The pending selection mode
//! - RNG and action history
//!
//! Subsystems are stateless functions over `&mut MatchState`.
//!
//! ## PublicState
//!
//! The shared, hidden-information-free view of a match. Both clients of a
//! remote match derive the same `PublicState` after applying the same
//! actions; its hash is carried on every replicated message.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::{Action, ActionRecord};
use super::config::MatchConfig;
use super::entity::EntityId;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{catalog, CardDefinition, CardId, CardInstance};
use crate::effects::EventEffect;
use crate::error::{ActionError, ActionResult};
use crate::resources::Gate;
use crate::zones::ZoneManager;

/// Top-level phase of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    P1Active,
    P2Active,
    GameOver,
}

/// The selection sub-mode a player is in. At most one is active.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PendingMode {
    #[default]
    None,
    /// A hand card was picked; waiting for a gate to pay with.
    SelectingGate { player: PlayerId, hand_index: usize },
    /// Equipment was paid for; waiting for a friendly unit to carry it.
    SelectingEquipmentTarget {
        player: PlayerId,
        card: CardDefinition,
    },
    /// A targeted event was paid for; waiting for its target.
    SelectingEventTarget {
        player: PlayerId,
        card: CardDefinition,
        effect: EventEffect,
    },
    /// Attackers are being gathered into a stack.
    CombatSelection {
        player: PlayerId,
        attackers: SmallVec<[EntityId; 4]>,
    },
}

impl PendingMode {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The player the pending selection belongs to.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Self::None => None,
            Self::SelectingGate { player, .. }
            | Self::SelectingEquipmentTarget { player, .. }
            | Self::SelectingEventTarget { player, .. }
            | Self::CombatSelection { player, .. } => Some(*player),
        }
    }

    /// Card waiting for a target, if any.
    #[must_use]
    pub fn target_card(&self) -> Option<&CardDefinition> {
        match self {
            Self::SelectingEquipmentTarget { card, .. }
            | Self::SelectingEventTarget { card, .. } => Some(card),
            _ => None,
        }
    }
}

/// Complete match state for one client.
#[derive(Clone, Debug)]
pub struct MatchState {
    pub config: MatchConfig,

    /// Turn number (starts at 1).
    pub turn: u32,

    pub active_player: PlayerId,

    /// Set when the consciousness win fires. Terminal.
    pub winner: Option<PlayerId>,

    /// The active player already added or upgraded a gate this turn.
    pub gate_action_used: bool,

    pub gates: PlayerMap<SmallVec<[Gate; 3]>>,

    /// Monotonic, unbounded.
    pub research: PlayerMap<u32>,

    pub energy: PlayerMap<i32>,

    pub zones: ZoneManager,

    /// Shared pile surveys draw from. The front is the top.
    pub discovery_deck: Vector<CardDefinition>,

    pub pending: PendingMode,

    pub rng: GameRng,

    /// Every applied action, in order.
    pub history: Vector<ActionRecord>,

    next_entity_id: u32,
}

impl MatchState {
    /// Create an empty match: no decks, no cards, starting resources.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        let starting_gates: SmallVec<[Gate; 3]> =
            (0..config.starting_gates).map(|_| Gate::new()).collect();
        Self {
            turn: 1,
            active_player: PlayerId::P1,
            winner: None,
            gate_action_used: false,
            gates: PlayerMap::with_value(starting_gates),
            research: PlayerMap::with_value(0),
            energy: PlayerMap::with_value(config.starting_energy),
            zones: ZoneManager::new(),
            discovery_deck: Vector::new(),
            pending: PendingMode::None,
            rng: GameRng::new(config.seed),
            history: Vector::new(),
            next_entity_id: 1,
            config,
        }
    }

    /// Current top-level phase.
    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        match (self.winner, self.active_player.is_player1()) {
            (Some(_), _) => MatchPhase::GameOver,
            (None, true) => MatchPhase::P1Active,
            (None, false) => MatchPhase::P2Active,
        }
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Allocate a fresh entity id.
    pub fn alloc_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Create an instance of `card` owned by `owner` with a fresh id.
    pub fn spawn(&mut self, card: CardDefinition, owner: PlayerId) -> CardInstance {
        let id = self.alloc_entity();
        CardInstance::new(id, card, owner)
    }

    /// Reject actions after game over or outside the player's turn.
    pub fn ensure_active(&self, player: PlayerId) -> ActionResult<()> {
        if self.is_game_over() {
            return Err(ActionError::GameOver);
        }
        if player != self.active_player {
            return Err(ActionError::NotYourTurn(player));
        }
        Ok(())
    }

    /// Append an applied action to the history.
    pub fn record(&mut self, player: PlayerId, action: Action) {
        let sequence = self.history.len() as u32;
        self.history.push_back(ActionRecord {
            player,
            action,
            turn: self.turn,
            sequence,
        });
    }

    /// Enter a selection mode, abandoning whatever was pending.
    pub fn enter_pending(&mut self, mode: PendingMode) {
        self.cancel_pending();
        self.pending = mode;
    }

    /// Abandon the pending selection.
    ///
    /// Paid-for equipment and event cards go to their owner's graveyard;
    /// stacked attackers are un-marked. Returns `false` if nothing was
    /// pending.
    pub fn cancel_pending(&mut self) -> bool {
        match std::mem::take(&mut self.pending) {
            PendingMode::None => false,
            PendingMode::SelectingGate { .. } => true,
            PendingMode::SelectingEquipmentTarget { player, card }
            | PendingMode::SelectingEventTarget { player, card, .. } => {
                tracing::debug!(%player, card = %card.name, "selection cancelled");
                self.zones.to_graveyard(player, card);
                true
            }
            PendingMode::CombatSelection { attackers, .. } => {
                for id in attackers {
                    if let Some(unit) = self.zones.instance_mut(id) {
                        unit.selected = false;
                    }
                }
                true
            }
        }
    }

    /// Attackers in the pending combat stack, if one is being built.
    #[must_use]
    pub fn combat_attackers(&self) -> &[EntityId] {
        match &self.pending {
            PendingMode::CombatSelection { attackers, .. } => attackers.as_slice(),
            _ => &[],
        }
    }

    /// Snapshot of the shared, public part of the state.
    #[must_use]
    pub fn public_state(&self) -> PublicState {
        let card = |c: &CardInstance| PublicCard {
            card: c.card.id,
            owner: c.owner,
            power: c.power,
            toughness: c.toughness,
            damage: c.damage,
            tapped: c.tapped,
            summoning_sickness: c.summoning_sickness,
            actions_used: c.actions_used,
            garrisoned: c.garrisoned,
            attachments: c.attachments.iter().map(|a| a.card.id).collect(),
        };

        PublicState {
            turn: self.turn,
            active_player: self.active_player,
            winner: self.winner,
            gate_action_used: self.gate_action_used,
            gates: self.gates.map(|_, g| g.iter().map(|g| (g.power, g.used)).collect()),
            research: self.research.clone(),
            energy: self.energy.clone(),
            hand_sizes: self.zones_map(|z, p| z.hand(p).len()),
            deck_sizes: self.zones_map(|z, p| z.deck(p).len()),
            graveyards: self.zones_map(|z, p| z.graveyard(p).iter().map(|c| c.id).collect()),
            orbit: self.zones_map(|z, p| z.orbit(p).iter().map(card).collect()),
            planet: self.zones_map(|z, p| z.planet(p).iter().map(card).collect()),
            generator: self.zones.generator().map(|g| (card(&g.instance), g.garrison.len())),
            discovery_remaining: self.discovery_deck.len(),
            pending_target: self.pending.target_card().map(|c| c.id),
        }
    }

    fn zones_map<T>(&self, f: impl Fn(&ZoneManager, PlayerId) -> T) -> PlayerMap<T> {
        PlayerMap::new(|p| f(&self.zones, p))
    }
}

/// A battlefield card as both clients see it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicCard {
    pub card: CardId,
    pub owner: PlayerId,
    pub power: i32,
    pub toughness: i32,
    pub damage: i32,
    pub tapped: bool,
    pub summoning_sickness: bool,
    pub actions_used: u32,
    pub garrisoned: bool,
    pub attachments: Vec<CardId>,
}

/// Public match state - observable by both players.
///
/// Hand and deck contents are reduced to sizes; entity ids and the local
/// combat-stack selection are left out because they are not shared.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicState {
    pub turn: u32,
    pub active_player: PlayerId,
    pub winner: Option<PlayerId>,
    pub gate_action_used: bool,
    /// `(power, used)` per gate.
    pub gates: PlayerMap<Vec<(u32, bool)>>,
    pub research: PlayerMap<u32>,
    pub energy: PlayerMap<i32>,
    pub hand_sizes: PlayerMap<usize>,
    pub deck_sizes: PlayerMap<usize>,
    pub graveyards: PlayerMap<Vec<CardId>>,
    pub orbit: PlayerMap<Vec<PublicCard>>,
    pub planet: PlayerMap<Vec<PublicCard>>,
    /// The generator and its garrison size.
    pub generator: Option<(PublicCard, usize)>,
    pub discovery_remaining: usize,
    pub pending_target: Option<CardId>,
}

/// Builder for a ready-to-play match.
///
/// ## Example
///
/// ```
/// use orbital_ccg::cards::catalog;
/// use orbital_ccg::core::{MatchBuilder, MatchConfig, PlayerId};
///
/// let state = MatchBuilder::new(MatchConfig::default().with_seed(7))
///     .with_deck(PlayerId::P1, catalog::starter_deck())
///     .with_deck(PlayerId::P2, catalog::starter_deck())
///     .build();
///
/// assert_eq!(state.zones.hand(PlayerId::P1).len(), 5);
/// assert_eq!(state.turn, 1);
/// ```
#[derive(Clone, Debug)]
pub struct MatchBuilder {
    config: MatchConfig,
    decks: PlayerMap<Vec<CardDefinition>>,
    discovery: Vec<CardDefinition>,
    shuffle: bool,
}

impl MatchBuilder {
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            decks: PlayerMap::with_default(),
            discovery: catalog::discovery_cards(),
            shuffle: true,
        }
    }

    /// Set a player's faction deck.
    #[must_use]
    pub fn with_deck(mut self, player: PlayerId, deck: Vec<CardDefinition>) -> Self {
        self.decks[player] = deck;
        self
    }

    /// Replace the discovery pile.
    #[must_use]
    pub fn with_discovery_cards(mut self, cards: Vec<CardDefinition>) -> Self {
        self.discovery = cards;
        self
    }

    /// Keep decks in the given order (first card on top).
    #[must_use]
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }

    /// Shuffle, deal opening hands and return the match.
    ///
    /// Both clients of a remote match build with the same config and deck
    /// lists, so they shuffle identically.
    #[must_use]
    pub fn build(self) -> MatchState {
        let mut state = MatchState::new(self.config);

        for (player, deck) in self.decks.iter() {
            let deck = if self.shuffle {
                state.rng.shuffled(deck.iter().cloned())
            } else {
                deck.clone()
            };
            state.zones.set_deck(player, deck);
        }

        let discovery = if self.shuffle {
            state.rng.shuffled(self.discovery)
        } else {
            self.discovery
        };
        state.discovery_deck = discovery.into_iter().collect();

        for player in PlayerId::all() {
            state
                .zones
                .draw_many(player, state.config.starting_hand_size);
        }

        tracing::info!(seed = state.config.seed, "match created");
        state
    }
}
