//! # orbital-ccg
//!
//! Rules engine for a two-player card battle fought over two battlefields,
//! orbit and planet, with action replication for remote play.
//!
//! ## Design Principles
//!
//! 1. **Explicit State**: One `MatchState` value holds the whole match.
//!    Every subsystem is a set of free functions over it.
//!
//! 2. **Typed Abilities**: Card rules text is compiled into `Ability` and
//!    `EventEffect` tags when a definition is built, never re-parsed.
//!
//! 3. **Replicate Actions, Not State**: Clients exchange the actions they
//!    apply, addressed by zone and index, plus a snapshot hash.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Zones are `im` vectors, so cloning a
//!   match is cheap. `apply_action` snapshots before each action and
//!   restores on rejection.
//!
//! - **Deterministic Randomness**: Shuffles and discovery rolls come from
//!   a seeded ChaCha stream; a survey's outcome is sent, not re-rolled.
//!
//! ## Modules
//!
//! - `core`: Entity IDs, players, state, actions, RNG, configuration
//! - `zones`: Decks, hands, graveyards, orbit, planet and the generator
//! - `cards`: Card definitions, abilities, instances and the catalog
//! - `resources`: Gates, research and energy
//! - `combat`: Targeting, attacker stacks, damage and destruction
//! - `effects`: Event and equipment cards
//! - `rules`: Turn controller and the action dispatcher
//! - `ai`: Scripted opponent
//! - `session`: Client facade, wire protocol and transport seam

pub mod ai;
pub mod cards;
pub mod combat;
pub mod core;
pub mod effects;
pub mod error;
pub mod resources;
pub mod rules;
pub mod session;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, AttackMode, Discovery, EntityId, GameRng, MatchBuilder, MatchConfig,
    MatchPhase, MatchState, PendingMode, PlayerId, PlayerMap, PublicState,
};

pub use crate::zones::{Slot, Zone, ZoneManager};

pub use crate::cards::{Ability, CardDefinition, CardId, CardInstance, CardKind, CardRegistry};

pub use crate::resources::Gate;

pub use crate::combat::{CombatReport, SweepReport};

pub use crate::effects::{EventEffect, EventOutcome};

pub use crate::rules::{apply_action, end_turn, PlayOutcome, TapOutcome, TurnChange};

pub use crate::ai::{AiDriver, AiStep};

pub use crate::session::{Divergence, GameClient, QueueTransport, RemoteOutcome, Transport};

pub use crate::error::{ActionError, ActionResult, CatalogError, WireError};
