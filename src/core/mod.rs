//! Core engine types: entities, players, state, actions, RNG, configuration.
//!
//! Everything here is shared by the rules subsystems. `MatchState` is the
//! one value they all operate on; none of them hold state of their own.

pub mod action;
pub mod config;
pub mod entity;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{
    Action, ActionRecord, AttackMode, AttackPayload, CardPayload, Discovery,
    IncrementGatePayload, PlayCardPayload, SeatPayload, TargetPayload, WireSlot,
};
pub use config::MatchConfig;
pub use entity::EntityId;
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::GameRng;
pub use state::{MatchBuilder, MatchPhase, MatchState, PendingMode, PublicCard, PublicState};
