//! Zone system for card locations.
//!
//! Each player has a deck, hand and graveyard of card definitions, plus
//! orbit and planet arrays of battlefield instances. A single generator
//! slot is shared by the match and changes hands instead of dying.
//!
//! ## Key Types
//!
//! - `Zone`: Zone tag (`deck`, `hand`, `graveyard`, `orbit`, `planet`, `generator`)
//! - `Slot`: Positional address `(owner, zone, index)` of a battlefield instance
//! - `ZoneManager`: Card storage and movement

pub mod manager;

pub use manager::{GarrisonEntry, GeneratorSlot, PlayerZones, Slot, Zone, ZoneManager};
