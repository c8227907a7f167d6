//! Event engine.
//!
//! - `EventEffect`: the typed effect an event card compiles to
//! - `play_event` / `play_equipment`: first phase, on play
//! - `resolve_target`: second phase, for effects that need a target
//!
//! Classification happens once, when the card definition is built; at
//! play time the engine only dispatches on the tag.

mod effect;
mod resolver;

pub use effect::EventEffect;
pub use resolver::{equipment_targets, event_targets, play_equipment, play_event, resolve_target, EventOutcome};
