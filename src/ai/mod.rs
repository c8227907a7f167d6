//! Scripted AI opponent.
//!
//! The AI plays through `rules::apply_action` like any other seat, so its
//! actions are validated, recorded and replayable.

pub mod scripted;

pub use scripted::{AiDriver, AiStep};
