//! Turn controller and action dispatch.
//!
//! - `turn`: `end_turn` and its per-turn resets
//! - `deploy`: playing cards and battlefield abilities
//! - `engine`: `apply_action`, the single entry point used by local play,
//!   the AI and remote replay

pub mod deploy;
pub mod engine;
pub mod turn;

pub use deploy::{
    choose_gate, deploy_tokens, garrison, land_dropship, move_to_planet, play_card, quantum_sensor,
    select_card, survey, tap_card, PlayOutcome, TapOutcome,
};
pub use engine::apply_action;
pub use turn::{end_turn, TurnChange};
