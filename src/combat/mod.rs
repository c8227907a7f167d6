//! Combat engine.
//!
//! - `stats`: effective attack/toughness with equipment and auras
//! - `targeting`: who may attack and what they may hit
//! - `stack`: building the attacker stack
//! - `resolver`: stack and single combat
//! - `sweep`: destruction and generator flips after damage

pub mod resolver;
pub mod stack;
pub mod stats;
pub mod sweep;
pub mod targeting;

pub use resolver::{execute_stack, single_combat, CombatReport};
pub use stack::{cancel_stack, set_stack, stack_slots, stack_targets, toggle_attacker};
pub use stats::{current_hp, effective_attack, effective_toughness};
pub use sweep::{destruction_sweep, SweepReport};
pub use targeting::{check_attacker, is_targetable, is_valid_target, valid_attack_targets};
