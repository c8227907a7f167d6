//! Resource subsystem: gates, research and energy.
//!
//! - Gates pay for cards; one gate-economy action (add or upgrade) per turn
//! - Research raises the discovery chance
//! - Energy pays for activated abilities and regenerates at end of turn

pub mod energy;
pub mod gates;
pub mod research;

pub use energy::{energy_cap, energy_income};
pub use gates::{add_gate, find_available_gate, increment_gate, Gate};
pub use research::{discovery_chance, roll_discovery};
