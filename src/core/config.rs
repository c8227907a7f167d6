//! Match configuration.
//!
//! Every tunable constant of the rules lives here.

use serde::{Deserialize, Serialize};

/// Match configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Seed for deck shuffles and discovery rolls.
    /// Both clients of a remote match must use the same seed.
    pub seed: u64,

    /// Cards dealt to each player before the first turn.
    pub starting_hand_size: usize,

    /// Gates each player starts with (power 1, unused).
    pub starting_gates: usize,

    /// Maximum gates a player may hold.
    pub max_gates: usize,

    /// Energy each player starts with.
    pub starting_energy: i32,

    /// Energy cap before board bonuses (`cap = base + maxEnergyBonus`).
    pub base_energy_cap: i32,

    /// Discovery chance with zero research.
    pub base_discovery_chance: f64,

    /// Discovery chance added per research point.
    pub discovery_chance_per_research: f64,

    /// Generator attack when discovered or after flipping owner.
    pub generator_power: i32,

    /// Generator toughness when discovered or after flipping owner.
    pub generator_toughness: i32,

    /// Flat energy regenerated by the generator for its owner.
    pub generator_energy_bonus: i32,

    /// Delay between scripted AI steps, in milliseconds.
    pub ai_step_delay_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            starting_hand_size: 5,
            starting_gates: 1,
            max_gates: 3,
            starting_energy: 3,
            base_energy_cap: 10,
            base_discovery_chance: 0.10,
            discovery_chance_per_research: 0.01,
            generator_power: 0,
            generator_toughness: 4,
            generator_energy_bonus: 2,
            ai_step_delay_ms: 600,
        }
    }
}

impl MatchConfig {
    /// Set the match seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the starting hand size.
    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    /// Set the number of starting gates.
    #[must_use]
    pub fn with_starting_gates(mut self, gates: usize) -> Self {
        self.starting_gates = gates;
        self
    }

    /// Set the starting energy.
    #[must_use]
    pub fn with_starting_energy(mut self, energy: i32) -> Self {
        self.starting_energy = energy;
        self
    }

    /// Set the base discovery chance.
    #[must_use]
    pub fn with_base_discovery_chance(mut self, chance: f64) -> Self {
        self.base_discovery_chance = chance;
        self
    }

    /// Set the delay between AI steps.
    #[must_use]
    pub fn with_ai_step_delay_ms(mut self, delay: u64) -> Self {
        self.ai_step_delay_ms = delay;
        self
    }
}
