//! Research and discovery.
//!
//! Surveys and quantum sensors raise a player's research by one. Research
//! feeds the discovery chance `base + per_research × research`, reported
//! unclamped; only the roll itself clamps to `[0, 1]`.
//!
//! A successful discovery finds the generator first, then cards from the
//! shared discovery deck.

use crate::cards::catalog;
use crate::core::{Discovery, MatchState, PlayerId};

/// Discovery chance for a player.
///
/// ```
/// use orbital_ccg::core::{MatchConfig, MatchState, PlayerId};
/// use orbital_ccg::resources::discovery_chance;
///
/// let mut state = MatchState::new(MatchConfig::default());
/// state.research[PlayerId::P1] = 5;
/// assert!((discovery_chance(&state, PlayerId::P1) - 0.15).abs() < 1e-9);
/// ```
#[must_use]
pub fn discovery_chance(state: &MatchState, player: PlayerId) -> f64 {
    state.config.base_discovery_chance
        + state.config.discovery_chance_per_research * f64::from(state.research[player])
}

/// Add one research point. Returns the new total.
pub fn add_research(state: &mut MatchState, player: PlayerId) -> u32 {
    state.research[player] = state.research[player].saturating_add(1);
    state.research[player]
}

/// Roll for a discovery. Does not apply the outcome.
pub fn roll_discovery(state: &mut MatchState, player: PlayerId) -> Discovery {
    let chance = discovery_chance(state, player);
    if !state.rng.roll(chance) {
        return Discovery::Nothing;
    }
    if state.zones.generator().is_none() {
        return Discovery::Generator;
    }
    match state.discovery_deck.front() {
        Some(card) => Discovery::Card(card.clone()),
        None => Discovery::Nothing,
    }
}

/// Apply a discovery outcome, rolled locally or received from the remote
/// client.
pub fn apply_discovery(state: &mut MatchState, player: PlayerId, discovery: &Discovery) {
    match discovery {
        Discovery::Nothing => {}
        Discovery::Generator => {
            let mut generator = state.spawn(catalog::generator(), player);
            generator.power = state.config.generator_power;
            generator.toughness = state.config.generator_toughness;
            generator.summoning_sickness = false;
            if state.zones.install_generator(generator) {
                tracing::info!(%player, "generator discovered");
            } else {
                tracing::warn!(%player, "generator already in play; discovery ignored");
            }
        }
        Discovery::Card(card) => {
            let position = match state.discovery_deck.front() {
                Some(top) if top.id == card.id => Some(0),
                _ => state.discovery_deck.iter().position(|c| c.id == card.id),
            };
            match position {
                Some(index) => {
                    state.discovery_deck.remove(index);
                }
                None => tracing::warn!(%player, card = %card.name, "discovered card missing from discovery deck"),
            }
            tracing::info!(%player, card = %card.name, "card discovered");
            state.zones.add_to_hand(player, card.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchConfig;

    #[test]
    fn test_chance_is_linear_and_unclamped() {
        let mut state = MatchState::new(MatchConfig::default());

        assert!((discovery_chance(&state, PlayerId::P1) - 0.10).abs() < 1e-9);
        state.research[PlayerId::P1] = 100;
        assert!((discovery_chance(&state, PlayerId::P1) - 1.10).abs() < 1e-9);
        assert!((discovery_chance(&state, PlayerId::P2) - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_roll_finds_generator_first() {
        let mut state = MatchState::new(MatchConfig::default().with_base_discovery_chance(1.0));
        state.discovery_deck = catalog::discovery_cards().into_iter().collect();

        assert_eq!(roll_discovery(&mut state, PlayerId::P1), Discovery::Generator);
        apply_discovery(&mut state, PlayerId::P1, &Discovery::Generator);

        let generator = &state.zones.generator().unwrap().instance;
        assert_eq!(generator.owner, PlayerId::P1);
        assert_eq!((generator.power, generator.toughness), (0, 4));

        let next = roll_discovery(&mut state, PlayerId::P1);
        assert_eq!(next, Discovery::Card(catalog::discovery_cards()[0].clone()));
    }

    #[test]
    fn test_failed_roll() {
        let mut state = MatchState::new(MatchConfig::default().with_base_discovery_chance(0.0));
        assert_eq!(roll_discovery(&mut state, PlayerId::P2), Discovery::Nothing);
    }

    #[test]
    fn test_apply_card_discovery() {
        let mut state = MatchState::new(MatchConfig::default());
        let cards = catalog::discovery_cards();
        state.discovery_deck = cards.iter().cloned().collect();

        apply_discovery(&mut state, PlayerId::P2, &Discovery::Card(cards[2].clone()));

        assert_eq!(state.discovery_deck.len(), cards.len() - 1);
        assert_eq!(state.zones.hand(PlayerId::P2)[0].id, cards[2].id);
    }

    #[test]
    fn test_add_research() {
        let mut state = MatchState::new(MatchConfig::default());
        assert_eq!(add_research(&mut state, PlayerId::P1), 1);
        assert_eq!(add_research(&mut state, PlayerId::P1), 2);
        assert_eq!(state.research[PlayerId::P2], 0);
    }
}
