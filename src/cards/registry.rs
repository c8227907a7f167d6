//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition known to a match:
//! the built-in catalog plus any faction deck lists loaded from JSON.
//! Loading compiles each entry's rules text into typed abilities.

use rustc_hash::FxHashMap;

use super::catalog;
use super::definition::{CardDefinition, CardId, RawCard};
use crate::error::CatalogError;

/// First id handed to cards loaded from deck lists.
pub const FIRST_LOADED_ID: u32 = 1000;

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use orbital_ccg::cards::CardRegistry;
///
/// let mut registry = CardRegistry::with_builtin();
/// let deck = registry
///     .load_deck_json(r#"[{"name": "Picket", "type": "ship", "cost": 1, "stats": "1/1"}]"#)
///     .unwrap();
///
/// assert_eq!(deck.len(), 1);
/// assert_eq!(registry.get(deck[0].id).unwrap().name, "Picket");
/// ```
#[derive(Clone, Debug)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
    next_id: u32,
}

impl Default for CardRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cards: FxHashMap::default(),
            next_id: FIRST_LOADED_ID,
        }
    }

    /// Registry pre-filled with the built-in catalog.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for card in catalog::builtin_cards() {
            registry.cards.insert(card.id, card);
        }
        registry
    }

    /// Register a card definition.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), CatalogError> {
        if self.cards.contains_key(&card.id) {
            return Err(CatalogError::DuplicateId(card.id));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Compile and register a raw entry under a fresh id.
    pub fn register_raw(&mut self, raw: &RawCard) -> Result<CardDefinition, CatalogError> {
        let card = CardDefinition::from_raw(CardId::new(self.next_id), raw)?;
        self.next_id += 1;
        self.register(card.clone())?;
        Ok(card)
    }

    /// Load a faction deck list (a JSON array of raw entries).
    ///
    /// Duplicate names in the list share one definition, so two copies of
    /// a card compare equal by id.
    pub fn load_deck_json(&mut self, json: &str) -> Result<Vec<CardDefinition>, CatalogError> {
        let raws: Vec<RawCard> = serde_json::from_str(json)?;
        let mut by_name: FxHashMap<String, CardDefinition> = FxHashMap::default();
        let mut deck = Vec::with_capacity(raws.len());

        for raw in &raws {
            let card = match by_name.get(&raw.name) {
                Some(card) => card.clone(),
                None => {
                    let card = self.register_raw(raw)?;
                    by_name.insert(raw.name.clone(), card.clone());
                    card
                }
            };
            deck.push(card);
        }

        tracing::debug!(cards = deck.len(), unique = by_name.len(), "loaded deck list");
        Ok(deck)
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Look up a card by exact name.
    pub fn by_name(&self, name: &str) -> Result<&CardDefinition, CatalogError> {
        self.cards
            .values()
            .find(|c| c.name == name)
            .ok_or_else(|| CatalogError::UnknownCard(name.to_string()))
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &CardDefinition>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }
}
