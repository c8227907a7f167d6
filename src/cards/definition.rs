//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: its type
//! tag, gate cost, printed stats and typed abilities. Definitions travel
//! by value: hands, decks and graveyards hold definitions, and the
//! `play_card` wire message carries the full definition.
//!
//! Instance-specific data (damage taken, tapped, attachments) is stored
//! separately in `CardInstance`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ability::Ability;
use crate::effects::EventEffect;
use crate::error::CatalogError;
use crate::zones::Zone;

/// Unique identifier for a card definition.
///
/// This identifies the kind of card (e.g., "Orbital Frigate"),
/// not a specific instance in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Orbital unit.
    Ship,
    /// Surface unit.
    GroundUnit,
    /// Surface building; never attacks on its own.
    Structure,
    /// One-shot effect card.
    Event,
    /// Attaches to a friendly unit for stat bonuses.
    Equipment,
    /// Discovery card. Never a legal target, except the consciousness card.
    Artifact,
    /// Discovery card that settles on the surface.
    Planet,
    /// Discovery surface unit.
    Natives,
}

impl CardKind {
    /// Parse a deck-list type tag.
    ///
    /// Unit subtypes are folded onto `Ship` / `GroundUnit`.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase();
        let kind = match tag.as_str() {
            "ship" | "orbital" | "fighter" | "cruiser" | "carrier" | "dropship" | "frigate" => {
                Self::Ship
            }
            "ground" | "ground unit" | "infantry" | "vehicle" | "mech" | "unit" => Self::GroundUnit,
            "structure" | "building" => Self::Structure,
            "event" => Self::Event,
            "equipment" => Self::Equipment,
            "artifact" => Self::Artifact,
            "planet" => Self::Planet,
            "natives" | "native" => Self::Natives,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether instances of this kind are combat units.
    #[must_use]
    pub const fn is_unit(self) -> bool {
        matches!(self, Self::Ship | Self::GroundUnit | Self::Natives)
    }

    /// Battlefield zone a deployed card of this kind enters.
    ///
    /// `None` for events and equipment, which never become instances on
    /// their own.
    #[must_use]
    pub const fn home_zone(self) -> Option<Zone> {
        match self {
            Self::Ship => Some(Zone::Orbit),
            Self::GroundUnit | Self::Structure | Self::Artifact | Self::Planet | Self::Natives => {
                Some(Zone::Planet)
            }
            Self::Event | Self::Equipment => None,
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use orbital_ccg::cards::{Ability, CardDefinition, CardId, CardKind};
///
/// let frigate = CardDefinition::new(CardId::new(1), "Frigate", CardKind::Ship)
///     .with_cost(2)
///     .with_stats(2, 3)
///     .with_ability(Ability::OrbitalStrike);
///
/// assert!(frigate.has(|a| matches!(a, Ability::OrbitalStrike)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name.
    pub name: String,

    /// Type tag.
    pub kind: CardKind,

    /// Gate power needed to play the card.
    pub cost: u32,

    /// Printed attack.
    pub attack: i32,

    /// Printed defense (toughness of a deployed instance).
    pub defense: i32,

    /// Typed abilities, compiled from the ability text at authoring time.
    #[serde(default)]
    pub abilities: SmallVec<[Ability; 2]>,

    /// Rules text as printed.
    #[serde(default)]
    pub ability_text: String,

    /// Flavor / art description.
    #[serde(default)]
    pub flavor: String,
}

impl CardDefinition {
    /// Create a new card definition with zero cost and stats.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, kind: CardKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            cost: 0,
            attack: 0,
            defense: 0,
            abilities: SmallVec::new(),
            ability_text: String::new(),
            flavor: String::new(),
        }
    }

    /// Set the gate cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Set printed attack and defense.
    #[must_use]
    pub fn with_stats(mut self, attack: i32, defense: i32) -> Self {
        self.attack = attack;
        self.defense = defense;
        self
    }

    /// Add a typed ability.
    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Set the printed rules text without compiling it.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.ability_text = text.into();
        self
    }

    /// Set the flavor text.
    #[must_use]
    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = flavor.into();
        self
    }

    /// Build a definition from a raw deck-list entry, compiling its rules
    /// text into typed abilities.
    pub fn from_raw(id: CardId, raw: &RawCard) -> Result<Self, CatalogError> {
        let kind = CardKind::parse(&raw.card_type)
            .ok_or_else(|| CatalogError::UnknownCardType(raw.card_type.clone()))?;
        let (attack, defense) = match &raw.stats {
            Some(stats) => parse_stats(stats)
                .ok_or_else(|| CatalogError::MalformedStats(stats.clone()))?,
            None => (raw.attack.unwrap_or(0), raw.defense.unwrap_or(0)),
        };

        Ok(Self {
            id,
            name: raw.name.clone(),
            kind,
            cost: raw.cost,
            attack,
            defense,
            abilities: Ability::compile(kind, &raw.name, &raw.ability),
            ability_text: raw.ability.clone(),
            flavor: raw.description.clone(),
        })
    }

    /// Check whether any ability matches a predicate.
    #[must_use]
    pub fn has(&self, predicate: impl Fn(&Ability) -> bool) -> bool {
        self.abilities.iter().any(predicate)
    }

    /// Find the first ability a projection accepts.
    #[must_use]
    pub fn find<T>(&self, projection: impl FnMut(&Ability) -> Option<T>) -> Option<T> {
        self.abilities.iter().find_map(projection)
    }

    /// The event effect of an event card.
    #[must_use]
    pub fn event_effect(&self) -> Option<EventEffect> {
        self.find(|a| match a {
            Ability::Event(effect) => Some(*effect),
            _ => None,
        })
    }

    /// Whether this is the designated win-condition card.
    #[must_use]
    pub fn is_consciousness(&self) -> bool {
        self.has(|a| matches!(a, Ability::Consciousness))
    }
}

/// A deck-list entry as delivered by the external deck loader.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCard {
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(default)]
    pub cost: u32,
    /// `"attack/defense"`, e.g. `"2/3"`. Takes precedence over the
    /// separate fields.
    #[serde(default)]
    pub stats: Option<String>,
    #[serde(default)]
    pub attack: Option<i32>,
    #[serde(default)]
    pub defense: Option<i32>,
    #[serde(default)]
    pub ability: String,
    #[serde(default)]
    pub description: String,
}

fn parse_stats(stats: &str) -> Option<(i32, i32)> {
    let (attack, defense) = stats.split_once('/')?;
    Some((attack.trim().parse().ok()?, defense.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(CardKind::parse("Ship"), Some(CardKind::Ship));
        assert_eq!(CardKind::parse("infantry"), Some(CardKind::GroundUnit));
        assert_eq!(CardKind::parse(" Event "), Some(CardKind::Event));
        assert_eq!(CardKind::parse("spell"), None);
    }

    #[test]
    fn test_home_zone() {
        assert_eq!(CardKind::Ship.home_zone(), Some(Zone::Orbit));
        assert_eq!(CardKind::Structure.home_zone(), Some(Zone::Planet));
        assert_eq!(CardKind::Event.home_zone(), None);
    }

    #[test]
    fn test_from_raw_compiles_abilities() {
        let raw = RawCard {
            name: "Lance Cruiser".to_string(),
            card_type: "ship".to_string(),
            cost: 3,
            stats: Some("3/4".to_string()),
            ability: "Orbital strike. Reflects 1 damage.".to_string(),
            ..RawCard::default()
        };

        let card = CardDefinition::from_raw(CardId::new(7), &raw).unwrap();

        assert_eq!(card.kind, CardKind::Ship);
        assert_eq!((card.attack, card.defense), (3, 4));
        assert!(card.has(|a| matches!(a, Ability::OrbitalStrike)));
        assert!(card.has(|a| matches!(a, Ability::Reflect { amount: 1 })));
    }

    #[test]
    fn test_from_raw_rejects_bad_input() {
        let raw = RawCard {
            name: "Mystery".to_string(),
            card_type: "spell".to_string(),
            ..RawCard::default()
        };
        assert!(matches!(
            CardDefinition::from_raw(CardId::new(1), &raw),
            Err(CatalogError::UnknownCardType(_))
        ));

        let raw = RawCard {
            name: "Broken".to_string(),
            card_type: "ship".to_string(),
            stats: Some("two/3".to_string()),
            ..RawCard::default()
        };
        assert!(matches!(
            CardDefinition::from_raw(CardId::new(1), &raw),
            Err(CatalogError::MalformedStats(_))
        ));
    }

    #[test]
    fn test_event_effect_lookup() {
        let raw = RawCard {
            name: "Bombardment".to_string(),
            card_type: "event".to_string(),
            ability: "Deal 4 damage to target unit.".to_string(),
            ..RawCard::default()
        };

        let card = CardDefinition::from_raw(CardId::new(2), &raw).unwrap();
        assert_eq!(card.event_effect(), Some(EventEffect::TargetedDamage { amount: 4 }));
    }

    #[test]
    fn test_card_definition_serialization() {
        let card = CardDefinition::new(CardId::new(1), "Test", CardKind::GroundUnit)
            .with_cost(2)
            .with_stats(1, 1)
            .with_ability(Ability::AntiAir);

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: CardDefinition = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }
}
