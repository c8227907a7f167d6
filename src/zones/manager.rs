//! Zone manager for card locations and movement.
//!
//! The `ZoneManager` owns every card in the match:
//! - Per-player deck, hand and graveyard (card definitions)
//! - Per-player orbit and planet (battlefield instances)
//! - The shared generator slot, empty until discovered
//!
//! Zone arrays are positional. Remote clients address cards by
//! `(zone, index)`, so every mutation here keeps a deterministic order:
//! deploys append, removals shift later cards down by one.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardDefinition, CardId, CardInstance};
use crate::core::entity::EntityId;
use crate::core::player::{PlayerId, PlayerMap};

/// A card zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Deck,
    Hand,
    Graveyard,
    Orbit,
    Planet,
    Generator,
}

impl Zone {
    /// Whether cards in this zone are battlefield instances.
    #[must_use]
    pub const fn is_battlefield(self) -> bool {
        matches!(self, Self::Orbit | Self::Planet | Self::Generator)
    }
}

/// Positional address of a battlefield instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub owner: PlayerId,
    pub zone: Zone,
    pub index: usize,
}

impl Slot {
    #[must_use]
    pub const fn new(owner: PlayerId, zone: Zone, index: usize) -> Self {
        Self { owner, zone, index }
    }

    #[must_use]
    pub const fn orbit(owner: PlayerId, index: usize) -> Self {
        Self::new(owner, Zone::Orbit, index)
    }

    #[must_use]
    pub const fn planet(owner: PlayerId, index: usize) -> Self {
        Self::new(owner, Zone::Planet, index)
    }

    /// The generator slot, as seen by its current owner.
    #[must_use]
    pub const fn generator(owner: PlayerId) -> Self {
        Self::new(owner, Zone::Generator, 0)
    }
}

/// One player's zones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerZones {
    /// Draw pile. The front is the top.
    pub deck: Vector<CardDefinition>,
    pub hand: Vector<CardDefinition>,
    /// Append-only.
    pub graveyard: Vector<CardDefinition>,
    pub orbit: Vector<CardInstance>,
    pub planet: Vector<CardInstance>,
}

/// A unit committed to the generator, with the stats it contributed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GarrisonEntry {
    pub entity_id: EntityId,
    pub attack: i32,
    pub defense: i32,
}

/// The shared generator and its garrison.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratorSlot {
    pub instance: CardInstance,
    pub garrison: SmallVec<[GarrisonEntry; 4]>,
}

/// Manages card locations across zones.
///
/// ## Usage
///
/// ```
/// use orbital_ccg::cards::{CardDefinition, CardId, CardInstance, CardKind};
/// use orbital_ccg::core::{EntityId, PlayerId};
/// use orbital_ccg::zones::{Slot, Zone, ZoneManager};
///
/// let mut zones = ZoneManager::new();
/// let frigate = CardDefinition::new(CardId::new(1), "Frigate", CardKind::Ship).with_stats(2, 2);
///
/// let slot = zones.deploy(Zone::Orbit, CardInstance::new(EntityId(1), frigate, PlayerId::P1));
/// assert_eq!(slot, Some(Slot::orbit(PlayerId::P1, 0)));
/// assert_eq!(zones.get(Slot::orbit(PlayerId::P1, 0)).map(|c| c.power), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneManager {
    players: PlayerMap<PlayerZones>,
    generator: Option<GeneratorSlot>,
}

impl Default for ZoneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneManager {
    /// Create empty zones for both players.
    #[must_use]
    pub fn new() -> Self {
        Self {
            players: PlayerMap::with_default(),
            generator: None,
        }
    }

    /// All zones of one player.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerZones {
        &self.players[player]
    }

    /// Mutable zones of one player.
    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerZones {
        &mut self.players[player]
    }

    #[must_use]
    pub fn deck(&self, player: PlayerId) -> &Vector<CardDefinition> {
        &self.players[player].deck
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Vector<CardDefinition> {
        &self.players[player].hand
    }

    #[must_use]
    pub fn graveyard(&self, player: PlayerId) -> &Vector<CardDefinition> {
        &self.players[player].graveyard
    }

    #[must_use]
    pub fn orbit(&self, player: PlayerId) -> &Vector<CardInstance> {
        &self.players[player].orbit
    }

    #[must_use]
    pub fn planet(&self, player: PlayerId) -> &Vector<CardInstance> {
        &self.players[player].planet
    }

    /// Replace a player's deck. The first card is the top.
    pub fn set_deck(&mut self, player: PlayerId, cards: impl IntoIterator<Item = CardDefinition>) {
        self.players[player].deck = cards.into_iter().collect();
    }

    // === Hand / deck / graveyard ===

    /// Draw the top card of a deck into hand.
    ///
    /// Returns the drawn card, or `None` if the deck is empty.
    pub fn draw(&mut self, player: PlayerId) -> Option<CardDefinition> {
        let zones = &mut self.players[player];
        let card = zones.deck.pop_front()?;
        zones.hand.push_back(card.clone());
        Some(card)
    }

    /// Draw up to `count` cards. Returns how many were drawn.
    pub fn draw_many(&mut self, player: PlayerId, count: usize) -> usize {
        (0..count).take_while(|_| self.draw(player).is_some()).count()
    }

    /// Remove the card at a hand position.
    pub fn take_from_hand(&mut self, player: PlayerId, index: usize) -> Option<CardDefinition> {
        let hand = &mut self.players[player].hand;
        (index < hand.len()).then(|| hand.remove(index))
    }

    /// Position of the first hand card with this definition id.
    #[must_use]
    pub fn hand_position(&self, player: PlayerId, id: CardId) -> Option<usize> {
        self.players[player].hand.iter().position(|c| c.id == id)
    }

    pub fn add_to_hand(&mut self, player: PlayerId, card: CardDefinition) {
        self.players[player].hand.push_back(card);
    }

    pub fn to_graveyard(&mut self, player: PlayerId, card: CardDefinition) {
        self.players[player].graveyard.push_back(card);
    }

    /// Move up to `count` cards from the top of the deck to the graveyard.
    pub fn mill(&mut self, player: PlayerId, count: usize) -> usize {
        let zones = &mut self.players[player];
        let mut milled = 0;
        while milled < count {
            let Some(card) = zones.deck.pop_front() else {
                break;
            };
            zones.graveyard.push_back(card);
            milled += 1;
        }
        milled
    }

    /// Discard up to `count` cards from the end of the hand.
    pub fn discard_from_hand(&mut self, player: PlayerId, count: usize) -> usize {
        let zones = &mut self.players[player];
        let mut discarded = 0;
        while discarded < count {
            let Some(card) = zones.hand.pop_back() else {
                break;
            };
            zones.graveyard.push_back(card);
            discarded += 1;
        }
        discarded
    }

    // === Battlefield ===

    /// Orbit or planet array for a player.
    #[must_use]
    pub fn field(&self, player: PlayerId, zone: Zone) -> Option<&Vector<CardInstance>> {
        match zone {
            Zone::Orbit => Some(&self.players[player].orbit),
            Zone::Planet => Some(&self.players[player].planet),
            _ => None,
        }
    }

    fn field_mut(&mut self, player: PlayerId, zone: Zone) -> Option<&mut Vector<CardInstance>> {
        match zone {
            Zone::Orbit => Some(&mut self.players[player].orbit),
            Zone::Planet => Some(&mut self.players[player].planet),
            _ => None,
        }
    }

    /// Append an instance to its owner's orbit or planet.
    ///
    /// Returns the new slot, or `None` for a non-field zone.
    pub fn deploy(&mut self, zone: Zone, instance: CardInstance) -> Option<Slot> {
        let owner = instance.owner;
        let field = self.field_mut(owner, zone)?;
        field.push_back(instance);
        Some(Slot::new(owner, zone, field.len() - 1))
    }

    /// Instance at a slot.
    ///
    /// The generator slot resolves regardless of the slot's owner; check
    /// `instance.owner` when ownership matters.
    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<&CardInstance> {
        match slot.zone {
            Zone::Generator => (slot.index == 0)
                .then_some(self.generator.as_ref())
                .flatten()
                .map(|g| &g.instance),
            zone => self.field(slot.owner, zone)?.get(slot.index),
        }
    }

    /// Mutable instance at a slot.
    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut CardInstance> {
        match slot.zone {
            Zone::Generator => {
                if slot.index != 0 {
                    return None;
                }
                self.generator.as_mut().map(|g| &mut g.instance)
            }
            zone => self.field_mut(slot.owner, zone)?.get_mut(slot.index),
        }
    }

    /// Remove an orbit or planet instance. The generator cannot be removed.
    pub fn remove(&mut self, slot: Slot) -> Option<CardInstance> {
        let field = self.field_mut(slot.owner, slot.zone)?;
        (slot.index < field.len()).then(|| field.remove(slot.index))
    }

    /// Current slot of an entity.
    #[must_use]
    pub fn locate(&self, entity: EntityId) -> Option<Slot> {
        if let Some(generator) = &self.generator {
            if generator.instance.entity_id == entity {
                return Some(Slot::generator(generator.instance.owner));
            }
        }
        PlayerId::all().find_map(|player| {
            [Zone::Orbit, Zone::Planet].into_iter().find_map(|zone| {
                self.field(player, zone)?
                    .iter()
                    .position(|c| c.entity_id == entity)
                    .map(|index| Slot::new(player, zone, index))
            })
        })
    }

    #[must_use]
    pub fn instance(&self, entity: EntityId) -> Option<&CardInstance> {
        self.locate(entity).and_then(|slot| self.get(slot))
    }

    pub fn instance_mut(&mut self, entity: EntityId) -> Option<&mut CardInstance> {
        let slot = self.locate(entity)?;
        self.get_mut(slot)
    }

    /// Orbit then planet instances of a player (the generator excluded).
    pub fn battlefield(&self, player: PlayerId) -> impl Iterator<Item = &CardInstance> {
        let zones = &self.players[player];
        zones.orbit.iter().chain(zones.planet.iter())
    }

    /// Every occupied battlefield slot, both players, generator last.
    #[must_use]
    pub fn all_slots(&self) -> Vec<Slot> {
        let mut slots: Vec<Slot> = PlayerId::all()
            .flat_map(|player| {
                let zones = &self.players[player];
                (0..zones.orbit.len())
                    .map(move |i| Slot::orbit(player, i))
                    .chain((0..zones.planet.len()).map(move |i| Slot::planet(player, i)))
            })
            .collect();
        if let Some(owner) = self.generator_owner() {
            slots.push(Slot::generator(owner));
        }
        slots
    }

    /// Visit every battlefield instance, generator included.
    pub fn for_each_instance_mut(&mut self, mut f: impl FnMut(&mut CardInstance)) {
        for (_, zones) in self.players.iter_mut() {
            zones.orbit.iter_mut().for_each(&mut f);
            zones.planet.iter_mut().for_each(&mut f);
        }
        if let Some(generator) = &mut self.generator {
            f(&mut generator.instance);
        }
    }

    // === Generator ===

    #[must_use]
    pub fn generator(&self) -> Option<&GeneratorSlot> {
        self.generator.as_ref()
    }

    pub fn generator_mut(&mut self) -> Option<&mut GeneratorSlot> {
        self.generator.as_mut()
    }

    #[must_use]
    pub fn generator_owner(&self) -> Option<PlayerId> {
        self.generator.as_ref().map(|g| g.instance.owner)
    }

    /// Place the generator. Returns `false` if one already exists.
    pub fn install_generator(&mut self, instance: CardInstance) -> bool {
        if self.generator.is_some() {
            return false;
        }
        self.generator = Some(GeneratorSlot {
            instance,
            garrison: SmallVec::new(),
        });
        true
    }

    /// Total cards tracked (all zones, generator included).
    #[must_use]
    pub fn total_cards(&self) -> usize {
        let per_player: usize = self
            .players
            .iter()
            .map(|(_, z)| {
                z.deck.len() + z.hand.len() + z.graveyard.len() + z.orbit.len() + z.planet.len()
            })
            .sum();
        per_player + usize::from(self.generator.is_some())
    }
}
