//! Card instances - runtime battlefield state.
//!
//! `CardInstance` is a card deployed to orbit, the planet, or the
//! generator slot. It owns a copy of its definition, so an instance can be
//! returned to a hand or graveyard without a catalog lookup.
//!
//! Stats stored here are base values (`power`, `toughness`) plus permanent
//! gains. Equipment and aura bonuses are added on read by
//! `combat::stats`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ability::Ability;
use super::definition::{CardDefinition, CardKind};
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;

/// An equipment card attached to a unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attachment {
    pub card: CardDefinition,
    pub attack: i32,
    pub defense: i32,
}

impl Attachment {
    /// Build an attachment from an equipment definition.
    #[must_use]
    pub fn from_equipment(card: CardDefinition) -> Self {
        let (attack, defense) = card
            .find(|a| match a {
                Ability::Equip { attack, defense } => Some((*attack, *defense)),
                _ => None,
            })
            .unwrap_or((0, 0));
        Self {
            card,
            attack,
            defense,
        }
    }
}

/// A card instance on the battlefield.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique entity ID for this instance.
    pub entity_id: EntityId,

    /// The definition this instance was deployed from.
    pub card: CardDefinition,

    /// Controlling player.
    pub owner: PlayerId,

    /// Attack before equipment and auras.
    pub power: i32,

    /// Maximum defense before equipment and auras.
    pub toughness: i32,

    /// Damage taken this turn cycle.
    pub damage: i32,

    pub tapped: bool,

    /// Set on deploy; cleared after the owner's next end of turn.
    pub summoning_sickness: bool,

    pub moved_this_turn: bool,
    pub deployed_this_turn: bool,

    pub actions_used: u32,
    pub max_actions: u32,

    /// A double-attack unit has struck once and stayed untapped.
    pub attacked_twice: bool,

    /// Member of the pending combat stack.
    pub selected: bool,

    /// Committed to the generator's garrison.
    pub garrisoned: bool,

    /// Created by an ability rather than played from hand.
    pub token: bool,

    /// Equipment in attach order.
    pub attachments: SmallVec<[Attachment; 2]>,
}

impl CardInstance {
    /// Deploy a definition as a fresh instance.
    ///
    /// The instance starts with summoning sickness.
    #[must_use]
    pub fn new(entity_id: EntityId, card: CardDefinition, owner: PlayerId) -> Self {
        let max_actions = if card.has(|a| matches!(a, Ability::DoubleAttack)) {
            2
        } else {
            1
        };
        Self {
            entity_id,
            power: card.attack,
            toughness: card.defense,
            card,
            owner,
            damage: 0,
            tapped: false,
            summoning_sickness: true,
            moved_this_turn: false,
            deployed_this_turn: true,
            actions_used: 0,
            max_actions,
            attacked_twice: false,
            selected: false,
            garrisoned: false,
            token: false,
            attachments: SmallVec::new(),
        }
    }

    /// Mark as a token (builder pattern).
    #[must_use]
    pub fn as_token(mut self) -> Self {
        self.token = true;
        self
    }

    /// Card type of the underlying definition.
    #[must_use]
    pub fn kind(&self) -> CardKind {
        self.card.kind
    }

    /// Check whether any ability matches a predicate.
    #[must_use]
    pub fn has(&self, predicate: impl Fn(&Ability) -> bool) -> bool {
        self.card.has(predicate)
    }

    /// Base health left: `toughness - damage`.
    #[must_use]
    pub fn health(&self) -> i32 {
        self.toughness - self.damage
    }

    /// Summed `(attack, defense)` of all attachments.
    #[must_use]
    pub fn equipment_bonus(&self) -> (i32, i32) {
        self.attachments
            .iter()
            .fold((0, 0), |(a, d), att| (a + att.attack, d + att.defense))
    }

    /// Whether the unit can take an action (attack, ability) right now.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.tapped && !self.summoning_sickness && self.actions_used < self.max_actions
    }

    /// Apply damage.
    pub fn take_damage(&mut self, amount: i32) {
        self.damage += amount.max(0);
    }

    /// Spend one action. Taps once the action budget is exhausted.
    pub fn spend_action(&mut self) {
        self.actions_used += 1;
        if self.actions_used >= self.max_actions {
            self.tapped = true;
        } else {
            self.attacked_twice = true;
        }
    }

    /// Start-of-turn refresh for the controller's cards.
    pub fn refresh(&mut self) {
        self.tapped = false;
        self.actions_used = 0;
        self.attacked_twice = false;
    }

    /// Reset the per-turn movement flags.
    pub fn reset_turn_flags(&mut self) {
        self.moved_this_turn = false;
        self.deployed_this_turn = false;
        self.attacked_twice = false;
    }
}
