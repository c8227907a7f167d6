//! Event effect definitions.
//!
//! An event card compiles to exactly one `EventEffect`. Effects that act on
//! a single battlefield card need a second click to pick it; the rest
//! resolve immediately on play.

use serde::{Deserialize, Serialize};

use crate::cards::ability::{number_after, plus_bonus};

/// The effect of an event card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventEffect {
    // === Immediate ===

    /// Damage every enemy orbit unit.
    AreaDamage { amount: i32 },

    /// Defense bonus for every friendly unit, as a permanent toughness gain.
    TeamDefense { amount: i32 },

    /// Remove damage from the first damaged friendly unit.
    Repair { amount: i32 },

    /// Caster draws cards.
    Draw { count: u32 },

    /// Opponent discards from the end of their hand.
    Discard { count: u32 },

    /// Opponent's deck loses its top cards to the graveyard.
    Mill { count: u32 },

    /// No rules effect; the card is acknowledged and discarded.
    Acknowledge,

    // === Targeted ===

    /// Damage one enemy card.
    TargetedDamage { amount: i32 },

    /// Destroy one enemy card.
    Destroy,

    /// Return one enemy card to its owner's hand.
    Bounce,

    /// Tap one enemy card.
    TapTarget,
}

type EventRule = fn(&str) -> Option<EventEffect>;

/// Ordered classification table. The first matching rule wins.
const EVENT_RULES: &[EventRule] = &[
    emp,
    bombardment,
    shield,
    repair,
    draw,
    deal_damage,
    destroy,
    discard,
    mill,
    bounce,
    tap,
];

impl EventEffect {
    /// Classify lowercased event text (name followed by rules text).
    ///
    /// ```
    /// use orbital_ccg::effects::EventEffect;
    ///
    /// assert_eq!(EventEffect::classify("emp burst"), EventEffect::AreaDamage { amount: 2 });
    /// assert_eq!(EventEffect::classify("field notes"), EventEffect::Acknowledge);
    /// ```
    #[must_use]
    pub fn classify(text: &str) -> Self {
        EVENT_RULES
            .iter()
            .find_map(|rule| rule(text))
            .unwrap_or(Self::Acknowledge)
    }

    /// Whether playing this effect waits for a target click.
    #[must_use]
    pub const fn needs_target(self) -> bool {
        matches!(
            self,
            Self::TargetedDamage { .. } | Self::Destroy | Self::Bounce | Self::TapTarget
        )
    }
}

fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric()).any(|w| w == word)
}

fn emp(text: &str) -> Option<EventEffect> {
    has_word(text, "emp").then(|| EventEffect::AreaDamage {
        amount: number_after(text, "deal").unwrap_or(2),
    })
}

fn bombardment(text: &str) -> Option<EventEffect> {
    (text.contains("orbital strike") || text.contains("bombardment")).then(|| {
        EventEffect::TargetedDamage {
            amount: number_after(text, "deal").unwrap_or(3),
        }
    })
}

fn shield(text: &str) -> Option<EventEffect> {
    (text.contains("shield") || text.contains("resonance")).then(|| EventEffect::TeamDefense {
        amount: plus_bonus(text, "defense").unwrap_or(1),
    })
}

fn repair(text: &str) -> Option<EventEffect> {
    (text.contains("phase") || text.contains("repair")).then(|| EventEffect::Repair {
        amount: number_after(text, "repair")
            .or_else(|| number_after(text, "heal"))
            .unwrap_or(2),
    })
}

fn draw(text: &str) -> Option<EventEffect> {
    (text.contains("draw") && text.contains("card")).then(|| EventEffect::Draw {
        count: number_after(text, "draw").map_or(1, |n| n.max(0) as u32),
    })
}

fn deal_damage(text: &str) -> Option<EventEffect> {
    (text.contains("deal") && text.contains("damage")).then(|| EventEffect::TargetedDamage {
        amount: number_after(text, "deal").unwrap_or(1),
    })
}

fn destroy(text: &str) -> Option<EventEffect> {
    text.contains("destroy").then_some(EventEffect::Destroy)
}

fn discard(text: &str) -> Option<EventEffect> {
    text.contains("discard").then(|| EventEffect::Discard {
        count: number_after(text, "discard").map_or(1, |n| n.max(0) as u32),
    })
}

fn mill(text: &str) -> Option<EventEffect> {
    text.contains("mill").then(|| EventEffect::Mill {
        count: number_after(text, "mill").map_or(1, |n| n.max(0) as u32),
    })
}

fn bounce(text: &str) -> Option<EventEffect> {
    (text.contains("return") && text.contains("hand")).then_some(EventEffect::Bounce)
}

fn tap(text: &str) -> Option<EventEffect> {
    has_word(text, "tap").then_some(EventEffect::TapTarget)
}
