//! Typed card abilities.
//!
//! Deck lists arrive with free-form rules text. The text is compiled once,
//! when the deck list is loaded, into a small list of `Ability` tags with
//! structured parameters. Rule code only ever inspects the tags.
//!
//! ## Compilation
//!
//! - Unit, structure and discovery cards collect every phrase that matches.
//! - Equipment compiles to a single `Equip` bonus.
//! - Events compile to exactly one `EventEffect`, chosen by an ordered
//!   first-match table (see `EventEffect::classify`).
//!
//! Matching is case-insensitive and runs over the card name followed by
//! its rules text.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::CardKind;
use crate::effects::EventEffect;

/// Which friendly cards an aura buffs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuraTarget {
    Ships,
    GroundUnits,
    Structures,
    Units,
}

impl AuraTarget {
    /// Whether a card of `kind` is covered by this aura.
    #[must_use]
    pub const fn covers(self, kind: CardKind) -> bool {
        match self {
            Self::Ships => matches!(kind, CardKind::Ship),
            Self::GroundUnits => matches!(kind, CardKind::GroundUnit | CardKind::Natives),
            Self::Structures => matches!(kind, CardKind::Structure),
            Self::Units => kind.is_unit(),
        }
    }
}

/// A typed ability with its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    /// Orbit unit may attack the enemy surface and generator.
    OrbitalStrike,
    /// Surface unit may attack enemy orbit.
    AntiAir,
    /// May act twice per turn.
    DoubleAttack,
    /// Defenders do not strike back in single combat.
    NoCounter,
    /// Deals `amount` back to an attacker when this card is attacked.
    Reflect { amount: i32 },
    /// Energy added to the owner's pool at end of turn.
    GeneratesEnergy { amount: i32 },
    /// Raises the owner's energy cap.
    EnergyCapacity { amount: i32 },
    /// Passive bonus to the owner's cards of a kind.
    Aura {
        target: AuraTarget,
        attack: i32,
        defense: i32,
    },
    /// Permanent stat gain applied at each end of turn.
    Growth { attack: i32, defense: i32 },
    /// Win-condition card: tap while owning the generator to win.
    Consciousness,
    /// Launches fighter tokens into orbit.
    Carrier {
        tokens: u32,
        attack: i32,
        defense: i32,
        energy_cost: i32,
    },
    /// Sacrificed to land a ground token with these stats.
    Dropship { attack: i32, defense: i32 },
    /// Research +1 and a discovery roll.
    Survey { energy_cost: i32 },
    /// Research +1 and a card draw.
    QuantumSensor { energy_cost: i32 },
    /// May descend from orbit to the planet.
    Atmospheric,
    /// Tap to gain energy.
    TapForEnergy { amount: i32 },
    /// Equipment bonus granted to the carrier unit.
    Equip { attack: i32, defense: i32 },
    /// One-shot event effect.
    Event(EventEffect),
}

/// Parameterless abilities and the phrases that grant them.
const FLAGS: &[(Ability, &[&str])] = &[
    (Ability::OrbitalStrike, &["orbital strike", "orbital bombardment"]),
    (Ability::AntiAir, &["anti-air", "anti air"]),
    (Ability::DoubleAttack, &["double attack", "attacks twice", "attack twice"]),
    (
        Ability::NoCounter,
        &["no counter", "cannot be countered", "no retaliation", "without retaliation"],
    ),
    (Ability::Consciousness, &["consciousness"]),
    (Ability::Atmospheric, &["atmospheric", "can land", "enter atmosphere"]),
];

type UnitRule = fn(&str) -> Option<Ability>;

const UNIT_RULES: &[UnitRule] = &[
    reflect,
    generates_energy,
    energy_capacity,
    aura,
    growth,
    carrier,
    dropship,
    survey,
    quantum_sensor,
    tap_for_energy,
];

/// Most fighters one carrier launches.
pub const MAX_CARRIER_TOKENS: u32 = 6;

impl Ability {
    /// Compile a card's name and rules text into typed abilities.
    ///
    /// ```
    /// use orbital_ccg::cards::{Ability, CardKind};
    ///
    /// let abilities = Ability::compile(CardKind::GroundUnit, "Flak Battery", "Anti-air.");
    /// assert_eq!(abilities.as_slice(), &[Ability::AntiAir]);
    /// ```
    #[must_use]
    pub fn compile(kind: CardKind, name: &str, text: &str) -> SmallVec<[Ability; 2]> {
        let source = format!("{} {}", name, text).to_lowercase();

        match kind {
            CardKind::Event => smallvec::smallvec![Ability::Event(EventEffect::classify(&source))],
            CardKind::Equipment => {
                let (attack, defense) = match (
                    plus_bonus(&source, "attack"),
                    plus_bonus(&source, "defense"),
                ) {
                    (None, None) => stat_pair(&source).unwrap_or((0, 0)),
                    (attack, defense) => (attack.unwrap_or(0), defense.unwrap_or(0)),
                };
                smallvec::smallvec![Ability::Equip { attack, defense }]
            }
            _ => {
                let flags = FLAGS
                    .iter()
                    .filter(|(_, phrases)| phrases.iter().any(|p| source.contains(p)))
                    .map(|(ability, _)| *ability);
                flags
                    .chain(UNIT_RULES.iter().filter_map(|rule| rule(&source)))
                    .collect()
            }
        }
    }
}

fn reflect(text: &str) -> Option<Ability> {
    text.contains("reflect").then(|| Ability::Reflect {
        amount: number_after(text, "reflect").unwrap_or(1),
    })
}

fn generates_energy(text: &str) -> Option<Ability> {
    (text.contains("generate") && text.contains("energy") && !text.contains("tap")).then(|| {
        Ability::GeneratesEnergy {
            amount: number_after(text, "generate").unwrap_or(1),
        }
    })
}

fn energy_capacity(text: &str) -> Option<Ability> {
    const PHRASES: [&str; 3] = ["max energy", "maximum energy", "energy capacity"];
    PHRASES
        .iter()
        .find(|phrase| text.contains(*phrase))
        .map(|phrase| Ability::EnergyCapacity {
            amount: number_after(text, phrase).unwrap_or(1),
        })
}

fn aura(text: &str) -> Option<Ability> {
    let target = if text.contains("all structures") {
        AuraTarget::Structures
    } else if text.contains("all ships") {
        AuraTarget::Ships
    } else if text.contains("all ground") {
        AuraTarget::GroundUnits
    } else if text.contains("all units") || text.contains("all friendly") {
        AuraTarget::Units
    } else {
        return None;
    };

    let attack = plus_bonus(text, "attack");
    let defense = plus_bonus(text, "defense");
    if attack.is_none() && defense.is_none() {
        return None;
    }
    Some(Ability::Aura {
        target,
        attack: attack.unwrap_or(0),
        defense: defense.unwrap_or(0),
    })
}

fn growth(text: &str) -> Option<Ability> {
    if !(text.contains("grow") || text.contains("end of turn")) {
        return None;
    }
    stat_pair(text).map(|(attack, defense)| Ability::Growth { attack, defense })
}

fn carrier(text: &str) -> Option<Ability> {
    if !(text.contains("carrier") || (text.contains("deploy") && text.contains("fighter"))) {
        return None;
    }
    let (attack, defense) = stat_pair(text).unwrap_or((1, 1));
    Some(Ability::Carrier {
        tokens: number_after(text, "deploy").map_or(2, |n| n.clamp(0, MAX_CARRIER_TOKENS as i32) as u32),
        attack,
        defense,
        energy_cost: number_after(text, "pay").unwrap_or(1),
    })
}

fn dropship(text: &str) -> Option<Ability> {
    if !(text.contains("dropship") || text.contains("land as")) {
        return None;
    }
    let (attack, defense) = stat_pair(text).unwrap_or((2, 2));
    Some(Ability::Dropship { attack, defense })
}

fn survey(text: &str) -> Option<Ability> {
    text.contains("survey").then(|| Ability::Survey {
        energy_cost: number_after(text, "pay").unwrap_or(1),
    })
}

fn quantum_sensor(text: &str) -> Option<Ability> {
    text.contains("quantum sensor").then(|| Ability::QuantumSensor {
        energy_cost: number_after(text, "pay").unwrap_or(2),
    })
}

fn tap_for_energy(text: &str) -> Option<Ability> {
    (text.contains("tap") && text.contains("gain") && text.contains("energy")).then(|| {
        Ability::TapForEnergy {
            amount: number_after(text, "gain").unwrap_or(1),
        }
    })
}

/// The number following the first occurrence of `keyword`.
///
/// The rest of the keyword's word is skipped, so `"reflects 2"` matches
/// keyword `"reflect"`. A leading `+` is accepted.
pub(crate) fn number_after(text: &str, keyword: &str) -> Option<i32> {
    let start = text.find(keyword)? + keyword.len();
    let rest = text[start..]
        .trim_start_matches(|c: char| c.is_alphabetic())
        .trim_start()
        .trim_start_matches('+');
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// The `N` of the first `+N <stat>` phrase.
pub(crate) fn plus_bonus(text: &str, stat: &str) -> Option<i32> {
    text.match_indices('+').find_map(|(i, _)| {
        let rest = &text[i + 1..];
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        if digits.is_empty() || !rest[digits.len()..].trim_start().starts_with(stat) {
            return None;
        }
        digits.parse().ok()
    })
}

/// The first `A/B` (or `+A/+B`) stat pair.
pub(crate) fn stat_pair(text: &str) -> Option<(i32, i32)> {
    text.match_indices('/').find_map(|(i, _)| {
        let left_len = text[..i]
            .chars()
            .rev()
            .take_while(char::is_ascii_digit)
            .count();
        let right: String = text[i + 1..]
            .trim_start_matches('+')
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        if left_len == 0 || right.is_empty() {
            return None;
        }
        Some((text[i - left_len..i].parse().ok()?, right.parse().ok()?))
    })
}
