//! Event and equipment integration tests.
//!
//! Cards are played from hand through `apply_action`, then targeted with
//! `resolve_target` messages, the way both clients replay them.

use orbital_ccg::cards::{Ability, CardDefinition, CardId, CardKind, RawCard};
use orbital_ccg::combat::effective_attack;
use orbital_ccg::core::{Action, MatchConfig, MatchState, PendingMode, PlayerId};
use orbital_ccg::effects::EventEffect;
use orbital_ccg::error::ActionError;
use orbital_ccg::rules::apply_action;
use orbital_ccg::zones::{Slot, Zone};

fn state_with_gate(power: u32) -> MatchState {
    let mut state = MatchState::new(MatchConfig::default());
    state.gates[PlayerId::P1][0].power = power;
    state
}

fn event(id: u32, effect: EventEffect) -> CardDefinition {
    CardDefinition::new(CardId::new(id), format!("Event {id}"), CardKind::Event)
        .with_cost(1)
        .with_ability(Ability::Event(effect))
}

fn unit(state: &mut MatchState, id: u32, owner: PlayerId, zone: Zone, stats: (i32, i32)) -> Slot {
    let kind = if zone == Zone::Orbit { CardKind::Ship } else { CardKind::GroundUnit };
    let card = CardDefinition::new(CardId::new(id), format!("Unit {id}"), kind).with_stats(stats.0, stats.1);
    let instance = state.spawn(card, owner);
    state.zones.deploy(zone, instance).unwrap()
}

/// Put `card` in P1's hand and play it on gate 0.
fn play(state: &mut MatchState, card: CardDefinition) -> Result<Action, ActionError> {
    state.zones.add_to_hand(PlayerId::P1, card.clone());
    let index = state.zones.hand(PlayerId::P1).len() - 1;
    apply_action(state, Action::play_card(PlayerId::P1, index, 0, card))
}

// =============================================================================
// Classification Tests
// =============================================================================

/// Test that the first matching rule wins when text fits several.
#[test]
fn test_classification_first_match_wins() {
    // Mentions both a strike and generic damage: the strike rule is earlier.
    assert_eq!(
        EventEffect::classify("orbital strike deal 5 damage"),
        EventEffect::TargetedDamage { amount: 5 }
    );
    // "emp" is checked before the generic damage rule.
    assert_eq!(
        EventEffect::classify("emp wave deal 3 damage"),
        EventEffect::AreaDamage { amount: 3 }
    );
    assert_eq!(EventEffect::classify("a quiet moment"), EventEffect::Acknowledge);
}

/// Test that a catalog entry compiles its text into an event effect.
#[test]
fn test_raw_event_compiles() {
    let raw: RawCard = serde_json::from_value(serde_json::json!({
        "name": "Sabotage",
        "type": "event",
        "cost": 2,
        "ability": "Destroy target unit."
    }))
    .unwrap();

    let card = CardDefinition::from_raw(CardId::new(40), &raw).unwrap();

    assert_eq!(card.event_effect(), Some(EventEffect::Destroy));
}

// =============================================================================
// Immediate Event Tests
// =============================================================================

/// Test that area damage hits every enemy ship and nothing else.
#[test]
fn test_area_damage() {
    let mut state = state_with_gate(1);
    unit(&mut state, 1, PlayerId::P2, Zone::Orbit, (1, 2));
    unit(&mut state, 2, PlayerId::P2, Zone::Orbit, (1, 5));
    let ground = unit(&mut state, 3, PlayerId::P2, Zone::Planet, (1, 1));
    let own = unit(&mut state, 4, PlayerId::P1, Zone::Orbit, (1, 1));

    play(&mut state, event(50, EventEffect::AreaDamage { amount: 2 })).unwrap();

    assert_eq!(state.zones.orbit(PlayerId::P2).len(), 1);
    assert_eq!(state.zones.orbit(PlayerId::P2)[0].damage, 2);
    assert_eq!(state.zones.get(ground).unwrap().damage, 0);
    assert_eq!(state.zones.get(own).unwrap().damage, 0);
    assert_eq!(state.zones.graveyard(PlayerId::P1)[0].id, CardId::new(50));
    assert!(state.gates[PlayerId::P1][0].used);
}

/// Test that discard and mill hit the opponent.
#[test]
fn test_discard_and_mill_hit_opponent() {
    let mut state = state_with_gate(1);
    for id in 1..=3 {
        state
            .zones
            .add_to_hand(PlayerId::P2, CardDefinition::new(CardId::new(id), "Card", CardKind::Ship));
    }
    state.zones.set_deck(
        PlayerId::P2,
        (10..15).map(|id| CardDefinition::new(CardId::new(id), "Card", CardKind::Ship)),
    );

    play(&mut state, event(60, EventEffect::Discard { count: 2 })).unwrap();
    // Discard takes from the end of the hand.
    assert_eq!(state.zones.hand(PlayerId::P2).len(), 1);
    assert_eq!(state.zones.hand(PlayerId::P2)[0].id, CardId::new(1));

    apply_action(&mut state, Action::EndTurn).unwrap();
    apply_action(&mut state, Action::EndTurn).unwrap();
    let deck_before = state.zones.deck(PlayerId::P2).len();
    play(&mut state, event(61, EventEffect::Mill { count: 2 })).unwrap();
    assert_eq!(state.zones.deck(PlayerId::P2).len(), deck_before - 2);
}

/// Test that team defense permanently raises friendly unit toughness.
#[test]
fn test_team_defense() {
    let mut state = state_with_gate(1);
    let own = unit(&mut state, 1, PlayerId::P1, Zone::Planet, (1, 2));
    let enemy = unit(&mut state, 2, PlayerId::P2, Zone::Planet, (1, 2));

    play(&mut state, event(70, EventEffect::TeamDefense { amount: 1 })).unwrap();
    apply_action(&mut state, Action::EndTurn).unwrap();

    assert_eq!(state.zones.get(own).unwrap().toughness, 3);
    assert_eq!(state.zones.get(enemy).unwrap().toughness, 2);
}

// =============================================================================
// Targeted Event Tests
// =============================================================================

/// Test the two-phase flow: play, then pick a target.
#[test]
fn test_targeted_damage_waits_for_target() {
    let mut state = state_with_gate(2);
    let target = unit(&mut state, 1, PlayerId::P2, Zone::Planet, (2, 3));

    play(&mut state, event(80, EventEffect::TargetedDamage { amount: 3 })).unwrap();

    assert!(matches!(state.pending, PendingMode::SelectingEventTarget { .. }));
    assert_eq!(state.public_state().pending_target, Some(CardId::new(80)));
    assert!(state.zones.hand(PlayerId::P1).is_empty());

    apply_action(&mut state, Action::resolve_target(PlayerId::P1, target)).unwrap();

    assert!(state.pending.is_none());
    assert!(state.zones.planet(PlayerId::P2).is_empty());
    assert_eq!(state.zones.graveyard(PlayerId::P1)[0].id, CardId::new(80));
}

/// Test that an illegal target keeps the selection open.
#[test]
fn test_own_unit_is_not_event_target() {
    let mut state = state_with_gate(2);
    let own = unit(&mut state, 1, PlayerId::P1, Zone::Planet, (2, 3));
    unit(&mut state, 2, PlayerId::P2, Zone::Planet, (2, 3));

    play(&mut state, event(81, EventEffect::Destroy)).unwrap();

    assert_eq!(
        apply_action(&mut state, Action::resolve_target(PlayerId::P1, own)),
        Err(ActionError::InvalidTarget)
    );
    assert!(matches!(state.pending, PendingMode::SelectingEventTarget { .. }));
}

/// Test that cancelling a paid-for event discards it; the gate stays spent.
#[test]
fn test_cancel_targeted_event() {
    let mut state = state_with_gate(2);
    unit(&mut state, 1, PlayerId::P2, Zone::Planet, (2, 3));

    play(&mut state, event(82, EventEffect::TapTarget)).unwrap();
    apply_action(&mut state, Action::cancel_selection(PlayerId::P1)).unwrap();

    assert!(state.pending.is_none());
    assert_eq!(state.zones.graveyard(PlayerId::P1)[0].id, CardId::new(82));
    assert!(state.gates[PlayerId::P1][0].used);
}

/// Test that bounce returns a real card to hand and deletes a token.
#[test]
fn test_bounce_card_and_token() {
    let mut state = state_with_gate(2);
    let ship = unit(&mut state, 1, PlayerId::P2, Zone::Orbit, (2, 3));

    play(&mut state, event(83, EventEffect::Bounce)).unwrap();
    apply_action(&mut state, Action::resolve_target(PlayerId::P1, ship)).unwrap();

    assert!(state.zones.orbit(PlayerId::P2).is_empty());
    assert_eq!(state.zones.hand(PlayerId::P2).last().unwrap().id, CardId::new(1));

    let fighter = CardDefinition::new(CardId::new(960), "Fighter", CardKind::Ship).with_stats(1, 1);
    let token = state.spawn(fighter, PlayerId::P2).as_token();
    let token = state.zones.deploy(Zone::Orbit, token).unwrap();
    apply_action(&mut state, Action::EndTurn).unwrap();
    apply_action(&mut state, Action::EndTurn).unwrap();
    let hand_before = state.zones.hand(PlayerId::P2).len();

    play(&mut state, event(84, EventEffect::Bounce)).unwrap();
    apply_action(&mut state, Action::resolve_target(PlayerId::P1, token)).unwrap();

    assert!(state.zones.orbit(PlayerId::P2).is_empty());
    assert_eq!(state.zones.hand(PlayerId::P2).len(), hand_before);
}

// =============================================================================
// Equipment Tests
// =============================================================================

/// Test that equipment attaches to a friendly unit and raises its attack.
#[test]
fn test_equipment_attaches() {
    let mut state = state_with_gate(1);
    let trooper = unit(&mut state, 1, PlayerId::P1, Zone::Planet, (1, 2));
    let rifle = CardDefinition::new(CardId::new(22), "Rail Rifle", CardKind::Equipment)
        .with_cost(1)
        .with_ability(Ability::Equip { attack: 2, defense: 0 });

    play(&mut state, rifle).unwrap();
    assert!(matches!(state.pending, PendingMode::SelectingEquipmentTarget { .. }));

    apply_action(&mut state, Action::resolve_target(PlayerId::P1, trooper)).unwrap();

    let equipped = state.zones.get(trooper).unwrap();
    assert_eq!(equipped.attachments.len(), 1);
    assert_eq!(effective_attack(&state, equipped), 3);
    assert!(state.pending.is_none());
}

/// Test that equipment cannot go on an enemy unit.
#[test]
fn test_equipment_rejects_enemy_unit() {
    let mut state = state_with_gate(1);
    unit(&mut state, 1, PlayerId::P1, Zone::Planet, (1, 2));
    let enemy = unit(&mut state, 2, PlayerId::P2, Zone::Planet, (1, 2));
    let plating = CardDefinition::new(CardId::new(23), "Plating", CardKind::Equipment)
        .with_cost(1)
        .with_ability(Ability::Equip { attack: 0, defense: 2 });

    play(&mut state, plating).unwrap();

    assert_eq!(
        apply_action(&mut state, Action::resolve_target(PlayerId::P1, enemy)),
        Err(ActionError::InvalidTarget)
    );
    assert!(state.zones.get(enemy).unwrap().attachments.is_empty());
}
