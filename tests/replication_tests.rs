//! Remote replication integration tests.
//!
//! Two clients share a seed and deck lists, exchange actions through
//! in-memory transports, and must agree on the snapshot hash after every
//! delivered message.

use orbital_ccg::ai::AiDriver;
use orbital_ccg::cards::{catalog, Ability, CardDefinition, CardId, CardKind};
use orbital_ccg::core::{MatchBuilder, MatchConfig, MatchState, PlayerId};
use orbital_ccg::error::ActionError;
use orbital_ccg::rules::apply_action;
use orbital_ccg::session::{protocol, GameClient, QueueTransport, RemoteOutcome};
use orbital_ccg::zones::{Slot, Zone};
use serde_json::json;

const DRONE: CardId = CardId::new(7);
const MARINES: CardId = CardId::new(8);

fn starter(id: CardId) -> CardDefinition {
    catalog::starter_deck().into_iter().find(|c| c.id == id).unwrap()
}

fn shared_match(config: MatchConfig) -> MatchState {
    let p1 = vec![
        starter(DRONE),
        starter(MARINES),
        starter(MARINES),
        starter(MARINES),
        starter(MARINES),
        starter(MARINES),
        starter(MARINES),
    ];
    let p2 = vec![starter(MARINES); 8];
    MatchBuilder::new(config)
        .with_deck(PlayerId::P1, p1)
        .with_deck(PlayerId::P2, p2)
        .without_shuffle()
        .build()
}

/// Two connected clients.
struct Pair {
    host: GameClient,
    guest: GameClient,
    to_guest: QueueTransport,
    to_host: QueueTransport,
}

impl Pair {
    fn new(config: MatchConfig) -> Self {
        Self::from_state(shared_match(config))
    }

    fn from_state(state: MatchState) -> Self {
        let to_guest = QueueTransport::new();
        let to_host = QueueTransport::new();
        Self {
            host: GameClient::remote(state.clone(), PlayerId::P1, to_guest.clone()),
            guest: GameClient::remote(state, PlayerId::P2, to_host.clone()),
            to_guest,
            to_host,
        }
    }

    /// Deliver every queued message and check both sides agree.
    fn sync(&mut self) {
        for (action_type, data) in self.to_guest.drain() {
            let outcome = self.guest.handle_remote_action(&action_type, &data);
            assert_eq!(outcome, RemoteOutcome::Applied, "guest failed to apply {action_type}");
        }
        for (action_type, data) in self.to_host.drain() {
            let outcome = self.host.handle_remote_action(&action_type, &data);
            assert_eq!(outcome, RemoteOutcome::Applied, "host failed to apply {action_type}");
        }
        assert_eq!(
            protocol::state_hash(self.host.state()).unwrap(),
            protocol::state_hash(self.guest.state()).unwrap()
        );
        assert!(self.host.divergences().is_empty());
        assert!(self.guest.divergences().is_empty());
    }
}

fn ready(state: &mut MatchState, card: CardDefinition, owner: PlayerId, zone: Zone) -> Slot {
    let mut instance = state.spawn(card, owner);
    instance.summoning_sickness = false;
    instance.deployed_this_turn = false;
    state.zones.deploy(zone, instance).unwrap()
}

fn hand_index(client: &GameClient, id: CardId) -> usize {
    client.state().zones.hand_position(client.local_player(), id).unwrap()
}

// =============================================================================
// Replication Tests
// =============================================================================

/// Test a few turns of ordinary play staying in lockstep.
#[test]
fn test_clients_stay_in_lockstep() {
    let mut pair = Pair::new(MatchConfig::default());

    // Turn 1: host adds a gate and fills both.
    pair.host.add_gate().unwrap();
    let drone = hand_index(&pair.host, DRONE);
    pair.host.play_card(drone, 0).unwrap();
    let marines = hand_index(&pair.host, MARINES);
    pair.host.play_card(marines, 1).unwrap();
    pair.host.end_turn().unwrap();
    pair.sync();

    // Turn 2: guest deploys marines.
    let marines = hand_index(&pair.guest, MARINES);
    pair.guest.play_card(marines, 0).unwrap();
    pair.guest.end_turn().unwrap();
    pair.sync();

    // Turn 3: the two marine squads trade.
    pair.host
        .attack_single(Slot::planet(PlayerId::P1, 0), Slot::planet(PlayerId::P2, 0))
        .unwrap();
    pair.sync();

    assert!(pair.guest.state().zones.planet(PlayerId::P1).is_empty());
    assert!(pair.guest.state().zones.planet(PlayerId::P2).is_empty());
    assert_eq!(pair.guest.state().zones.graveyard(PlayerId::P2)[0].id, MARINES);
}

/// Test that a survey's outcome is sent rather than rolled again.
#[test]
fn test_survey_outcome_transmitted() {
    let mut pair = Pair::new(MatchConfig::default().with_base_discovery_chance(1.0));

    let drone = hand_index(&pair.host, DRONE);
    pair.host.play_card(drone, 0).unwrap();
    pair.host.end_turn().unwrap();
    pair.sync();
    pair.guest.end_turn().unwrap();
    pair.sync();

    pair.host.survey(Slot::orbit(PlayerId::P1, 0)).unwrap();

    let messages = pair.to_guest.drain();
    assert_eq!(messages.len(), 1);
    let (action_type, data) = &messages[0];
    assert_eq!(action_type, "survey");
    assert_eq!(data["discovery"], json!("generator"));

    assert_eq!(pair.guest.handle_remote_action(action_type, data), RemoteOutcome::Applied);
    assert_eq!(pair.guest.state().zones.generator_owner(), Some(PlayerId::P1));
    assert_eq!(pair.guest.state().research[PlayerId::P1], 1);
    pair.sync();
}

/// Test that a survey message without its outcome is refused instead of
/// rolled on the receiving side.
#[test]
fn test_survey_without_outcome_rejected() {
    let mut pair = Pair::new(MatchConfig::default().with_base_discovery_chance(1.0));
    let drone = hand_index(&pair.host, DRONE);
    pair.host.play_card(drone, 0).unwrap();
    pair.host.end_turn().unwrap();
    pair.sync();
    pair.guest.end_turn().unwrap();
    pair.sync();
    let before = protocol::state_hash(pair.guest.state()).unwrap();

    let outcome = pair.guest.handle_remote_action(
        "survey",
        &json!({"cardIndex": 0, "zone": "orbit", "isPlayer1": true}),
    );

    assert_eq!(outcome, RemoteOutcome::Rejected(ActionError::MissingOutcome));
    assert_eq!(pair.guest.state().zones.generator_owner(), None);
    assert_eq!(pair.guest.state().research[PlayerId::P1], 0);
    assert_eq!(protocol::state_hash(pair.guest.state()).unwrap(), before);
}

/// Test that an orbital strike from orbit slot 0 onto planet slot 1
/// destroys the same unit on both clients.
#[test]
fn test_orbital_strike_replays_across_zones() {
    let mut state = MatchState::new(MatchConfig::default());
    let bomber = CardDefinition::new(CardId::new(30), "Bomber", CardKind::Ship)
        .with_stats(3, 3)
        .with_ability(Ability::OrbitalStrike);
    let ship = ready(&mut state, bomber, PlayerId::P1, Zone::Orbit);
    for id in [31, 32] {
        let squad = CardDefinition::new(CardId::new(id), format!("Squad {id}"), CardKind::GroundUnit).with_stats(0, 2);
        ready(&mut state, squad, PlayerId::P2, Zone::Planet);
    }
    let mut pair = Pair::from_state(state);

    pair.host.toggle_attacker(ship).unwrap();
    pair.host.attack_with_stack(Slot::planet(PlayerId::P2, 1)).unwrap();

    let (action_type, mut data) = pair.to_guest.pop().unwrap();
    assert_eq!(action_type, "attack");
    assert_eq!(data["attackerIndices"], json!([{"zone": "orbit", "idx": 0}]));
    assert_eq!(data["attackerZone"], "orbit");
    assert_eq!(data["targetZone"], "planet");
    assert_eq!(data["targetIndex"], 1);
    // A sender that omits the mode gets the stack resolution.
    data.as_object_mut().unwrap().remove("mode");

    assert_eq!(pair.guest.handle_remote_action(&action_type, &data), RemoteOutcome::Applied);
    pair.sync();

    for client in [&pair.host, &pair.guest] {
        let planet: Vec<_> = client.state().zones.planet(PlayerId::P2).iter().map(|c| c.card.id).collect();
        assert_eq!(planet, vec![CardId::new(31)]);
        assert_eq!(client.state().zones.graveyard(PlayerId::P2)[0].id, CardId::new(32));
        assert!(client.state().zones.orbit(PlayerId::P1)[0].tapped);
    }
}

/// Test that stack assembly stays local and only the attack is sent.
#[test]
fn test_stack_attack_replicates() {
    let mut pair = Pair::new(MatchConfig::default());
    pair.host.add_gate().unwrap();
    for gate in 0..2 {
        let marines = hand_index(&pair.host, MARINES);
        pair.host.play_card(marines, gate).unwrap();
    }
    pair.host.end_turn().unwrap();
    let marines = hand_index(&pair.guest, MARINES);
    pair.sync();
    pair.guest.play_card(marines, 0).unwrap();
    pair.guest.end_turn().unwrap();
    pair.sync();

    pair.host.toggle_attacker(Slot::planet(PlayerId::P1, 0)).unwrap();
    pair.host.toggle_attacker(Slot::planet(PlayerId::P1, 1)).unwrap();
    assert!(pair.to_guest.is_empty());
    assert_eq!(pair.host.stack_targets(), vec![Slot::planet(PlayerId::P2, 0)]);

    pair.host.attack_with_stack(Slot::planet(PlayerId::P2, 0)).unwrap();
    pair.sync();

    assert!(pair.guest.state().zones.planet(PlayerId::P2).is_empty());
    // Retaliation of 2 killed exactly one 2/2 squad.
    assert_eq!(pair.guest.state().zones.planet(PlayerId::P1).len(), 1);
}

/// Test that a bad hash is recorded as a divergence, not an error.
#[test]
fn test_divergence_detected() {
    let mut pair = Pair::new(MatchConfig::default());
    pair.host.add_gate().unwrap();
    let (action_type, mut data) = pair.to_guest.pop().unwrap();
    data["stateHash"] = json!("12345");

    let outcome = pair.guest.handle_remote_action(&action_type, &data);

    let RemoteOutcome::Diverged(divergence) = outcome else {
        panic!("expected divergence, got {outcome:?}");
    };
    assert_eq!(divergence.expected, 12345);
    assert_eq!(divergence.turn, 1);
    assert_eq!(pair.guest.divergences().len(), 1);
    // The action still applied.
    assert_eq!(pair.guest.state().gates[PlayerId::P1].len(), 2);
}

/// Test that unknown and failing messages never disturb the receiver.
#[test]
fn test_bad_messages_are_contained() {
    let mut pair = Pair::new(MatchConfig::default());
    let before = protocol::state_hash(pair.guest.state()).unwrap();

    assert_eq!(
        pair.guest.handle_remote_action("warp_drive", &json!({"isPlayer1": true})),
        RemoteOutcome::Ignored
    );
    assert_eq!(
        pair.guest.handle_remote_action("play_card", &json!({"cardIndex": "zero"})),
        RemoteOutcome::Ignored
    );
    assert_eq!(
        pair.guest
            .handle_remote_action("land_dropship", &json!({"cardIndex": 4, "zone": "orbit", "isPlayer1": true})),
        RemoteOutcome::Rejected(ActionError::NoSuchCard)
    );
    assert_eq!(
        pair.guest.handle_remote_action("add_gate", &json!({"isPlayer1": false})),
        RemoteOutcome::Rejected(ActionError::NotYourTurn(PlayerId::P2))
    );

    assert_eq!(protocol::state_hash(pair.guest.state()).unwrap(), before);
}

/// Test that a replayed card is found by id when the index is stale.
#[test]
fn test_play_card_falls_back_to_card_id() {
    let mut pair = Pair::new(MatchConfig::default());
    let drone = hand_index(&pair.host, DRONE);
    pair.host.play_card(drone, 0).unwrap();
    let (action_type, mut data) = pair.to_guest.pop().unwrap();
    data["cardIndex"] = json!(3);

    assert_eq!(pair.guest.handle_remote_action(&action_type, &data), RemoteOutcome::Applied);
    assert_eq!(pair.guest.state().zones.orbit(PlayerId::P1)[0].card.id, DRONE);
    assert_eq!(
        pair.guest.state().zones.hand(PlayerId::P1).len(),
        pair.host.state().zones.hand(PlayerId::P1).len()
    );
}

/// Test that scripted play mirrored message by message converges.
#[test]
fn test_scripted_turns_replicate() {
    let config = MatchConfig::default().with_seed(21);
    let build = || {
        MatchBuilder::new(config.clone())
            .with_deck(PlayerId::P1, catalog::starter_deck())
            .with_deck(PlayerId::P2, catalog::starter_deck())
            .build()
    };
    let mut source = build();
    let mut mirror = build();
    let mut drivers = [AiDriver::new(&source, PlayerId::P1), AiDriver::new(&source, PlayerId::P2)];

    for _ in 0..10 {
        if source.is_game_over() {
            break;
        }
        let applied = drivers[source.active_player.index()].run_to_completion(&mut source);
        for action in applied {
            let (action_type, data) = protocol::encode_action(&action).unwrap();
            let remote = protocol::decode_message(&action_type, &data).unwrap();
            apply_action(&mut mirror, remote.action).unwrap();
        }
        assert_eq!(
            protocol::state_hash(&source).unwrap(),
            protocol::state_hash(&mirror).unwrap()
        );
    }
}
