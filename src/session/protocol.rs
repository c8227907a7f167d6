//! Wire protocol for replicated actions.
//!
//! A message is `(actionType, actionData)`. `actionData` is the action's
//! camelCase payload object plus a `stateHash` field: the sender's
//! snapshot hash after applying the action.
//!
//! The snapshot hash is FNV-1a 64 over the bincode encoding of
//! `PublicState`, which holds only what both clients know.

use serde_json::{Map, Value};

use crate::core::{Action, MatchState, PublicState};
use crate::error::WireError;

/// Field carrying the sender's snapshot hash.
pub const STATE_HASH_FIELD: &str = "stateHash";

/// A decoded inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteAction {
    pub action: Action,
    pub state_hash: Option<u64>,
}

/// Split an action into its wire type and payload object.
pub fn encode_action(action: &Action) -> Result<(String, Value), WireError> {
    let action_type = action.wire_type();
    let mut tagged = serde_json::to_value(action).map_err(|source| WireError::Payload {
        action: action_type.to_string(),
        source,
    })?;
    let data = tagged
        .as_object_mut()
        .and_then(|object| object.remove("data"))
        .unwrap_or_else(|| Value::Object(Map::new()));
    Ok((action_type.to_string(), data))
}

/// Encode an action and stamp it with the sender's snapshot hash.
pub fn encode_message(action: &Action, state_hash: u64) -> Result<(String, Value), WireError> {
    let (action_type, mut data) = encode_action(action)?;
    if let Value::Object(object) = &mut data {
        // u64 hashes do not survive a JavaScript number; send them as text.
        object.insert(STATE_HASH_FIELD.to_string(), Value::String(state_hash.to_string()));
    }
    Ok((action_type, data))
}

/// Decode an inbound `(actionType, actionData)` pair.
pub fn decode_message(action_type: &str, data: &Value) -> Result<RemoteAction, WireError> {
    if !Action::WIRE_TYPES.contains(&action_type) {
        return Err(WireError::UnknownActionType(action_type.to_string()));
    }

    let mut payload = data.clone();
    let state_hash = match &mut payload {
        Value::Object(object) => object.remove(STATE_HASH_FIELD).and_then(|hash| match hash {
            Value::String(text) => text.parse().ok(),
            Value::Number(number) => number.as_u64(),
            _ => None,
        }),
        _ => None,
    };

    let mut tagged = Map::new();
    tagged.insert("type".to_string(), Value::String(action_type.to_string()));
    if action_type != "end_turn" {
        tagged.insert("data".to_string(), payload);
    }
    let action = serde_json::from_value(Value::Object(tagged)).map_err(|source| WireError::Payload {
        action: action_type.to_string(),
        source,
    })?;
    Ok(RemoteAction { action, state_hash })
}

/// Bincode encoding of a public snapshot.
pub fn serialize_snapshot(snapshot: &PublicState) -> Result<Vec<u8>, WireError> {
    Ok(bincode::serialize(snapshot)?)
}

/// Deterministic hash of a public snapshot, for divergence detection.
pub fn snapshot_hash(snapshot: &PublicState) -> Result<u64, WireError> {
    let bytes = serialize_snapshot(snapshot)?;
    Ok(hash_bytes_fnv1a64(&bytes))
}

/// Snapshot hash of a match as it stands.
pub fn state_hash(state: &MatchState) -> Result<u64, WireError> {
    snapshot_hash(&state.public_state())
}

/// FNV-1a 64 over raw bytes.
#[must_use]
pub fn hash_bytes_fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}
