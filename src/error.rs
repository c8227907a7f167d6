//! Error types for the rules engine.

use thiserror::Error;

use crate::cards::CardId;
use crate::core::PlayerId;

/// Why an action was rejected. A rejected action never mutates state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("the game is over")]
    GameOver,

    #[error("gate action already used this turn")]
    GateActionUsed,

    #[error("already holding the maximum of {0} gates")]
    GateLimit(usize),

    #[error("no such gate: {0}")]
    NoSuchGate(usize),

    #[error("gate {0} cannot pay for this card")]
    GateUnavailable(usize),

    #[error("no unused gate with power {cost} or more")]
    NoAvailableGate { cost: u32 },

    #[error("not enough energy: need {needed}, have {available}")]
    InsufficientEnergy { needed: i32, available: i32 },

    #[error("no card at that position")]
    NoSuchCard,

    #[error("invalid target")]
    InvalidTarget,

    #[error("unit cannot attack: {0}")]
    CannotAttack(&'static str),

    #[error("card is tapped")]
    Tapped,

    #[error("card has summoning sickness")]
    SummoningSick,

    #[error("card does not have that ability")]
    MissingAbility,

    #[error("unit already moved or was deployed this turn")]
    AlreadyMoved,

    #[error("no selection is pending")]
    NothingPending,

    #[error("no attackers selected")]
    EmptyStack,

    #[error("the generator has not been discovered")]
    NoGenerator,

    #[error("you do not control the generator")]
    GeneratorNotControlled,

    #[error("remote survey carried no discovery outcome")]
    MissingOutcome,
}

/// Failure to decode or encode a replicated message.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    #[error("malformed {action} payload: {source}")]
    Payload {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),
}

/// Failure while loading card data.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("malformed deck list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown card type: {0}")]
    UnknownCardType(String),

    #[error("malformed stats: {0}")]
    MalformedStats(String),

    #[error("unknown card: {0}")]
    UnknownCard(String),

    #[error("duplicate card id: {0}")]
    DuplicateId(CardId),
}

pub type ActionResult<T> = std::result::Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ActionError::NotYourTurn(PlayerId::P2).to_string(),
            "it is not Player 2's turn"
        );
        assert_eq!(
            ActionError::InsufficientEnergy {
                needed: 3,
                available: 1
            }
            .to_string(),
            "not enough energy: need 3, have 1"
        );
        assert_eq!(
            WireError::UnknownActionType("dance".into()).to_string(),
            "unknown action type: dance"
        );
    }
}
