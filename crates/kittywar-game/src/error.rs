//! Error types for the game layer.
//!
//! Every variant except the catalog ones is a locally detected
//! precondition violation: the action is refused before anything is sent
//! to the server.

use crate::{AbilityId, CatId, ChanceId, TurnPhase};

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The action is not allowed in the current phase.
    #[error("{action} requires phase {required}, current phase is {current}")]
    WrongPhase {
        action: &'static str,
        required: TurnPhase,
        current: TurnPhase,
    },

    /// The granted ability has not recharged yet.
    #[error("{0} is still on cooldown")]
    OnCooldown(AbilityId),

    /// Passive abilities are applied by the server and cannot be used.
    #[error("{0} is passive")]
    PassiveAbility(AbilityId),

    /// The player does not hold this ability.
    #[error("{0} is not owned")]
    AbilityNotOwned(AbilityId),

    /// The player does not hold this chance card.
    #[error("{0} is not owned")]
    ChanceNotOwned(ChanceId),

    /// A cat has already been bound for this match.
    #[error("cat already selected")]
    CatAlreadySelected,

    #[error("unknown {0}")]
    UnknownCat(CatId),

    #[error("unknown {0}")]
    UnknownAbility(AbilityId),

    #[error("unknown {0}")]
    UnknownChance(ChanceId),

    /// A third ability was granted.
    #[error("ability slots full")]
    AbilitySlotsFull,

    /// The match has already been won or lost.
    #[error("match is over")]
    MatchOver,

    /// The catalog data is inconsistent.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("catalog is not valid JSON: {0}")]
    CatalogJson(#[from] serde_json::Error),
}
