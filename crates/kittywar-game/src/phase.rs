//! The six turn phases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The phase a match is currently in.
///
/// Transitions are strictly ordered, and after the first round the last
/// phase wraps back to the first:
///
/// ```text
/// BeforeGame → Prelude → EnactingStrategies → ShowingCards
///            → StrategySettlement → Postlude → Prelude → ...
/// ```
///
/// - **BeforeGame**: cat selection. Only ever the initial phase.
/// - **Prelude**: phase-triggered abilities may be used.
/// - **EnactingStrategies**: players commit a move and optionally a
///   chance card.
/// - **ShowingCards**: the server reveals the opponent's choices.
/// - **StrategySettlement**: damage and healing are applied.
/// - **Postlude**: end-of-round effects; the next advance starts a new
///   round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TurnPhase {
    #[default]
    BeforeGame,
    Prelude,
    EnactingStrategies,
    ShowingCards,
    StrategySettlement,
    Postlude,
}

impl TurnPhase {
    /// The position of the phase, 0 through 5.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::BeforeGame => 0,
            Self::Prelude => 1,
            Self::EnactingStrategies => 2,
            Self::ShowingCards => 3,
            Self::StrategySettlement => 4,
            Self::Postlude => 5,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::BeforeGame),
            1 => Some(Self::Prelude),
            2 => Some(Self::EnactingStrategies),
            3 => Some(Self::ShowingCards),
            4 => Some(Self::StrategySettlement),
            5 => Some(Self::Postlude),
            _ => None,
        }
    }

    /// Human-readable name, as shown to players.
    pub fn label(self) -> &'static str {
        match self {
            Self::BeforeGame => "Before Game",
            Self::Prelude => "Prelude",
            Self::EnactingStrategies => "Enacting Strategies",
            Self::ShowingCards => "Showing Cards",
            Self::StrategySettlement => "Strategy Settlement",
            Self::Postlude => "Postlude",
        }
    }

    /// The phase that follows this one. Never returns `BeforeGame`.
    pub fn next(self) -> Self {
        match self {
            Self::BeforeGame => Self::Prelude,
            Self::Prelude => Self::EnactingStrategies,
            Self::EnactingStrategies => Self::ShowingCards,
            Self::ShowingCards => Self::StrategySettlement,
            Self::StrategySettlement => Self::Postlude,
            Self::Postlude => Self::Prelude,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == target
    }

    /// Returns `true` once the match has left cat selection.
    pub fn is_in_round(self) -> bool {
        self != Self::BeforeGame
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_phase_next_wraps_postlude_to_prelude() {
        assert_eq!(TurnPhase::BeforeGame.next(), TurnPhase::Prelude);
        assert_eq!(TurnPhase::Prelude.next(), TurnPhase::EnactingStrategies);
        assert_eq!(TurnPhase::EnactingStrategies.next(), TurnPhase::ShowingCards);
        assert_eq!(TurnPhase::ShowingCards.next(), TurnPhase::StrategySettlement);
        assert_eq!(TurnPhase::StrategySettlement.next(), TurnPhase::Postlude);
        assert_eq!(TurnPhase::Postlude.next(), TurnPhase::Prelude);
    }

    #[test]
    fn test_turn_phase_never_returns_to_before_game() {
        let mut phase = TurnPhase::BeforeGame;
        for _ in 0..20 {
            phase = phase.next();
            assert_ne!(phase, TurnPhase::BeforeGame);
        }
    }

    #[test]
    fn test_turn_phase_ordinal_round_trips() {
        for ordinal in 0..6 {
            let phase = TurnPhase::from_ordinal(ordinal).unwrap();
            assert_eq!(phase.ordinal(), ordinal);
        }
        assert_eq!(TurnPhase::from_ordinal(6), None);
    }

    #[test]
    fn test_turn_phase_can_transition_to() {
        assert!(TurnPhase::Postlude.can_transition_to(TurnPhase::Prelude));
        assert!(!TurnPhase::Prelude.can_transition_to(TurnPhase::ShowingCards));
        assert!(!TurnPhase::Postlude.can_transition_to(TurnPhase::BeforeGame));
    }

    #[test]
    fn test_turn_phase_display_uses_label() {
        assert_eq!(TurnPhase::EnactingStrategies.to_string(), "Enacting Strategies");
        assert_eq!(TurnPhase::default(), TurnPhase::BeforeGame);
    }
}
