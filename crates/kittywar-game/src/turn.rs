//! The turn state machine.
//!
//! The server drives every transition with an "advance phase" frame. The
//! machine's job is to decide what that frame means locally: whether the
//! match just ended, which phase comes next, and what resets at a round
//! boundary.

use serde::{Deserialize, Serialize};

use crate::state::{PlayerState, RoundStrategy};
use crate::{GameError, TurnPhase};

/// Health that wins the match when a player heals up to it (and loses it
/// when the opponent does). Larger than any cat's starting health.
pub const WIN_HEALTH: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// The result of one advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The match moved on. `new_round` is set when Postlude wrapped to
    /// Prelude.
    Advanced {
        from: TurnPhase,
        to: TurnPhase,
        new_round: bool,
    },
    /// A terminal condition held, so the phase did not change.
    Decided(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnStateMachine {
    phase: TurnPhase,
    round: u32,
    win_health: u8,
    outcome: Option<Outcome>,
}

impl TurnStateMachine {
    pub fn new(win_health: u8) -> Self {
        Self {
            phase: TurnPhase::BeforeGame,
            round: 0,
            win_health,
            outcome: None,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Rounds started so far. Zero until the first Prelude.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn win_health(&self) -> u8 {
        self.win_health
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Checks the terminal conditions. Health values are `None` until the
    /// server has confirmed them (cat not yet bound or revealed); an
    /// unknown side never triggers a condition.
    ///
    /// Losing is checked first, so a simultaneous "self at 0" and
    /// "opponent at the win threshold" is a loss, and so is "self at 0"
    /// with "opponent at 0".
    pub fn evaluate(&self, own: Option<u8>, opponent: Option<u8>) -> Option<Outcome> {
        if own == Some(0) || opponent == Some(self.win_health) {
            return Some(Outcome::Lost);
        }
        if own == Some(self.win_health) || opponent == Some(0) {
            return Some(Outcome::Won);
        }
        None
    }

    /// Applies one "advance phase" frame.
    ///
    /// On a Postlude → Prelude wrap the granted ability's cooldown
    /// recharges one stage and the round's strategy description is
    /// cleared.
    pub(crate) fn advance(
        &mut self,
        player: &mut PlayerState,
        opponent_health: Option<u8>,
        strategy: &mut RoundStrategy,
    ) -> Result<Transition, GameError> {
        if self.is_finished() {
            return Err(GameError::MatchOver);
        }

        if let Some(outcome) = self.evaluate(player.confirmed_health(), opponent_health) {
            self.outcome = Some(outcome);
            tracing::info!(?outcome, phase = %self.phase, "match decided");
            return Ok(Transition::Decided(outcome));
        }

        let from = self.phase;
        let to = from.next();
        debug_assert!(from.can_transition_to(to));
        let new_round = from == TurnPhase::Postlude;

        if new_round {
            if player.cooldown.recharge() {
                tracing::debug!(cooldown = %player.cooldown, "cooldown recharged");
            }
            strategy.clear();
        }
        if to == TurnPhase::Prelude {
            self.round += 1;
        }
        self.phase = to;

        Ok(Transition::Advanced {
            from,
            to,
            new_round,
        })
    }
}

impl Default for TurnStateMachine {
    fn default() -> Self {
        Self::new(WIN_HEALTH)
    }
}
