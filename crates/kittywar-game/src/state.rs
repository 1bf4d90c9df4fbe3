//! Per-match state for both players.

use std::sync::Arc;

use crate::turn::Transition;
use crate::{
    AbilityId, Catalog, CatId, ChanceId, Cooldown, GameError, Move, Outcome,
    TurnPhase, TurnStateMachine,
};

/// Inborn ability plus at most one granted ability.
pub const MAX_ABILITIES: usize = 2;

/// Local selections sent to the server and not yet confirmed.
///
/// A pending selection is only turned into real state when the
/// confirming reply arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSelections {
    pub cat: Option<CatId>,
    pub ability: Option<AbilityId>,
    pub movement: Option<Move>,
    pub chance: Option<ChanceId>,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerState {
    pub(crate) cat: Option<CatId>,
    pub(crate) health: u8,
    pub(crate) abilities: Vec<AbilityId>,
    pub(crate) cooldown: Cooldown,
    pub(crate) chance_cards: Vec<ChanceId>,
    pub(crate) pending: PendingSelections,
}

impl PlayerState {
    pub fn cat(&self) -> Option<CatId> {
        self.cat
    }

    /// Last health value the server reported.
    pub fn health(&self) -> u8 {
        self.health
    }

    /// Health, once a cat is bound.
    pub fn confirmed_health(&self) -> Option<u8> {
        self.cat.map(|_| self.health)
    }

    pub fn abilities(&self) -> &[AbilityId] {
        &self.abilities
    }

    pub fn inborn_ability(&self) -> Option<AbilityId> {
        self.abilities.first().copied()
    }

    pub fn granted_ability(&self) -> Option<AbilityId> {
        self.abilities.get(1).copied()
    }

    pub fn cooldown(&self) -> Cooldown {
        self.cooldown
    }

    pub fn chance_cards(&self) -> &[ChanceId] {
        &self.chance_cards
    }

    pub fn owns_chance(&self, id: ChanceId) -> bool {
        self.chance_cards.contains(&id)
    }

    pub fn owns_ability(&self, id: AbilityId) -> bool {
        self.abilities.contains(&id)
    }

    pub fn pending(&self) -> &PendingSelections {
        &self.pending
    }

    /// Fails if no slot is left for a granted ability. Until the cat is
    /// confirmed one slot stays reserved for its inborn ability.
    pub(crate) fn check_free_slot(&self) -> Result<(), GameError> {
        let reserved = usize::from(self.cat.is_none());
        if self.abilities.len() + reserved >= MAX_ABILITIES {
            return Err(GameError::AbilitySlotsFull);
        }
        Ok(())
    }

    /// Removes the first card with this id. Returns `false` if none was
    /// held.
    pub(crate) fn remove_chance(&mut self, id: ChanceId) -> bool {
        match self.chance_cards.iter().position(|c| *c == id) {
            Some(index) => {
                self.chance_cards.remove(index);
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Opponent
// ---------------------------------------------------------------------------

/// What the server has revealed about the opponent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpponentState {
    pub(crate) cat: Option<CatId>,
    pub(crate) health: u8,
    pub(crate) inborn_ability: Option<AbilityId>,
    pub(crate) revealed_move: Option<Move>,
    pub(crate) revealed_chance: Option<ChanceId>,
    pub(crate) chance_count: u32,
}

impl OpponentState {
    pub fn cat(&self) -> Option<CatId> {
        self.cat
    }

    pub fn health(&self) -> u8 {
        self.health
    }

    pub fn confirmed_health(&self) -> Option<u8> {
        self.cat.map(|_| self.health)
    }

    pub fn inborn_ability(&self) -> Option<AbilityId> {
        self.inborn_ability
    }

    pub fn revealed_move(&self) -> Option<Move> {
        self.revealed_move
    }

    pub fn revealed_chance(&self) -> Option<ChanceId> {
        self.revealed_chance
    }

    /// Chance cards the opponent has been dealt one at a time.
    pub fn chance_count(&self) -> u32 {
        self.chance_count
    }
}

// ---------------------------------------------------------------------------
// Round strategy
// ---------------------------------------------------------------------------

/// The player's confirmed choices for the current round, as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundStrategy {
    pub ability: String,
    pub movement: String,
    pub chance: String,
}

impl RoundStrategy {
    pub fn is_empty(&self) -> bool {
        self.ability.is_empty() && self.movement.is_empty() && self.chance.is_empty()
    }

    /// `"Critical Hit + Scratch + Double Scratch"`, or `"No strategy"`.
    pub fn describe(&self) -> String {
        let parts: Vec<&str> = [&self.ability, &self.movement, &self.chance]
            .into_iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            "No strategy".to_string()
        } else {
            parts.join(" + ")
        }
    }

    pub(crate) fn clear(&mut self) {
        self.ability.clear();
        self.movement.clear();
        self.chance.clear();
    }
}

// ---------------------------------------------------------------------------
// MatchState
// ---------------------------------------------------------------------------

/// Everything the client knows about one match.
///
/// Only the dispatcher (for server frames) and the local action methods
/// (for player intents) mutate it. Cloning gives a consistent snapshot.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) turn: TurnStateMachine,
    pub(crate) player: PlayerState,
    pub(crate) opponent: OpponentState,
    pub(crate) strategy: RoundStrategy,
}

impl MatchState {
    pub fn new(catalog: Arc<Catalog>, win_health: u8) -> Self {
        Self {
            catalog,
            turn: TurnStateMachine::new(win_health),
            player: PlayerState::default(),
            opponent: OpponentState::default(),
            strategy: RoundStrategy::default(),
        }
    }

    /// Discards the match and starts over at `BeforeGame`.
    pub fn reset(&mut self) {
        *self = Self::new(Arc::clone(&self.catalog), self.turn.win_health());
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase()
    }

    pub fn turn(&self) -> &TurnStateMachine {
        &self.turn
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.turn.outcome()
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn opponent(&self) -> &OpponentState {
        &self.opponent
    }

    pub fn strategy(&self) -> &RoundStrategy {
        &self.strategy
    }

    /// Applies an "advance phase" frame.
    pub fn advance_phase(&mut self) -> Result<Transition, GameError> {
        self.turn.advance(
            &mut self.player,
            self.opponent.confirmed_health(),
            &mut self.strategy,
        )
    }
}
