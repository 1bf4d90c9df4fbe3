//! Local player actions.
//!
//! Each method checks its preconditions against the current state,
//! records the selection as pending, and returns the request to send.
//! Nothing but the pending slot changes until the server confirms.

use kittywar_protocol::Flag;

use crate::events::Outbound;
use crate::{
    AbilityId, AbilityTrigger, CatId, ChanceId, GameError, MatchState, Move,
    TurnPhase,
};

impl MatchState {
    fn ensure_running(&self) -> Result<(), GameError> {
        if self.turn.is_finished() {
            return Err(GameError::MatchOver);
        }
        Ok(())
    }

    fn ensure_phase(&self, action: &'static str, required: TurnPhase) -> Result<(), GameError> {
        let current = self.phase();
        if current != required {
            return Err(GameError::WrongPhase {
                action,
                required,
                current,
            });
        }
        Ok(())
    }

    /// Picks a cat. Only allowed before the first round, once.
    pub fn select_cat(&mut self, cat: CatId) -> Result<Outbound, GameError> {
        self.ensure_running()?;
        self.ensure_phase("select cat", TurnPhase::BeforeGame)?;
        if self.player.cat.is_some() {
            return Err(GameError::CatAlreadySelected);
        }
        self.catalog.cat(cat)?;

        self.player.pending.cat = Some(cat);
        Ok(Outbound::with_id(Flag::SelectCat, cat.0))
    }

    /// Activates an owned, phase-triggered ability.
    ///
    /// The granted ability must also be fully recharged.
    pub fn use_ability(&mut self, ability: AbilityId) -> Result<Outbound, GameError> {
        self.ensure_running()?;
        if !self.player.owns_ability(ability) {
            return Err(GameError::AbilityNotOwned(ability));
        }
        let card = self.catalog.ability(ability)?;
        let required = match card.trigger {
            AbilityTrigger::Passive => return Err(GameError::PassiveAbility(ability)),
            AbilityTrigger::Phase(phase) => phase,
        };
        self.ensure_phase("use ability", required)?;
        if self.player.granted_ability() == Some(ability) && !self.player.cooldown.is_ready() {
            return Err(GameError::OnCooldown(ability));
        }

        self.player.pending.ability = Some(ability);
        Ok(Outbound::with_id(Flag::UseAbility, ability.0))
    }

    pub fn select_move(&mut self, movement: Move) -> Result<Outbound, GameError> {
        self.ensure_running()?;
        self.ensure_phase("select move", TurnPhase::EnactingStrategies)?;

        self.player.pending.movement = Some(movement);
        Ok(Outbound::with_id(Flag::SelectMove, movement.id()))
    }

    pub fn select_chance_card(&mut self, card: ChanceId) -> Result<Outbound, GameError> {
        self.ensure_running()?;
        self.ensure_phase("select chance card", TurnPhase::EnactingStrategies)?;
        if !self.player.owns_chance(card) {
            return Err(GameError::ChanceNotOwned(card));
        }

        self.player.pending.chance = Some(card);
        Ok(Outbound::with_id(Flag::SelectChanceCard, card.0))
    }

    /// Forgets a pending selection whose request never left the client.
    pub fn cancel_pending(&mut self, flag: Flag) {
        let pending = &mut self.player.pending;
        match flag {
            Flag::SelectCat => pending.cat = None,
            Flag::UseAbility => pending.ability = None,
            Flag::SelectMove => pending.movement = None,
            Flag::SelectChanceCard => pending.chance = None,
            _ => {}
        }
    }
}
