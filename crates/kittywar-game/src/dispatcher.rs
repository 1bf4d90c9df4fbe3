//! Inbound frame dispatch.
//!
//! [`dispatch`] is the single entry point through which server frames
//! change a [`MatchState`]. It never does I/O: the caller sends any
//! [`Dispatch::reply`] and forwards the notification.
//!
//! Selection replies carry `1` for accepted and `0` (or nothing) for
//! rejected. A rejection clears the pending selection and leaves
//! everything else untouched.

use kittywar_protocol::{Body, Flag, Frame};

use crate::events::{ActionKind, Dispatch, Outbound, PhaseEvent, RejectReason, SessionEvent, Side};
use crate::state::MAX_ABILITIES;
use crate::turn::Transition;
use crate::{AbilityId, CatId, ChanceId, MatchState, Move};

/// Applies one server frame to the match.
pub fn dispatch(state: &mut MatchState, frame: &Frame) -> Dispatch {
    tracing::debug!(flag = %frame.flag, body_len = frame.body.len(), "dispatching frame");

    match frame.flag {
        Flag::FindMatch => on_find_match(state, &frame.body),
        Flag::SelectCat => on_select_cat(state, &frame.body),
        Flag::AdvancePhase => on_advance_phase(state),
        Flag::OpponentCatReveal => with_int(frame, |n| on_opponent_cat(state, CatId(n))),
        Flag::RandomAbilityGrant => with_int(frame, |n| on_ability_granted(state, AbilityId(n))),
        Flag::GainChances => on_gain_chances(state, &frame.body),
        Flag::GainChance => with_int(frame, |n| {
            state.player.chance_cards.push(ChanceId(n));
            Dispatch::session(SessionEvent::ChanceCardGained { card: ChanceId(n) })
        }),
        Flag::OpponentGainChance => {
            state.opponent.chance_count = state.opponent.chance_count.saturating_add(1);
            Dispatch::session(SessionEvent::OpponentGainedChance {
                total: state.opponent.chance_count,
            })
        }
        Flag::UseAbility => on_use_ability(state, &frame.body),
        Flag::SelectMove => on_select_move(state, &frame.body),
        Flag::SelectChanceCard => on_select_chance(state, &frame.body),
        Flag::RevealOpponentMove => with_int(frame, |n| match Move::from_id(n) {
            Some(movement) => {
                state.opponent.revealed_move = Some(movement);
                Dispatch::session(SessionEvent::OpponentMoveRevealed { movement })
            }
            None => {
                tracing::warn!(id = n, "opponent revealed an unknown move");
                Dispatch::none()
            }
        }),
        Flag::RevealOpponentChance => with_int(frame, |n| {
            state.opponent.revealed_chance = Some(ChanceId(n));
            Dispatch::session(SessionEvent::OpponentChanceRevealed { card: ChanceId(n) })
        }),
        Flag::SelfHealthUpdate => with_int(frame, |health| {
            state.player.health = health;
            Dispatch::session(SessionEvent::HealthChanged {
                side: Side::Player,
                health,
            })
        }),
        Flag::OpponentHealthUpdate => with_int(frame, |health| {
            state.opponent.health = health;
            Dispatch::session(SessionEvent::HealthChanged {
                side: Side::Opponent,
                health,
            })
        }),
        Flag::DamageModified => with_int(frame, |value| {
            Dispatch::session(SessionEvent::DamageModified {
                side: Side::Player,
                value,
            })
        }),
        Flag::OpponentDamageModified => with_int(frame, |value| {
            Dispatch::session(SessionEvent::DamageModified {
                side: Side::Opponent,
                value,
            })
        }),
        Flag::UserProfile => match &frame.body {
            Body::Text(profile) => Dispatch::session(SessionEvent::ProfileReceived {
                profile: profile.clone(),
            }),
            _ => malformed(frame),
        },
        Flag::AllCards
        | Flag::CatCards
        | Flag::BasicCards
        | Flag::ChanceCards
        | Flag::AbilityCards => match frame.body.as_ints() {
            Some(ids) => Dispatch::session(SessionEvent::CardListReceived {
                list: frame.flag,
                ids: ids.to_vec(),
            }),
            None => malformed(frame),
        },
        Flag::EndMatch => {
            tracing::info!("match ended by server");
            state.reset();
            Dispatch::session(SessionEvent::MatchEnded)
        }
        Flag::Logout => Dispatch::session(SessionEvent::LoggedOut),
        Flag::Login | Flag::Ready => {
            tracing::debug!(flag = %frame.flag, "ignoring acknowledgement");
            Dispatch::none()
        }
    }
}

// ---- Helpers ----

fn with_int(frame: &Frame, apply: impl FnOnce(u8) -> Dispatch) -> Dispatch {
    match frame.body.as_int() {
        Some(n) => apply(n),
        None => malformed(frame),
    }
}

fn malformed(frame: &Frame) -> Dispatch {
    tracing::warn!(flag = %frame.flag, body = ?frame.body, "unexpected body, frame ignored");
    Dispatch::none()
}

fn rejected(action: ActionKind) -> Dispatch {
    tracing::info!(?action, "server rejected action");
    Dispatch::session(SessionEvent::ActionRejected {
        action,
        reason: RejectReason::Server,
    })
}

// ---- Lobby ----

fn on_find_match(state: &mut MatchState, body: &Body) -> Dispatch {
    if body.len() == 1 {
        if state.phase().is_in_round() {
            tracing::warn!(phase = %state.phase(), "new match found mid-round, discarding the old one");
        }
        tracing::info!("match found");
        state.reset();
        Dispatch::session(SessionEvent::MatchFound)
    } else {
        Dispatch::session(SessionEvent::MatchNotFound)
    }
}

// ---- Setup ----

fn on_select_cat(state: &mut MatchState, body: &Body) -> Dispatch {
    let pending = state.player.pending.cat.take();
    let echoed = body.as_int().map(CatId);

    if body.len() != 1 {
        return rejected(ActionKind::SelectCat);
    }
    let Some(cat) = pending.or(echoed) else {
        return rejected(ActionKind::SelectCat);
    };
    if state.player.cat.is_some() {
        tracing::warn!(%cat, "cat confirmed twice, ignoring");
        return Dispatch::none();
    }
    let (max_health, inborn) = match state.catalog.cat(cat) {
        Ok(card) => (card.max_health, card.inborn_ability),
        Err(e) => {
            tracing::warn!(error = %e, "confirmed cat is not in the catalog");
            return rejected(ActionKind::SelectCat);
        }
    };

    if state.player.abilities.len() >= MAX_ABILITIES {
        tracing::warn!(abilities = ?state.player.abilities, "too many abilities before cat, dropping extras");
        state.player.abilities.truncate(MAX_ABILITIES - 1);
    }
    state.player.cat = Some(cat);
    state.player.health = max_health;
    state.player.abilities.insert(0, inborn);
    tracing::info!(%cat, health = max_health, "cat selected");

    Dispatch::session(SessionEvent::CatSelected {
        cat,
        health: max_health,
        inborn_ability: inborn,
    })
    .with_reply(Outbound::bare(Flag::Ready))
}

fn on_opponent_cat(state: &mut MatchState, cat: CatId) -> Dispatch {
    let card = match state.catalog.cat(cat) {
        Ok(card) => card,
        Err(e) => {
            tracing::warn!(error = %e, "opponent revealed an unknown cat");
            return Dispatch::none();
        }
    };
    let (health, inborn_ability) = (card.max_health, card.inborn_ability);

    state.opponent.cat = Some(cat);
    state.opponent.health = health;
    state.opponent.inborn_ability = Some(inborn_ability);

    Dispatch::session(SessionEvent::OpponentRevealed {
        cat,
        health,
        inborn_ability,
    })
}

fn on_ability_granted(state: &mut MatchState, ability: AbilityId) -> Dispatch {
    if let Err(e) = state.player.check_free_slot() {
        tracing::warn!(%ability, error = %e, "ability grant ignored");
        return Dispatch::none();
    }
    let tracks_cooldown = match state.catalog.ability(ability) {
        Ok(card) => card.tracks_cooldown(),
        Err(e) => {
            tracing::warn!(error = %e, "granted ability is not in the catalog");
            return Dispatch::none();
        }
    };

    state.player.abilities.push(ability);
    if tracks_cooldown {
        state.player.cooldown.grant();
    }
    Dispatch::session(SessionEvent::AbilityGranted {
        ability,
        cooldown: state.player.cooldown,
    })
}

fn on_gain_chances(state: &mut MatchState, body: &Body) -> Dispatch {
    let Some(ids) = body.as_ints() else {
        return Dispatch::none();
    };
    let cards: Vec<ChanceId> = ids.iter().copied().map(ChanceId).collect();
    state.player.chance_cards = cards.clone();
    Dispatch::session(SessionEvent::ChanceCardsReplaced { cards })
}

// ---- Turn flow ----

fn on_advance_phase(state: &mut MatchState) -> Dispatch {
    match state.advance_phase() {
        Ok(Transition::Advanced { to, .. }) => {
            tracing::info!(phase = %to, round = state.turn.round(), "phase changed");
            Dispatch::phase(PhaseEvent::changed(to, state.turn.round()))
        }
        Ok(Transition::Decided(outcome)) => Dispatch::phase(PhaseEvent::Decided(outcome)),
        Err(e) => {
            tracing::warn!(error = %e, "advance after the match was decided, ignoring");
            Dispatch::none()
        }
    }
}

// ---- Selection replies ----

fn on_use_ability(state: &mut MatchState, body: &Body) -> Dispatch {
    let pending = state.player.pending.ability.take();
    if !body.is_accepted() {
        return rejected(ActionKind::UseAbility);
    }
    let Some(ability) = pending else {
        tracing::warn!("ability use confirmed with nothing pending");
        return Dispatch::none();
    };

    if state.player.granted_ability() == Some(ability) {
        state.player.cooldown.mark_used();
    }
    if let Ok(card) = state.catalog.ability(ability) {
        state.strategy.ability = card.title.clone();
    }
    Dispatch::session(SessionEvent::AbilityUsed {
        ability,
        strategy: state.strategy.describe(),
    })
}

fn on_select_move(state: &mut MatchState, body: &Body) -> Dispatch {
    let pending = state.player.pending.movement.take();
    if !body.is_accepted() {
        return rejected(ActionKind::SelectMove);
    }
    let Some(movement) = pending else {
        tracing::warn!("move confirmed with nothing pending");
        return Dispatch::none();
    };

    state.strategy.movement = movement.label().to_string();
    Dispatch::session(SessionEvent::MoveConfirmed {
        movement,
        strategy: state.strategy.describe(),
    })
}

fn on_select_chance(state: &mut MatchState, body: &Body) -> Dispatch {
    let pending = state.player.pending.chance.take();
    if !body.is_accepted() {
        return rejected(ActionKind::SelectChanceCard);
    }
    let Some(card) = pending else {
        tracing::warn!("chance card confirmed with nothing pending");
        return Dispatch::none();
    };

    if let Ok(chance) = state.catalog.chance(card) {
        state.strategy.chance = chance.title.clone();
    }
    if !state.player.remove_chance(card) {
        tracing::warn!(%card, "confirmed chance card was not held");
    }
    Dispatch::session(SessionEvent::ChanceCardConfirmed {
        card,
        strategy: state.strategy.describe(),
    })
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::events::Notification;
    use crate::{Catalog, Cooldown, TurnPhase, WIN_HEALTH};

    fn state() -> MatchState {
        MatchState::new(Arc::new(Catalog::standard()), WIN_HEALTH)
    }

    fn session(dispatch: Dispatch) -> SessionEvent {
        match dispatch.notification {
            Some(Notification::Session(event)) => event,
            other => panic!("expected session event, got {other:?}"),
        }
    }

    #[test]
    fn test_select_cat_confirmed_binds_and_queues_ready() {
        let mut state = state();
        state.select_cat(CatId(0)).unwrap();

        let out = dispatch(&mut state, &Frame::int(Flag::SelectCat, 1));

        assert_eq!(out.reply, Some(Outbound::bare(Flag::Ready)));
        assert_eq!(state.player().cat(), Some(CatId(0)));
        assert_eq!(state.player().health(), 10);
        assert_eq!(state.player().abilities(), &[AbilityId(0)]);
        assert_eq!(
            session(out),
            SessionEvent::CatSelected {
                cat: CatId(0),
                health: 10,
                inborn_ability: AbilityId(0)
            }
        );
    }

    #[test]
    fn test_select_cat_rejected_leaves_state_untouched() {
        let mut state = state();
        state.select_cat(CatId(1)).unwrap();

        let out = dispatch(&mut state, &Frame::empty(Flag::SelectCat));

        assert!(out.reply.is_none());
        assert!(matches!(session(out), SessionEvent::ActionRejected { action: ActionKind::SelectCat, .. }));
        assert_eq!(state.player().cat(), None);
        assert!(state.player().abilities().is_empty());
        assert_eq!(state.player().pending().cat, None);
    }

    #[test]
    fn test_gain_chances_replaces_set() {
        let mut state = state();
        state.player.chance_cards = vec![ChanceId(0), ChanceId(7)];

        dispatch(&mut state, &Frame::new(Flag::GainChances, Body::Ints(vec![2, 5])));

        assert_eq!(state.player().chance_cards(), &[ChanceId(2), ChanceId(5)]);
    }

    #[test]
    fn test_gain_chance_appends_one() {
        let mut state = state();
        state.player.chance_cards = vec![ChanceId(1)];
        dispatch(&mut state, &Frame::int(Flag::GainChance, 4));
        assert_eq!(state.player().chance_cards(), &[ChanceId(1), ChanceId(4)]);
    }

    #[test]
    fn test_random_ability_critical_hit_sets_ready() {
        let mut state = state();
        state.player.cat = Some(CatId(0));
        state.player.abilities = vec![AbilityId(0)];
        dispatch(&mut state, &Frame::int(Flag::RandomAbilityGrant, 7));
        assert_eq!(state.player().granted_ability(), Some(AbilityId(7)));
        assert_eq!(state.player().cooldown(), Cooldown::READY);
    }

    #[test]
    fn test_random_ability_passive_leaves_cooldown_unset() {
        let mut state = state();
        state.player.cat = Some(CatId(0));
        state.player.abilities = vec![AbilityId(0)];
        dispatch(&mut state, &Frame::int(Flag::RandomAbilityGrant, 6));
        assert_eq!(state.player().granted_ability(), Some(AbilityId(6)));
        assert_eq!(state.player().cooldown(), Cooldown::NOT_GRANTED);
    }

    #[test]
    fn test_random_ability_third_slot_ignored() {
        let mut state = state();
        state.player.cat = Some(CatId(0));
        state.player.abilities = vec![AbilityId(0), AbilityId(7)];
        let out = dispatch(&mut state, &Frame::int(Flag::RandomAbilityGrant, 6));
        assert!(out.notification.is_none());
        assert_eq!(state.player().abilities().len(), 2);
    }

    #[test]
    fn test_random_ability_before_cat_keeps_inborn_slot() {
        let mut state = state();
        state.select_cat(CatId(0)).unwrap();

        dispatch(&mut state, &Frame::int(Flag::RandomAbilityGrant, 7));
        let second = dispatch(&mut state, &Frame::int(Flag::RandomAbilityGrant, 6));
        assert!(second.notification.is_none());
        assert_eq!(state.player().abilities(), &[AbilityId(7)]);

        dispatch(&mut state, &Frame::int(Flag::SelectCat, 1));
        assert_eq!(state.player().abilities(), &[AbilityId(0), AbilityId(7)]);
        assert!(state.player().abilities().len() <= MAX_ABILITIES);
        assert_eq!(state.player().inborn_ability(), Some(AbilityId(0)));
        assert_eq!(state.player().granted_ability(), Some(AbilityId(7)));
    }

    #[test]
    fn test_select_cat_overfull_abilities_trimmed() {
        let mut state = state();
        state.player.abilities = vec![AbilityId(7), AbilityId(6)];
        state.select_cat(CatId(0)).unwrap();

        dispatch(&mut state, &Frame::int(Flag::SelectCat, 1));

        assert_eq!(state.player().abilities(), &[AbilityId(0), AbilityId(7)]);
    }

    #[test]
    fn test_use_ability_accepted_marks_used() {
        let mut state = state();
        state.player.abilities = vec![AbilityId(0), AbilityId(7)];
        state.player.cooldown = Cooldown::READY;
        state.player.pending.ability = Some(AbilityId(7));

        let out = dispatch(&mut state, &Frame::int(Flag::UseAbility, 1));

        assert_eq!(state.player().cooldown(), Cooldown::USED);
        assert_eq!(state.strategy().ability, "Critical Hit");
        assert!(matches!(session(out), SessionEvent::AbilityUsed { ability: AbilityId(7), .. }));
    }

    #[test]
    fn test_use_ability_rejected_keeps_cooldown() {
        let mut state = state();
        state.player.abilities = vec![AbilityId(0), AbilityId(7)];
        state.player.cooldown = Cooldown::READY;
        state.player.pending.ability = Some(AbilityId(7));

        dispatch(&mut state, &Frame::int(Flag::UseAbility, 0));

        assert_eq!(state.player().cooldown(), Cooldown::READY);
        assert!(state.strategy().ability.is_empty());
    }

    #[test]
    fn test_select_move_confirmed_sets_strategy() {
        let mut state = state();
        state.player.pending.movement = Some(Move::Scratch);

        let out = dispatch(&mut state, &Frame::int(Flag::SelectMove, 1));

        assert_eq!(
            session(out),
            SessionEvent::MoveConfirmed {
                movement: Move::Scratch,
                strategy: "Scratch".into()
            }
        );
    }

    #[test]
    fn test_select_chance_confirmed_removes_card() {
        let mut state = state();
        state.player.chance_cards = vec![ChanceId(2), ChanceId(8)];
        state.player.pending.chance = Some(ChanceId(8));

        dispatch(&mut state, &Frame::int(Flag::SelectChanceCard, 1));

        assert_eq!(state.player().chance_cards(), &[ChanceId(2)]);
        assert_eq!(state.strategy().chance, "Double Scratch");
    }

    #[test]
    fn test_select_chance_confirmed_missing_card_keeps_set() {
        let mut state = state();
        state.player.chance_cards = vec![ChanceId(2)];
        state.player.pending.chance = Some(ChanceId(5));

        let out = dispatch(&mut state, &Frame::int(Flag::SelectChanceCard, 1));

        assert!(out.notification.is_some());
        assert_eq!(state.player().chance_cards(), &[ChanceId(2)]);
    }

    #[test]
    fn test_opponent_reveals_do_not_touch_player() {
        let mut state = state();
        let before = state.player().clone();

        dispatch(&mut state, &Frame::int(Flag::OpponentCatReveal, 1));
        dispatch(&mut state, &Frame::int(Flag::RevealOpponentMove, 2));
        dispatch(&mut state, &Frame::int(Flag::RevealOpponentChance, 6));
        dispatch(&mut state, &Frame::empty(Flag::OpponentGainChance));

        assert_eq!(state.player(), &before);
        assert_eq!(state.opponent().cat(), Some(CatId(1)));
        assert_eq!(state.opponent().health(), 5);
        assert_eq!(state.opponent().inborn_ability(), Some(AbilityId(1)));
        assert_eq!(state.opponent().revealed_move(), Some(Move::Scratch));
        assert_eq!(state.opponent().revealed_chance(), Some(ChanceId(6)));
        assert_eq!(state.opponent().chance_count(), 1);
    }

    #[test]
    fn test_health_updates_are_taken_verbatim() {
        let mut state = state();
        dispatch(&mut state, &Frame::int(Flag::SelfHealthUpdate, 13));
        dispatch(&mut state, &Frame::int(Flag::OpponentHealthUpdate, 2));
        assert_eq!(state.player().health(), 13);
        assert_eq!(state.opponent().health(), 2);
    }

    #[test]
    fn test_advance_phase_emits_changed_event() {
        let mut state = state();
        let out = dispatch(&mut state, &Frame::empty(Flag::AdvancePhase));
        assert_eq!(
            out.notification,
            Some(Notification::Phase(PhaseEvent::Changed {
                phase: TurnPhase::Prelude,
                ordinal: 1,
                label: "Prelude",
                round: 1
            }))
        );
    }

    #[test]
    fn test_find_match_resets_state() {
        let mut state = state();
        state.player.health = 3;
        let out = dispatch(&mut state, &Frame::int(Flag::FindMatch, 1));
        assert_eq!(session(out), SessionEvent::MatchFound);
        assert_eq!(state.player().health(), 0);

        let out = dispatch(&mut state, &Frame::empty(Flag::FindMatch));
        assert_eq!(session(out), SessionEvent::MatchNotFound);
    }

    #[test]
    fn test_find_match_mid_round_starts_over() {
        let mut state = state();
        dispatch(&mut state, &Frame::empty(Flag::AdvancePhase));
        assert!(state.phase().is_in_round());

        dispatch(&mut state, &Frame::int(Flag::FindMatch, 1));

        assert_eq!(state.phase(), TurnPhase::BeforeGame);
        assert!(!state.phase().is_in_round());
        assert_eq!(state.turn().round(), 0);
    }

    #[test]
    fn test_missing_int_body_is_ignored() {
        let mut state = state();
        let out = dispatch(&mut state, &Frame::empty(Flag::SelfHealthUpdate));
        assert!(out.notification.is_none());
    }
}
