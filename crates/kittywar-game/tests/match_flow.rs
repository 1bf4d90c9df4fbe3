//! Drives whole matches through the public API: local actions go in,
//! scripted server frames come back through `dispatch`.

use std::sync::Arc;

use kittywar_game::{
    dispatch, AbilityId, Catalog, CatId, ChanceId, Cooldown, GameError, MatchState, Move,
    Notification, Outbound, Outcome, PhaseEvent, TurnPhase, WIN_HEALTH,
};
use kittywar_protocol::{Body, Flag, Frame};

// =========================================================================
// Helpers
// =========================================================================

fn new_match() -> MatchState {
    MatchState::new(Arc::new(Catalog::standard()), WIN_HEALTH)
}

fn advance(state: &mut MatchState) -> Option<Notification> {
    dispatch(state, &Frame::empty(Flag::AdvancePhase)).notification
}

fn advance_to(state: &mut MatchState, phase: TurnPhase) {
    while state.phase() != phase {
        advance(state);
    }
}

/// Cat selected, game started, opponent revealed, Critical Hit granted.
fn started_match() -> MatchState {
    let mut state = new_match();
    dispatch(&mut state, &Frame::int(Flag::FindMatch, 1));
    state.select_cat(CatId(0)).unwrap();
    let confirm = dispatch(&mut state, &Frame::int(Flag::SelectCat, 1));
    assert_eq!(confirm.reply, Some(Outbound::bare(Flag::Ready)));

    advance(&mut state);
    dispatch(&mut state, &Frame::int(Flag::OpponentCatReveal, 1));
    dispatch(&mut state, &Frame::int(Flag::RandomAbilityGrant, 7));
    dispatch(&mut state, &Frame::new(Flag::GainChances, Body::Ints(vec![2, 5])));
    state
}

// =========================================================================
// Tests
// =========================================================================

#[test]
fn test_started_match_has_expected_setup() {
    let state = started_match();
    assert_eq!(state.phase(), TurnPhase::Prelude);
    assert_eq!(state.player().health(), 10);
    assert_eq!(state.player().abilities(), &[AbilityId(0), AbilityId(7)]);
    assert_eq!(state.player().cooldown(), Cooldown::READY);
    assert_eq!(state.player().chance_cards(), &[ChanceId(2), ChanceId(5)]);
    assert_eq!(state.opponent().health(), 5);
}

#[test]
fn test_phase_sequence_has_no_skips() {
    let mut state = started_match();
    let mut seen = vec![state.phase()];
    for _ in 0..12 {
        match advance(&mut state) {
            Some(Notification::Phase(PhaseEvent::Changed { phase, .. })) => seen.push(phase),
            other => panic!("unexpected {other:?}"),
        }
    }
    let cycle = [
        TurnPhase::Prelude,
        TurnPhase::EnactingStrategies,
        TurnPhase::ShowingCards,
        TurnPhase::StrategySettlement,
        TurnPhase::Postlude,
    ];
    for (i, phase) in seen.iter().enumerate() {
        assert_eq!(*phase, cycle[i % cycle.len()], "position {i}");
    }
}

#[test]
fn test_full_round_with_ability_move_and_chance() {
    let mut state = started_match();

    state.use_ability(AbilityId(7)).unwrap();
    dispatch(&mut state, &Frame::int(Flag::UseAbility, 1));
    assert_eq!(state.player().cooldown(), Cooldown::USED);

    advance(&mut state);
    state.select_move(Move::Scratch).unwrap();
    dispatch(&mut state, &Frame::int(Flag::SelectMove, 1));
    state.select_chance_card(ChanceId(5)).unwrap();
    dispatch(&mut state, &Frame::int(Flag::SelectChanceCard, 1));

    assert_eq!(state.player().chance_cards(), &[ChanceId(2)]);
    assert_eq!(
        state.strategy().describe(),
        "Critical Hit + Scratch + Guard and Draw"
    );

    advance_to(&mut state, TurnPhase::Postlude);
    dispatch(&mut state, &Frame::int(Flag::OpponentHealthUpdate, 3));
    advance(&mut state);

    assert_eq!(state.phase(), TurnPhase::Prelude);
    assert_eq!(state.player().cooldown().value(), 5);
    assert_eq!(state.strategy().describe(), "No strategy");
    assert!(matches!(
        state.use_ability(AbilityId(7)),
        Err(GameError::OnCooldown(_))
    ));
}

#[test]
fn test_cooldown_only_moves_at_round_boundaries() {
    let mut state = started_match();
    state.use_ability(AbilityId(7)).unwrap();
    dispatch(&mut state, &Frame::int(Flag::UseAbility, 1));

    let mut history = Vec::new();
    for _ in 0..15 {
        let before = state.phase();
        advance(&mut state);
        history.push((before, state.player().cooldown().value()));
    }
    for window in history.windows(2) {
        let ((_, prev), (from, next)) = (window[0], window[1]);
        if from != TurnPhase::Postlude {
            assert_eq!(prev, next, "cooldown moved outside a round boundary");
        }
        assert!(next >= prev, "cooldown regressed");
    }
    assert!(state.player().cooldown().is_ready());
}

#[test]
fn test_rejected_selections_change_nothing() {
    let mut state = started_match();
    advance(&mut state);
    let before_player = state.player().chance_cards().to_vec();

    state.select_chance_card(ChanceId(2)).unwrap();
    dispatch(&mut state, &Frame::int(Flag::SelectChanceCard, 0));
    state.select_move(Move::Guard).unwrap();
    dispatch(&mut state, &Frame::int(Flag::SelectMove, 0));

    assert_eq!(state.player().chance_cards(), before_player.as_slice());
    assert!(state.strategy().is_empty());
}

#[test]
fn test_win_when_opponent_reaches_zero() {
    let mut state = started_match();
    dispatch(&mut state, &Frame::int(Flag::OpponentHealthUpdate, 0));
    assert_eq!(
        advance(&mut state),
        Some(Notification::Phase(PhaseEvent::Decided(Outcome::Won)))
    );
    assert_eq!(state.outcome(), Some(Outcome::Won));
    assert_eq!(advance(&mut state), None);
}

#[test]
fn test_lose_takes_precedence_over_win() {
    let mut state = started_match();
    dispatch(&mut state, &Frame::int(Flag::SelfHealthUpdate, 0));
    dispatch(&mut state, &Frame::int(Flag::OpponentHealthUpdate, WIN_HEALTH));
    assert_eq!(
        advance(&mut state),
        Some(Notification::Phase(PhaseEvent::Decided(Outcome::Lost)))
    );
}

#[test]
fn test_healing_to_threshold_wins() {
    let mut state = started_match();
    dispatch(&mut state, &Frame::int(Flag::SelfHealthUpdate, WIN_HEALTH));
    assert_eq!(
        advance(&mut state),
        Some(Notification::Phase(PhaseEvent::Decided(Outcome::Won)))
    );
    assert!(matches!(state.select_move(Move::Purr), Err(GameError::MatchOver)));
}

#[test]
fn test_end_match_discards_state() {
    let mut state = started_match();
    dispatch(&mut state, &Frame::int(Flag::EndMatch, 1));
    assert_eq!(state.phase(), TurnPhase::BeforeGame);
    assert_eq!(state.player().cat(), None);
    assert!(state.player().chance_cards().is_empty());
}
