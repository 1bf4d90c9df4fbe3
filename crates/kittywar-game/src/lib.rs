//! Match logic for KittyWar.
//!
//! Everything in this crate is synchronous and free of I/O. The client
//! crate owns the socket and feeds frames in; this crate decides what
//! they mean.
//!
//! # Key types
//!
//! - [`Catalog`] — read-only card tables (cats, abilities, chance cards)
//! - [`TurnPhase`] / [`TurnStateMachine`] — the six-phase round cycle,
//!   win/lose evaluation, and round-boundary resets
//! - [`MatchState`] — player and opponent records for one match
//! - [`dispatch`] — applies a server frame to a `MatchState`
//! - [`PhaseEvent`] / [`SessionEvent`] — typed notifications

mod actions;
mod catalog;
mod cooldown;
mod dispatcher;
mod error;
mod events;
mod phase;
mod state;
mod turn;

pub use catalog::{
    AbilityCard, AbilityId, AbilityTrigger, CatCard, CatId, Catalog, ChanceCard,
    ChanceCategory, ChanceId, Move,
};
pub use cooldown::Cooldown;
pub use dispatcher::dispatch;
pub use error::GameError;
pub use events::{
    ActionKind, Dispatch, Notification, Outbound, PhaseEvent, RejectReason, SessionEvent, Side,
};
pub use phase::TurnPhase;
pub use state::{
    MatchState, OpponentState, PendingSelections, PlayerState, RoundStrategy, MAX_ABILITIES,
};
pub use turn::{Outcome, Transition, TurnStateMachine, WIN_HEALTH};
