//! Typed notifications for the presentation layer.
//!
//! Each concern gets its own enum so subscribers can listen to exactly
//! what they render. None of these are coalesced: every transition and
//! every server frame that changes something yields its own event.

use kittywar_protocol::{AuthToken, Body, Flag, Request};

use crate::{AbilityId, CatId, ChanceId, Cooldown, Move, Outcome, TurnPhase};

/// Phase changes and the end of the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseEvent {
    Changed {
        phase: TurnPhase,
        ordinal: u8,
        label: &'static str,
        round: u32,
    },
    Decided(Outcome),
}

impl PhaseEvent {
    pub(crate) fn changed(phase: TurnPhase, round: u32) -> Self {
        Self::Changed {
            phase,
            ordinal: phase.ordinal(),
            label: phase.label(),
            round,
        }
    }

    /// Short banner text, e.g. `"2. Enacting Strategies Starts"`.
    pub fn banner(&self) -> String {
        match self {
            Self::Changed { ordinal, label, .. } => format!("{ordinal}. {label} Starts"),
            Self::Decided(Outcome::Won) => "You Win!".to_string(),
            Self::Decided(Outcome::Lost) => "You Lose!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Opponent,
}

/// The player action an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    FindMatch,
    SelectCat,
    UseAbility,
    SelectMove,
    SelectChanceCard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The server answered with a failure body.
    Server,
    /// The action was refused locally and never sent.
    Local(String),
}

/// Changes to the player and opponent records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MatchFound,
    MatchNotFound,
    CatSelected {
        cat: CatId,
        health: u8,
        inborn_ability: AbilityId,
    },
    OpponentRevealed {
        cat: CatId,
        health: u8,
        inborn_ability: AbilityId,
    },
    AbilityGranted {
        ability: AbilityId,
        cooldown: Cooldown,
    },
    ChanceCardsReplaced {
        cards: Vec<ChanceId>,
    },
    ChanceCardGained {
        card: ChanceId,
    },
    OpponentGainedChance {
        total: u32,
    },
    AbilityUsed {
        ability: AbilityId,
        strategy: String,
    },
    MoveConfirmed {
        movement: Move,
        strategy: String,
    },
    ChanceCardConfirmed {
        card: ChanceId,
        strategy: String,
    },
    ActionRejected {
        action: ActionKind,
        reason: RejectReason,
    },
    OpponentMoveRevealed {
        movement: Move,
    },
    OpponentChanceRevealed {
        card: ChanceId,
    },
    HealthChanged {
        side: Side,
        health: u8,
    },
    DamageModified {
        side: Side,
        value: u8,
    },
    ProfileReceived {
        profile: String,
    },
    CardListReceived {
        list: Flag,
        ids: Vec<u8>,
    },
    MatchEnded,
    LoggedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Phase(PhaseEvent),
    Session(SessionEvent),
}

/// A request the client should send, minus the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub flag: Flag,
    pub body: Body,
}

impl Outbound {
    pub fn bare(flag: Flag) -> Self {
        Self {
            flag,
            body: Body::Empty,
        }
    }

    pub fn with_id(flag: Flag, id: u8) -> Self {
        Self {
            flag,
            body: Body::Int(id),
        }
    }

    pub fn into_request(self, token: AuthToken) -> Request {
        Request::new(self.flag, token, self.body)
    }
}

/// What one inbound frame did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub notification: Option<Notification>,
    /// A request to send immediately in response.
    pub reply: Option<Outbound>,
}

impl Dispatch {
    pub(crate) fn none() -> Self {
        Self::default()
    }

    pub(crate) fn phase(event: PhaseEvent) -> Self {
        Self {
            notification: Some(Notification::Phase(event)),
            reply: None,
        }
    }

    pub(crate) fn session(event: SessionEvent) -> Self {
        Self {
            notification: Some(Notification::Session(event)),
            reply: None,
        }
    }

    pub(crate) fn with_reply(mut self, reply: Outbound) -> Self {
        self.reply = Some(reply);
        self
    }
}
