//! The flag table.
//!
//! Every frame starts with a single flag byte that names the message. The
//! numbering is fixed by the server and falls into three blocks:
//!
//! | Range    | Meaning                                          |
//! |----------|--------------------------------------------------|
//! | 0..=9    | account and lobby operations                     |
//! | 49..=59  | informational pushes during a match              |
//! | 98..=103 | turn flow and the player's in-match actions      |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// How a frame body is interpreted.
///
/// Bodies are not self-describing, so the receiver picks an
/// interpretation from the flag before touching the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// No body. Any bytes present are ignored.
    Empty,
    /// A single small integer in the first byte. An empty body is also
    /// legal and usually means "rejected" or "nothing found".
    Int,
    /// UTF-8 text.
    Text,
    /// A sequence of small integers, one per byte.
    Ints,
}

/// A message type on the game connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Flag {
    Login = 0,
    Logout = 1,
    FindMatch = 2,
    UserProfile = 3,
    AllCards = 4,
    CatCards = 5,
    BasicCards = 6,
    ChanceCards = 7,
    AbilityCards = 8,
    EndMatch = 9,

    OpponentCatReveal = 49,
    SelfHealthUpdate = 50,
    OpponentHealthUpdate = 51,
    DamageModified = 52,
    OpponentDamageModified = 53,
    GainChance = 54,
    OpponentGainChance = 55,
    RandomAbilityGrant = 56,
    GainChances = 57,
    RevealOpponentMove = 58,
    RevealOpponentChance = 59,

    AdvancePhase = 98,
    Ready = 99,
    SelectCat = 100,
    UseAbility = 101,
    SelectMove = 102,
    SelectChanceCard = 103,
}

impl Flag {
    /// Every flag, in wire order.
    pub const ALL: [Flag; 27] = [
        Self::Login,
        Self::Logout,
        Self::FindMatch,
        Self::UserProfile,
        Self::AllCards,
        Self::CatCards,
        Self::BasicCards,
        Self::ChanceCards,
        Self::AbilityCards,
        Self::EndMatch,
        Self::OpponentCatReveal,
        Self::SelfHealthUpdate,
        Self::OpponentHealthUpdate,
        Self::DamageModified,
        Self::OpponentDamageModified,
        Self::GainChance,
        Self::OpponentGainChance,
        Self::RandomAbilityGrant,
        Self::GainChances,
        Self::RevealOpponentMove,
        Self::RevealOpponentChance,
        Self::AdvancePhase,
        Self::Ready,
        Self::SelectCat,
        Self::UseAbility,
        Self::SelectMove,
        Self::SelectChanceCard,
    ];

    /// The byte that goes on the wire.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// How the body of a server-to-client frame with this flag is read.
    pub fn body_kind(self) -> BodyKind {
        match self {
            Self::AdvancePhase | Self::Ready => BodyKind::Empty,
            Self::UserProfile => BodyKind::Text,
            Self::AllCards
            | Self::CatCards
            | Self::BasicCards
            | Self::ChanceCards
            | Self::AbilityCards
            | Self::GainChances => BodyKind::Ints,
            _ => BodyKind::Int,
        }
    }

    /// How the body of a client-to-server request with this flag is read.
    ///
    /// Requests differ from responses for `Login` (the request carries
    /// the username, the response a success byte) and for the lobby
    /// queries, which carry no payload at all.
    pub fn request_body_kind(self) -> BodyKind {
        match self {
            Self::Login => BodyKind::Text,
            Self::SelectCat
            | Self::UseAbility
            | Self::SelectMove
            | Self::SelectChanceCard => BodyKind::Int,
            _ => BodyKind::Empty,
        }
    }

    /// Returns `true` if the client ever sends this flag.
    pub fn is_client_request(self) -> bool {
        matches!(
            self,
            Self::Login
                | Self::Logout
                | Self::FindMatch
                | Self::UserProfile
                | Self::AllCards
                | Self::CatCards
                | Self::BasicCards
                | Self::ChanceCards
                | Self::AbilityCards
                | Self::EndMatch
                | Self::Ready
                | Self::SelectCat
                | Self::UseAbility
                | Self::SelectMove
                | Self::SelectChanceCard
        )
    }
}

impl TryFrom<u8> for Flag {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|flag| flag.as_u8() == byte)
            .ok_or(ProtocolError::UnknownFlag(byte))
    }
}

impl From<Flag> for u8 {
    fn from(flag: Flag) -> Self {
        flag.as_u8()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.as_u8())
    }
}
