//! Typed frames and the session token.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BodyKind, Flag, ProtocolError};

/// Width of a server-to-client header: flag (1) + body length (3).
pub const HEADER_LEN: usize = 4;

/// Width of the session token carried by every request.
pub const TOKEN_LEN: usize = 24;

/// Width of a client-to-server header: flag (1) + token (24) + length (3).
pub const REQUEST_HEADER_LEN: usize = 1 + TOKEN_LEN + 3;

/// Largest body the 3-byte big-endian length field can describe.
pub const MAX_BODY_LEN: usize = (1 << 24) - 1;

// ---------------------------------------------------------------------------
// AuthToken
// ---------------------------------------------------------------------------

/// The session token issued by the web login endpoint.
///
/// The server expects exactly [`TOKEN_LEN`] bytes in every request
/// header, so the width is checked once here instead of being padded or
/// truncated at encode time. `Debug` output is redacted so tokens do not
/// end up in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a token, rejecting anything that is not exactly
    /// [`TOKEN_LEN`] bytes.
    pub fn new(token: impl Into<String>) -> Result<Self, ProtocolError> {
        let token = token.into();
        if token.len() != TOKEN_LEN {
            return Err(ProtocolError::InvalidToken(token.len()));
        }
        Ok(Self(token))
    }

    /// Builds a token from raw header bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let text = String::from_utf8(bytes.to_vec())?;
        Self::new(text)
    }

    /// The token as it appears on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AuthToken {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AuthToken> for String {
    fn from(token: AuthToken) -> Self {
        token.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// A decoded frame body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Body {
    Empty,
    Int(u8),
    Text(String),
    Ints(Vec<u8>),
}

impl Body {
    /// The kind this body encodes as.
    pub fn kind(&self) -> BodyKind {
        match self {
            Self::Empty => BodyKind::Empty,
            Self::Int(_) => BodyKind::Int,
            Self::Text(_) => BodyKind::Text,
            Self::Ints(_) => BodyKind::Ints,
        }
    }

    /// Returns `true` if this body may travel under a flag whose body kind
    /// is `kind`. An empty body is legal under `Int` (rejections carry no
    /// payload). An empty list is `Ints(vec![])`, never `Empty`.
    pub fn fits(&self, kind: BodyKind) -> bool {
        match (self, kind) {
            (Self::Empty, BodyKind::Empty | BodyKind::Int) => true,
            (Self::Text(_), BodyKind::Text) => true,
            (Self::Int(_), BodyKind::Int) => true,
            (Self::Ints(_), BodyKind::Ints) => true,
            _ => false,
        }
    }

    /// The raw body bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Empty => Vec::new(),
            Self::Int(n) => vec![*n],
            Self::Text(s) => s.as_bytes().to_vec(),
            Self::Ints(ids) => ids.clone(),
        }
    }

    /// Length in bytes once encoded.
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Int(_) => 1,
            Self::Text(s) => s.len(),
            Self::Ints(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_int(&self) -> Option<u8> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[u8]> {
        match self {
            Self::Ints(ids) => Some(ids),
            Self::Empty => Some(&[]),
            _ => None,
        }
    }

    /// Action replies use a single byte: `1` accepted, `0` rejected.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Int(1))
    }
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// A decoded server-to-client header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// The raw flag byte. Not yet checked against the flag table.
    pub flag: u8,
    pub body_len: usize,
}

/// A frame read off the wire whose flag has not been interpreted yet.
///
/// The transport produces these so that an unknown flag can be logged and
/// skipped without losing stream alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub flag: u8,
    pub body: Vec<u8>,
}

impl RawFrame {
    /// Interprets the flag and body.
    pub fn decode(&self) -> Result<Frame, ProtocolError> {
        let flag = Flag::try_from(self.flag)?;
        let body = crate::decode_body(flag, &self.body)?;
        Ok(Frame { flag, body })
    }
}

/// A server-to-client message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub flag: Flag,
    pub body: Body,
}

impl Frame {
    pub fn new(flag: Flag, body: Body) -> Self {
        Self { flag, body }
    }

    /// A frame with no body.
    pub fn empty(flag: Flag) -> Self {
        Self::new(flag, Body::Empty)
    }

    /// A frame carrying one integer.
    pub fn int(flag: Flag, value: u8) -> Self {
        Self::new(flag, Body::Int(value))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} bytes]", self.flag, self.body.len())
    }
}

/// A client-to-server message.
///
/// Every request carries the session token, including requests sent
/// before a match exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub flag: Flag,
    pub token: AuthToken,
    pub body: Body,
}

impl Request {
    pub fn new(flag: Flag, token: AuthToken, body: Body) -> Self {
        Self { flag, token, body }
    }

    /// The first request on a new connection.
    pub fn login(token: AuthToken, username: &str) -> Self {
        Self::new(Flag::Login, token, Body::Text(username.to_string()))
    }

    /// A request with no payload (`FindMatch`, `Ready`, card queries...).
    pub fn bare(flag: Flag, token: AuthToken) -> Self {
        Self::new(flag, token, Body::Empty)
    }

    /// A request carrying one id (cat, ability, move, or chance card).
    pub fn with_id(flag: Flag, token: AuthToken, id: u8) -> Self {
        Self::new(flag, token, Body::Int(id))
    }
}
