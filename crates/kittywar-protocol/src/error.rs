//! Error types for the protocol layer.
//!
//! Framing problems get their own type, [`FrameFault`], because they are
//! the only protocol errors that poison the byte stream: once a length
//! prefix has been contradicted by the bytes that followed it, there is
//! no reliable way to find the start of the next frame.

use crate::frame::TOKEN_LEN;
use crate::{BodyKind, Flag};

/// A frame whose declared length does not match the bytes that arrived.
///
/// A fault is connection-fatal. The caller must drop the stream and
/// reconnect instead of trying to resume mid-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameFault {
    /// Fewer than four header bytes were available.
    #[error("frame fault: truncated header ({got} of 4 bytes)")]
    TruncatedHeader { got: usize },

    /// The stream ended before the declared body length was read.
    #[error("frame fault: truncated body ({got} of {declared} bytes)")]
    TruncatedBody { declared: usize, got: usize },
}

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The header or body length was contradicted by the stream.
    #[error(transparent)]
    Frame(#[from] FrameFault),

    /// An outbound payload does not fit the 3-byte length field.
    #[error("payload of {0} bytes does not fit the 3-byte length field")]
    PayloadTooLarge(usize),

    /// The flag byte is not part of the flag table.
    ///
    /// The frame itself was well-formed, so the stream stays aligned and
    /// the frame can be skipped.
    #[error("unknown flag {0}")]
    UnknownFlag(u8),

    /// A body was paired with a flag that interprets bodies differently.
    #[error("flag {flag} expects a {kind:?} body")]
    BodyMismatch { flag: Flag, kind: BodyKind },

    /// The flag is server-to-client only and cannot be sent.
    #[error("flag {0} is not a client request")]
    NotARequest(Flag),

    /// A text body was not valid UTF-8.
    #[error("body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A session token of the wrong width.
    #[error("auth token must be exactly {TOKEN_LEN} bytes, got {0}")]
    InvalidToken(usize),
}

impl ProtocolError {
    /// Returns `true` if the byte stream can no longer be trusted.
    pub fn is_frame_fault(&self) -> bool {
        matches!(self, Self::Frame(_))
    }
}
