//! Wire protocol for KittyWar.
//!
//! This crate defines the "language" that the game client and the game
//! server speak over their persistent connection:
//!
//! - **Flags** ([`Flag`]) — the single-byte message-type table.
//! - **Frames** ([`Frame`], [`Request`], [`Body`]) — the typed shape of
//!   inbound and outbound messages.
//! - **Codec** ([`encode_request`], [`decode_header`], [`decode_body`], …) —
//!   how those messages are converted to and from bytes.
//! - **Errors** ([`ProtocolError`], [`FrameFault`]) — what can go wrong.
//!
//! # Wire format
//!
//! ```text
//! server → client   [flag:1][body_len:3 BE][body]
//! client → server   [flag:1][token:24][body_len:3 BE][body]
//! ```
//!
//! The body is not self-describing. How it is interpreted (nothing, one
//! integer, UTF-8 text, or a list of small integers) is decided by the
//! flag alone, see [`Flag::body_kind`].
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (Frame) → Game (match state)
//! ```

mod codec;
mod error;
mod flag;
mod frame;

pub use codec::{
    decode_body, decode_frame, decode_header, decode_request, encode_frame,
    encode_request,
};
pub use error::{FrameFault, ProtocolError};
pub use flag::{BodyKind, Flag};
pub use frame::{
    AuthToken, Body, Frame, Header, RawFrame, Request, HEADER_LEN,
    MAX_BODY_LEN, REQUEST_HEADER_LEN, TOKEN_LEN,
};
