//! Byte-level encoding and decoding of frames.
//!
//! All functions here are pure: they never touch a socket. The transport
//! crate reads exactly [`HEADER_LEN`] bytes, calls [`decode_header`] to
//! learn how many body bytes follow, reads those, and hands both to
//! [`RawFrame::decode`](crate::RawFrame::decode).

use crate::frame::REQUEST_HEADER_LEN;
use crate::{
    AuthToken, Body, BodyKind, Flag, Frame, FrameFault, Header, ProtocolError,
    Request, HEADER_LEN, MAX_BODY_LEN, TOKEN_LEN,
};

// ---- Length field ----

fn encode_len(len: usize) -> Result<[u8; 3], ProtocolError> {
    if len > MAX_BODY_LEN {
        return Err(ProtocolError::PayloadTooLarge(len));
    }
    let be = (len as u32).to_be_bytes();
    Ok([be[1], be[2], be[3]])
}

fn decode_len(bytes: [u8; 3]) -> usize {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]) as usize
}

fn check_body(flag: Flag, body: &Body, kind: BodyKind) -> Result<(), ProtocolError> {
    if body.fits(kind) {
        Ok(())
    } else {
        Err(ProtocolError::BodyMismatch { flag, kind })
    }
}

// ---- Encoding ----

/// Encodes a client-to-server request:
/// `[flag][token:24][len:3 BE][body]`.
///
/// # Errors
/// - `NotARequest` if the flag is never sent by a client.
/// - `PayloadTooLarge` if the body does not fit the length field.
/// - `BodyMismatch` if the body shape does not match
///   [`Flag::request_body_kind`].
pub fn encode_request(request: &Request) -> Result<Vec<u8>, ProtocolError> {
    if !request.flag.is_client_request() {
        return Err(ProtocolError::NotARequest(request.flag));
    }
    check_body(request.flag, &request.body, request.flag.request_body_kind())?;
    let body = request.body.to_bytes();
    let len = encode_len(body.len())?;

    let mut out = Vec::with_capacity(REQUEST_HEADER_LEN + body.len());
    out.push(request.flag.as_u8());
    out.extend_from_slice(request.token.as_bytes());
    out.extend_from_slice(&len);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Encodes a server-to-client frame: `[flag][len:3 BE][body]`.
///
/// The client never sends these. The encoder exists for tooling and for
/// scripted servers in tests.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, ProtocolError> {
    check_body(frame.flag, &frame.body, frame.flag.body_kind())?;
    let body = frame.body.to_bytes();
    let len = encode_len(body.len())?;

    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.push(frame.flag.as_u8());
    out.extend_from_slice(&len);
    out.extend_from_slice(&body);
    Ok(out)
}

// ---- Decoding ----

/// Decodes the 4-byte server-to-client header.
///
/// Only the first [`HEADER_LEN`] bytes are looked at. The flag is returned
/// raw so the caller can still skip the body of an unknown flag.
pub fn decode_header(bytes: &[u8]) -> Result<Header, FrameFault> {
    if bytes.len() < HEADER_LEN {
        return Err(FrameFault::TruncatedHeader { got: bytes.len() });
    }
    Ok(Header {
        flag: bytes[0],
        body_len: decode_len([bytes[1], bytes[2], bytes[3]]),
    })
}

/// Interprets body bytes according to `flag`'s [`BodyKind`].
///
/// An `Int` flag with no body bytes decodes to [`Body::Empty`]; for action
/// replies that means "rejected".
pub fn decode_body(flag: Flag, bytes: &[u8]) -> Result<Body, ProtocolError> {
    decode_body_as(flag.body_kind(), bytes)
}

fn decode_body_as(kind: BodyKind, bytes: &[u8]) -> Result<Body, ProtocolError> {
    Ok(match kind {
        BodyKind::Empty => Body::Empty,
        BodyKind::Int => match bytes.first() {
            Some(&n) => Body::Int(n),
            None => Body::Empty,
        },
        BodyKind::Text => Body::Text(String::from_utf8(bytes.to_vec())?),
        BodyKind::Ints => Body::Ints(bytes.to_vec()),
    })
}

/// Decodes one complete server-to-client frame from the start of `bytes`.
///
/// Trailing bytes after the declared body are ignored.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame, ProtocolError> {
    let header = decode_header(bytes)?;
    let available = bytes.len() - HEADER_LEN;
    if available < header.body_len {
        return Err(FrameFault::TruncatedBody {
            declared: header.body_len,
            got: available,
        }
        .into());
    }
    let flag = Flag::try_from(header.flag)?;
    let body = decode_body(flag, &bytes[HEADER_LEN..HEADER_LEN + header.body_len])?;
    Ok(Frame { flag, body })
}

/// Decodes one complete client-to-server request from the start of `bytes`.
///
/// The inverse of [`encode_request`]. Used by scripted servers.
pub fn decode_request(bytes: &[u8]) -> Result<Request, ProtocolError> {
    if bytes.len() < REQUEST_HEADER_LEN {
        return Err(FrameFault::TruncatedHeader { got: bytes.len() }.into());
    }
    let flag = Flag::try_from(bytes[0])?;
    let token = AuthToken::from_bytes(&bytes[1..1 + TOKEN_LEN])?;
    let len_at = 1 + TOKEN_LEN;
    let body_len = decode_len([bytes[len_at], bytes[len_at + 1], bytes[len_at + 2]]);

    let available = bytes.len() - REQUEST_HEADER_LEN;
    if available < body_len {
        return Err(FrameFault::TruncatedBody {
            declared: body_len,
            got: available,
        }
        .into());
    }
    let raw = &bytes[REQUEST_HEADER_LEN..REQUEST_HEADER_LEN + body_len];
    let body = decode_body_as(flag.request_body_kind(), raw)?;
    Ok(Request { flag, token, body })
}

// ===== Tests =====
