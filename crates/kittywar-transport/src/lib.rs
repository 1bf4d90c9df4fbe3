//! Transport layer for KittyWar.
//!
//! The game connection is a single long-lived TCP stream carrying
//! length-prefixed frames. This crate turns that stream into two halves:
//!
//! - [`FrameReader`] reads whole server frames, reassembling short reads
//!   and reporting a clean close as `Ok(None)`.
//! - [`FrameWriter`] encodes and writes requests.
//!
//! Both are generic over `AsyncRead` / `AsyncWrite`, so tests can drive
//! them with in-memory duplex pipes.
//!
//! # Feature Flags
//!
//! - `tcp` (default) — [`connect`] for opening a real TCP connection

mod error;
mod framed;
#[cfg(feature = "tcp")]
mod tcp;

pub use error::TransportError;
pub use framed::{FrameReader, FrameWriter};
#[cfg(feature = "tcp")]
pub use tcp::{connect, TcpFrameReader, TcpFrameWriter};
