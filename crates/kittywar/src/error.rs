//! Unified error types for the KittyWar client.

use std::time::Duration;

use kittywar_game::GameError;
use kittywar_protocol::{Body, Flag, ProtocolError};
use kittywar_session::SessionError;
use kittywar_transport::TransportError;

/// Opening the game connection failed. The client is left disconnected.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Connecting, or sending the login frame, failed at the transport.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// No login reply arrived in time.
    #[error("no login reply within {0:?}")]
    HandshakeTimeout(Duration),

    /// The first reply was not a successful login.
    #[error("login refused by game server (reply {flag}, body {body:?})")]
    HandshakeRejected { flag: Flag, body: Body },

    /// The server closed the connection before replying.
    #[error("connection closed during login")]
    ClosedDuringHandshake,
}

impl ConnectError {
    /// Returns `true` if trying again might help. A refused login will not
    /// change on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::HandshakeTimeout(_) | Self::ClosedDuringHandshake => true,
            Self::HandshakeRejected { .. } => false,
        }
    }
}

/// A request could not be delivered.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The connection is gone; the match actor has stopped.
    #[error("not connected")]
    Disconnected,
}

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum KittywarError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Send(#[from] SendError),

    /// The action was refused locally before anything was sent.
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
