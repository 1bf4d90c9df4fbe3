//! Error types for the session layer.

use kittywar_protocol::ProtocolError;

/// Errors from logging in, registering, or storing credentials.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The HTTP request itself failed (connection refused, timeout, ...).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Registration refused because the username exists.
    #[error("username {0:?} is already taken")]
    UsernameTaken(String),

    /// Login refused: wrong username or password.
    #[error("login rejected")]
    LoginRejected,

    /// The server answered with a status this client does not know.
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    /// The response body could not be understood.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Reading or writing the credential file failed.
    #[error("credential storage failed: {0}")]
    Storage(#[from] std::io::Error),

    /// The credential file exists but does not parse.
    #[error("credential file is corrupt: {0}")]
    CorruptStore(#[source] serde_json::Error),

    /// The token returned by the server is not usable on the game
    /// connection.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
