//! # KittyWar
//!
//! Client for the KittyWar two-player card game.
//!
//! [`GameClient`] owns one connection to the game server. Connecting logs
//! in with stored [`Credentials`](kittywar_session::Credentials), starts a
//! read loop that is the only reader of the socket, and hands every frame
//! to a match actor that applies it to the match state. The application
//! talks to the client through async methods and listens on three typed
//! channels ([`Subscriptions`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use kittywar::prelude::*;
//!
//! # async fn run() -> Result<(), KittywarError> {
//! let auth = WebAuthenticator::new(WebConfig::default());
//! let credentials = auth.login("whiskers", "hunter2").await?;
//!
//! let (client, mut events) = GameClient::builder()
//!     .server_addr("127.0.0.1:2056")
//!     .connect(&credentials)
//!     .await?;
//!
//! client.find_match().await?;
//! while let Some(event) = events.session.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod actor;
mod client;
mod config;
mod error;
mod events;
mod reader;
mod reconnect;

pub use client::{CardList, GameClient};
pub use config::{ClientBuilder, ClientConfig, ReconnectPolicy};
pub use error::{ConnectError, KittywarError, SendError};
pub use events::{ConnectionEvent, DisconnectReason, Subscriptions};
pub use reconnect::Backoff;

pub use kittywar_game as game;
pub use kittywar_protocol as protocol;
pub use kittywar_session as session;
pub use kittywar_transport as transport;

/// Installs a `tracing` subscriber that honours `RUST_LOG`, defaulting
/// to `info`. Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub mod prelude {
    pub use crate::{
        CardList, ClientBuilder, ClientConfig, ConnectError, ConnectionEvent,
        DisconnectReason, GameClient, KittywarError, ReconnectPolicy, SendError,
        Subscriptions,
    };
    pub use kittywar_game::{
        AbilityId, ActionKind, CatId, Catalog, ChanceId, Cooldown, MatchState,
        Move, Outcome, PhaseEvent, RejectReason, SessionEvent, Side, TurnPhase,
        WIN_HEALTH,
    };
    pub use kittywar_session::{
        Authenticator, CredentialStore, Credentials, FileCredentialStore,
        MemoryCredentialStore, WebAuthenticator, WebConfig,
    };
}
