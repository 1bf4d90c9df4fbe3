//! Account sessions for KittyWar.
//!
//! Before a client can open the game connection it needs a session
//! token. This crate covers the two pieces around that token:
//!
//! 1. **Authentication** — registering and logging in against the web
//!    server ([`Authenticator`], [`WebAuthenticator`])
//! 2. **Persistence** — remembering the username and token between runs
//!    ([`CredentialStore`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Client (above)  ← opens the game connection with the stored credentials
//!     ↕
//! Session Layer (this crate)  ← obtains and stores credentials
//!     ↕
//! Protocol Layer (below)  ← provides AuthToken
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod credentials;
mod error;

pub use auth::{Authenticator, WebAuthenticator, WebConfig};
pub use credentials::{
    CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore,
};
pub use error::SessionError;
