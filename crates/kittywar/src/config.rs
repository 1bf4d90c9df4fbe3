//! Client configuration and the fluent [`ClientBuilder`].

use std::sync::Arc;
use std::time::Duration;

use kittywar_game::{Catalog, WIN_HEALTH};
use kittywar_session::Credentials;
use serde::{Deserialize, Serialize};

use crate::{ConnectError, GameClient, Subscriptions};

/// How [`GameClient::connect_with_retry`] spaces out its attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectPolicy {
    /// Total connection attempts, the first one included.
    pub max_attempts: u32,
    /// Delay before the first retry. Doubles on every further retry.
    pub initial_delay: Duration,
    /// Upper bound for the doubled delay.
    pub max_delay: Duration,
    /// Up to this much random delay is added to every retry.
    pub jitter: Duration,
}

impl ReconnectPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            jitter: Duration::from_millis(250),
        }
    }
}

/// Settings for one game connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// `host:port` of the game server.
    pub server_addr: String,
    pub connect_timeout: Duration,
    /// How long to wait for the login reply.
    pub handshake_timeout: Duration,
    /// Drop the connection after this long without any inbound bytes.
    /// The server stays silent while a player waits in the lobby or for
    /// the opponent to act, so this is off by default. `None` waits
    /// forever.
    pub idle_timeout: Option<Duration>,
    pub reconnect: ReconnectPolicy,
    /// Health at which a player wins.
    pub win_health: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:2056".to_string(),
            connect_timeout: Duration::from_secs(10),
            handshake_timeout: Duration::from_secs(10),
            idle_timeout: None,
            reconnect: ReconnectPolicy::default(),
            win_health: WIN_HEALTH,
        }
    }
}

/// Builder for configuring and connecting a [`GameClient`].
///
/// # Example
///
/// ```rust,ignore
/// let (client, events) = GameClient::builder()
///     .server_addr("game.example.org:2056")
///     .handshake_timeout(Duration::from_secs(5))
///     .connect(&credentials)
///     .await?;
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
    catalog: Option<Arc<Catalog>>,
}

impl ClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            catalog: None,
        }
    }

    /// Replaces every setting at once.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn server_addr(mut self, addr: &str) -> Self {
        self.config.server_addr = addr.to_string();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.config.handshake_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    pub fn reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.config.reconnect = policy;
        self
    }

    pub fn win_health(mut self, health: u8) -> Self {
        self.config.win_health = health;
        self
    }

    /// Uses a catalog other than [`Catalog::standard`].
    pub fn catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Returns the configuration built so far.
    pub fn build(self) -> ClientConfig {
        self.config
    }

    /// Connects once.
    pub async fn connect(
        self,
        credentials: &Credentials,
    ) -> Result<(GameClient, Subscriptions), ConnectError> {
        let catalog = self.catalog.unwrap_or_else(|| Arc::new(Catalog::standard()));
        GameClient::connect(&self.config, catalog, credentials).await
    }

    /// Connects, retrying per the configured [`ReconnectPolicy`].
    pub async fn connect_with_retry(
        self,
        credentials: &Credentials,
    ) -> Result<(GameClient, Subscriptions), ConnectError> {
        let catalog = self.catalog.unwrap_or_else(|| Arc::new(Catalog::standard()));
        GameClient::connect_with_retry(&self.config, catalog, credentials).await
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
