//! [`GameClient`]: the application's handle to one game connection.

use std::sync::Arc;

use kittywar_game::{AbilityId, CatId, Catalog, ChanceId, MatchState, Move, TurnPhase};
use kittywar_protocol::{Flag, Request};
use kittywar_session::Credentials;
use kittywar_transport::{TcpFrameWriter, connect};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::actor::{Action, Command, MatchActor};
use crate::events::EventSenders;
use crate::reader::{Inbound, read_loop};
use crate::reconnect::Backoff;
use crate::{
    ClientBuilder, ClientConfig, ConnectError, ConnectionEvent, KittywarError, SendError,
    Subscriptions,
};

const COMMAND_CHANNEL_SIZE: usize = 32;
const INBOUND_CHANNEL_SIZE: usize = 64;

/// Reference card lists the server can send on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardList {
    All,
    Cats,
    Basic,
    Chance,
    Ability,
}

impl CardList {
    pub fn flag(self) -> Flag {
        match self {
            Self::All => Flag::AllCards,
            Self::Cats => Flag::CatCards,
            Self::Basic => Flag::BasicCards,
            Self::Chance => Flag::ChanceCards,
            Self::Ability => Flag::AbilityCards,
        }
    }
}

/// A logged-in connection to the game server.
///
/// Cheap operations go through the match actor, so the handle itself
/// holds no state. Dropping it closes the connection the same way
/// [`disconnect`](Self::disconnect) does, without waiting.
pub struct GameClient {
    server: String,
    username: String,
    commands: mpsc::Sender<Command>,
    actor: JoinHandle<()>,
}

impl GameClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Opens a connection and logs in.
    ///
    /// The read loop starts before the login request is written, and the
    /// login reply is taken from its channel like any other frame. The
    /// first frame must be a successful login reply.
    pub async fn connect(
        config: &ClientConfig,
        catalog: Arc<Catalog>,
        credentials: &Credentials,
    ) -> Result<(Self, Subscriptions), ConnectError> {
        let (reader, mut writer) = connect(&config.server_addr, config.connect_timeout).await?;
        let reader = reader.with_idle_timeout(config.idle_timeout);

        let (inbound_tx, mut inbound_rx) = mpsc::channel(INBOUND_CHANNEL_SIZE);
        let read_task = tokio::spawn(read_loop(reader, inbound_tx));

        if let Err(e) = handshake(config, credentials, &mut writer, &mut inbound_rx).await {
            read_task.abort();
            tracing::warn!(server = %config.server_addr, error = %e, "login failed");
            return Err(e);
        }
        tracing::info!(
            server = %config.server_addr,
            username = %credentials.username,
            "logged in to game server"
        );

        let (events, subscriptions) = EventSenders::channel();
        events.connection(ConnectionEvent::Connected {
            server: config.server_addr.clone(),
        });

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let state = MatchState::new(catalog, config.win_health);
        let actor = MatchActor::new(
            state,
            writer,
            credentials.token.clone(),
            command_rx,
            inbound_rx,
            read_task,
            events,
        );
        let actor = tokio::spawn(actor.run());

        let client = Self {
            server: config.server_addr.clone(),
            username: credentials.username.clone(),
            commands: command_tx,
            actor,
        };
        Ok((client, subscriptions))
    }

    /// Like [`connect`](Self::connect), retrying transient failures with
    /// exponential backoff. A refused login is returned at once.
    pub async fn connect_with_retry(
        config: &ClientConfig,
        catalog: Arc<Catalog>,
        credentials: &Credentials,
    ) -> Result<(Self, Subscriptions), ConnectError> {
        let mut backoff = Backoff::new(config.reconnect.clone());
        loop {
            let err = match Self::connect(config, Arc::clone(&catalog), credentials).await {
                Ok(connected) => return Ok(connected),
                Err(e) if e.is_retryable() => e,
                Err(e) => return Err(e),
            };
            let Some(delay) = backoff.next_delay() else {
                return Err(err);
            };
            tracing::warn!(
                error = %err,
                retry = backoff.retries(),
                ?delay,
                "connect failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `false` once the connection has ended for any reason.
    pub fn is_connected(&self) -> bool {
        !self.commands.is_closed()
    }

    // ---- Lobby ----

    /// Asks the server to pair this player with an opponent. The answer
    /// arrives as `MatchFound` or `MatchNotFound`.
    pub async fn find_match(&self) -> Result<(), KittywarError> {
        self.act(Action::FindMatch).await
    }

    pub async fn request_profile(&self) -> Result<(), KittywarError> {
        self.act(Action::Query(Flag::UserProfile)).await
    }

    pub async fn request_cards(&self, list: CardList) -> Result<(), KittywarError> {
        self.act(Action::Query(list.flag())).await
    }

    pub async fn logout(&self) -> Result<(), KittywarError> {
        self.act(Action::Logout).await
    }

    // ---- Match ----

    /// Picks the cat for this match. Only valid before the first round.
    pub async fn select_cat(&self, cat: CatId) -> Result<(), KittywarError> {
        self.act(Action::SelectCat(cat)).await
    }

    pub async fn use_ability(&self, ability: AbilityId) -> Result<(), KittywarError> {
        self.act(Action::UseAbility(ability)).await
    }

    pub async fn select_move(&self, movement: Move) -> Result<(), KittywarError> {
        self.act(Action::SelectMove(movement)).await
    }

    pub async fn select_chance_card(&self, card: ChanceId) -> Result<(), KittywarError> {
        self.act(Action::SelectChanceCard(card)).await
    }

    /// Signals the end of this player's turn in the current phase.
    pub async fn ready(&self) -> Result<(), KittywarError> {
        self.act(Action::Ready).await
    }

    pub async fn end_match(&self) -> Result<(), KittywarError> {
        self.act(Action::EndMatch).await
    }

    /// A copy of the current match state.
    pub async fn snapshot(&self) -> Result<MatchState, KittywarError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| SendError::Disconnected)?;
        Ok(reply_rx.await.map_err(|_| SendError::Disconnected)?)
    }

    pub async fn phase(&self) -> Result<TurnPhase, KittywarError> {
        Ok(self.snapshot().await?.phase())
    }

    /// Closes the connection and waits until the match actor has
    /// published its `Disconnected` event.
    pub async fn disconnect(self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .commands
            .send(Command::Shutdown { reply: reply_tx })
            .await
            .is_ok()
        {
            let _ = reply_rx.await;
        }
        let _ = self.actor.await;
    }

    async fn act(&self, action: Action) -> Result<(), KittywarError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Act {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SendError::Disconnected)?;
        reply_rx.await.map_err(|_| SendError::Disconnected)?
    }
}

impl std::fmt::Debug for GameClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameClient")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("connected", &self.is_connected())
            .finish()
    }
}

async fn handshake(
    config: &ClientConfig,
    credentials: &Credentials,
    writer: &mut TcpFrameWriter,
    inbound: &mut mpsc::Receiver<Inbound>,
) -> Result<(), ConnectError> {
    let login = Request::login(credentials.token.clone(), &credentials.username);
    writer.write_request(&login).await?;

    let first = tokio::time::timeout(config.handshake_timeout, inbound.recv())
        .await
        .map_err(|_| ConnectError::HandshakeTimeout(config.handshake_timeout))?;

    match first {
        Some(Inbound::Frame(frame)) if frame.flag == Flag::Login && frame.body.is_accepted() => {
            Ok(())
        }
        Some(Inbound::Frame(frame)) => Err(ConnectError::HandshakeRejected {
            flag: frame.flag,
            body: frame.body,
        }),
        Some(Inbound::Failed(e)) => Err(e.into()),
        Some(Inbound::Closed) | None => Err(ConnectError::ClosedDuringHandshake),
    }
}
