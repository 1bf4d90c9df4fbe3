//! Channels the client publishes on.

use kittywar_game::{Notification, PhaseEvent, SessionEvent};
use tokio::sync::mpsc;

/// Connection lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Logged in; the client accepts actions.
    Connected { server: String },
    /// Emitted once per connection. The client is unusable afterwards.
    Disconnected { reason: DisconnectReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// [`GameClient::disconnect`](crate::GameClient::disconnect) or drop.
    Client,
    /// The server closed the connection between frames.
    ServerClosed,
    /// Read failure, idle timeout or a truncated frame.
    Error(String),
}

/// Receiving ends of the client's three event streams.
///
/// Dropping a receiver only silences that stream.
#[derive(Debug)]
pub struct Subscriptions {
    pub phases: mpsc::UnboundedReceiver<PhaseEvent>,
    pub session: mpsc::UnboundedReceiver<SessionEvent>,
    pub connection: mpsc::UnboundedReceiver<ConnectionEvent>,
}

/// Sending ends, owned by the match actor.
#[derive(Debug, Clone)]
pub(crate) struct EventSenders {
    phases: mpsc::UnboundedSender<PhaseEvent>,
    session: mpsc::UnboundedSender<SessionEvent>,
    connection: mpsc::UnboundedSender<ConnectionEvent>,
}

impl EventSenders {
    pub(crate) fn channel() -> (Self, Subscriptions) {
        let (phases_tx, phases) = mpsc::unbounded_channel();
        let (session_tx, session) = mpsc::unbounded_channel();
        let (connection_tx, connection) = mpsc::unbounded_channel();
        let senders = Self {
            phases: phases_tx,
            session: session_tx,
            connection: connection_tx,
        };
        let subscriptions = Subscriptions {
            phases,
            session,
            connection,
        };
        (senders, subscriptions)
    }

    pub(crate) fn notify(&self, notification: Notification) {
        match notification {
            Notification::Phase(event) => {
                let _ = self.phases.send(event);
            }
            Notification::Session(event) => self.session(event),
        }
    }

    pub(crate) fn session(&self, event: SessionEvent) {
        let _ = self.session.send(event);
    }

    pub(crate) fn connection(&self, event: ConnectionEvent) {
        let _ = self.connection.send(event);
    }
}
