//! Match actor: a Tokio task that owns the match state and the write half.
//!
//! The application never touches [`MatchState`] directly. It sends a
//! [`Command`] and awaits the reply, while the read loop feeds inbound
//! frames into the same task. One task applying both streams keeps
//! every state change ordered without locks.

use kittywar_game::{
    dispatch, AbilityId, ActionKind, CatId, ChanceId, GameError, MatchState, Move,
    Outbound, RejectReason, SessionEvent,
};
use kittywar_protocol::{AuthToken, Flag, Frame};
use kittywar_transport::FrameWriter;
use tokio::io::AsyncWrite;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::events::EventSenders;
use crate::reader::Inbound;
use crate::{ConnectionEvent, DisconnectReason, KittywarError, SendError};

/// Something the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    FindMatch,
    SelectCat(CatId),
    UseAbility(AbilityId),
    SelectMove(Move),
    SelectChanceCard(ChanceId),
    Ready,
    /// A bare request whose answer arrives as a session event
    /// (profile, card lists).
    Query(Flag),
    EndMatch,
    Logout,
}

pub(crate) enum Command {
    Act {
        action: Action,
        reply: oneshot::Sender<Result<(), KittywarError>>,
    },
    Snapshot {
        reply: oneshot::Sender<MatchState>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

pub(crate) struct MatchActor<W> {
    state: MatchState,
    writer: FrameWriter<W>,
    token: AuthToken,
    commands: mpsc::Receiver<Command>,
    inbound: mpsc::Receiver<Inbound>,
    read_task: JoinHandle<()>,
    events: EventSenders,
}

impl<W> MatchActor<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub(crate) fn new(
        state: MatchState,
        writer: FrameWriter<W>,
        token: AuthToken,
        commands: mpsc::Receiver<Command>,
        inbound: mpsc::Receiver<Inbound>,
        read_task: JoinHandle<()>,
        events: EventSenders,
    ) -> Self {
        Self {
            state,
            writer,
            token,
            commands,
            inbound,
            read_task,
            events,
        }
    }

    /// Runs until the connection ends or the client shuts it down, then
    /// publishes exactly one [`ConnectionEvent::Disconnected`].
    pub(crate) async fn run(mut self) {
        tracing::info!("match actor started");

        let mut shutdown_reply = None;
        let reason = loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Act { action, reply }) => {
                        let result = self.handle_action(action).await;
                        let _ = reply.send(result);
                    }
                    Some(Command::Snapshot { reply }) => {
                        let _ = reply.send(self.state.clone());
                    }
                    Some(Command::Shutdown { reply }) => {
                        shutdown_reply = Some(reply);
                        break DisconnectReason::Client;
                    }
                    None => break DisconnectReason::Client,
                },
                inbound = self.inbound.recv() => match inbound {
                    Some(Inbound::Frame(frame)) => self.handle_frame(&frame).await,
                    Some(Inbound::Closed) | None => break DisconnectReason::ServerClosed,
                    Some(Inbound::Failed(e)) => {
                        tracing::warn!(error = %e, "connection failed");
                        break DisconnectReason::Error(e.to_string());
                    }
                },
            }
        };

        self.read_task.abort();
        if let Err(e) = self.writer.shutdown().await {
            tracing::debug!(error = %e, "write half already closed");
        }
        tracing::info!(?reason, "match actor stopped");
        self.events
            .connection(ConnectionEvent::Disconnected { reason });
        if let Some(reply) = shutdown_reply {
            let _ = reply.send(());
        }
    }

    async fn handle_action(&mut self, action: Action) -> Result<(), KittywarError> {
        let (kind, outbound) = match action {
            Action::SelectCat(cat) => (Some(ActionKind::SelectCat), self.state.select_cat(cat)),
            Action::UseAbility(ability) => {
                (Some(ActionKind::UseAbility), self.state.use_ability(ability))
            }
            Action::SelectMove(movement) => {
                (Some(ActionKind::SelectMove), self.state.select_move(movement))
            }
            Action::SelectChanceCard(card) => (
                Some(ActionKind::SelectChanceCard),
                self.state.select_chance_card(card),
            ),
            Action::FindMatch => (None, Ok(Outbound::bare(Flag::FindMatch))),
            Action::Ready => (None, Ok(Outbound::bare(Flag::Ready))),
            Action::Query(flag) => (None, Ok(Outbound::bare(flag))),
            Action::EndMatch => (None, Ok(Outbound::bare(Flag::EndMatch))),
            Action::Logout => (None, Ok(Outbound::bare(Flag::Logout))),
        };

        let outbound = match outbound {
            Ok(outbound) => outbound,
            Err(e) => {
                self.reject_locally(kind, &e);
                return Err(e.into());
            }
        };

        let flag = outbound.flag;
        if let Err(e) = self.send(outbound).await {
            self.state.cancel_pending(flag);
            return Err(e.into());
        }
        Ok(())
    }

    fn reject_locally(&self, kind: Option<ActionKind>, error: &GameError) {
        tracing::debug!(error = %error, "action refused locally");
        if let Some(action) = kind {
            self.events.session(SessionEvent::ActionRejected {
                action,
                reason: RejectReason::Local(error.to_string()),
            });
        }
    }

    async fn handle_frame(&mut self, frame: &Frame) {
        let result = dispatch(&mut self.state, frame);
        if let Some(notification) = result.notification {
            self.events.notify(notification);
        }
        if let Some(reply) = result.reply {
            let flag = reply.flag;
            if let Err(e) = self.send(reply).await {
                tracing::warn!(%flag, error = %e, "automatic reply not sent");
            }
        }
    }

    async fn send(&mut self, outbound: Outbound) -> Result<(), SendError> {
        let request = outbound.into_request(self.token.clone());
        self.writer.write_request(&request).await?;
        Ok(())
    }
}
