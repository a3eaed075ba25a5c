//! Room actor implementation with async message handling.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::{
    config::RoomConfig,
    errors::{RoomError, RoomResult},
    messages::{CommandReply, RoomInfo, RoomMessage, StateChangeNotification},
    store::SnapshotStore,
};
use crate::game::{
    Command, GameEvent, LegalActions, Room, RoomSnapshot,
    entities::{PlayerId, RoundResult},
};

/// Room actor handle for sending messages
#[derive(Clone, Debug)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomMessage>,
    code: String,
    /// Channel size handed to `subscribe`.
    subscriber_buffer: usize,
}

impl RoomHandle {
    pub fn new(sender: mpsc::Sender<RoomMessage>, code: String, subscriber_buffer: usize) -> Self {
        Self {
            sender,
            code,
            subscriber_buffer: subscriber_buffer.max(1),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether the actor behind this handle has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a message to the room
    pub async fn send(&self, message: RoomMessage) -> RoomResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| RoomError::Closed(self.code.clone()))
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoomMessage,
    ) -> RoomResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| RoomError::Closed(self.code.clone()))
    }

    /// Apply `command` on behalf of `player_id`.
    pub async fn command(&self, player_id: PlayerId, command: Command) -> RoomResult<RoomSnapshot> {
        let reply: CommandReply = self
            .request(|response| RoomMessage::Command {
                player_id,
                command,
                response,
            })
            .await?;
        reply.map_err(RoomError::from)
    }

    pub async fn snapshot(&self, viewer: Option<PlayerId>) -> RoomResult<RoomSnapshot> {
        self.request(|response| RoomMessage::GetSnapshot { viewer, response })
            .await
    }

    pub async fn legal_commands(&self, player_id: PlayerId) -> RoomResult<LegalActions> {
        self.request(|response| RoomMessage::LegalCommands {
            player_id,
            response,
        })
        .await
    }

    pub async fn history(&self) -> RoomResult<Vec<RoundResult>> {
        self.request(|response| RoomMessage::GetHistory { response })
            .await
    }

    pub async fn info(&self) -> RoomResult<RoomInfo> {
        self.request(|response| RoomMessage::GetInfo { response })
            .await
    }

    /// Register a new subscriber. Up to the room's configured
    /// `subscriber_buffer` notifications queue up; later ones are dropped
    /// until the receiver catches up.
    pub async fn subscribe(&self) -> RoomResult<(Uuid, mpsc::Receiver<StateChangeNotification>)> {
        self.subscribe_with_buffer(self.subscriber_buffer).await
    }

    /// Like [`RoomHandle::subscribe`] with an explicit buffer size.
    pub async fn subscribe_with_buffer(
        &self,
        buffer: usize,
    ) -> RoomResult<(Uuid, mpsc::Receiver<StateChangeNotification>)> {
        let subscriber_id = Uuid::new_v4();
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        self.send(RoomMessage::Subscribe {
            subscriber_id,
            sender,
        })
        .await?;
        Ok((subscriber_id, receiver))
    }

    pub async fn unsubscribe(&self, subscriber_id: Uuid) -> RoomResult<()> {
        self.send(RoomMessage::Unsubscribe { subscriber_id }).await
    }

    pub async fn close(&self) -> RoomResult<()> {
        self.request(|response| RoomMessage::Close { response })
            .await
    }
}

/// Owns one [`Room`] and applies its commands one at a time.
pub struct RoomActor {
    room: Room,
    inbox: mpsc::Receiver<RoomMessage>,
    store: Arc<dyn SnapshotStore>,
    subscribers: HashMap<Uuid, mpsc::Sender<StateChangeNotification>>,
    is_closed: bool,
    /// Answered once shutdown has finished.
    close_reply: Option<oneshot::Sender<()>>,
}

impl RoomActor {
    /// Create a new room actor and the handle used to reach it.
    pub fn new(room: Room, config: RoomConfig, store: Arc<dyn SnapshotStore>) -> (Self, RoomHandle) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity.max(1));
        let handle = RoomHandle::new(sender, room.code().to_string(), config.subscriber_buffer);

        let actor = Self {
            room,
            inbox,
            store,
            subscribers: HashMap::new(),
            is_closed: false,
            close_reply: None,
        };

        (actor, handle)
    }

    /// Run the room actor event loop. Returns once closed or once every
    /// handle is dropped.
    pub async fn run(mut self) {
        log::info!(
            "Room {} starting (host {})",
            self.room.code(),
            self.room.host_id()
        );

        // Events from room creation
        self.room.drain_events();
        self.persist(&self.room.snapshot(), &[]).await;

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message).await;
            if self.is_closed {
                break;
            }
        }

        self.notify_state_change(StateChangeNotification::Closed);
        if let Err(e) = self.store.remove(self.room.code()).await {
            log::warn!("Room {}: failed to drop snapshot: {}", self.room.code(), e);
        }
        log::info!(
            "Room {} closed after {} round(s)",
            self.room.code(),
            self.room.history().len()
        );
        if let Some(reply) = self.close_reply.take() {
            let _ = reply.send(());
        }
    }

    async fn handle_message(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Command {
                player_id,
                command,
                response,
            } => {
                let result = self.handle_command(&player_id, command).await;
                let _ = response.send(result);
            }

            RoomMessage::GetSnapshot { viewer, response } => {
                let snapshot = self.room.snapshot();
                let snapshot = match viewer {
                    Some(viewer) => snapshot.redacted_for(&viewer),
                    None => snapshot,
                };
                let _ = response.send(snapshot);
            }

            RoomMessage::LegalCommands {
                player_id,
                response,
            } => {
                let _ = response.send(self.room.legal_commands(&player_id));
            }

            RoomMessage::GetHistory { response } => {
                let _ = response.send(self.room.history().to_vec());
            }

            RoomMessage::GetInfo { response } => {
                let _ = response.send(RoomInfo {
                    code: self.room.code().to_string(),
                    host_id: self.room.host_id().clone(),
                    phase: self.room.phase(),
                    round: self.room.round(),
                    player_count: self.room.player_count(),
                });
            }

            RoomMessage::Subscribe {
                subscriber_id,
                sender,
            } => {
                self.subscribers.insert(subscriber_id, sender);
                log::debug!(
                    "Subscriber {} subscribed to room {}",
                    subscriber_id,
                    self.room.code()
                );
            }

            RoomMessage::Unsubscribe { subscriber_id } => {
                self.subscribers.remove(&subscriber_id);
                log::debug!(
                    "Subscriber {} unsubscribed from room {}",
                    subscriber_id,
                    self.room.code()
                );
            }

            RoomMessage::Close { response } => {
                self.is_closed = true;
                self.close_reply = Some(response);
            }
        }
    }

    /// Validate and commit in one synchronous step, then persist and
    /// broadcast the result.
    async fn handle_command(&mut self, player_id: &PlayerId, command: Command) -> CommandReply {
        let kind = command.kind();
        if let Err(e) = self.room.apply(player_id, command) {
            log::debug!(
                "Room {}: rejected {:?} from {}: {}",
                self.room.code(),
                kind,
                player_id,
                e
            );
            return Err(e);
        }

        let events = self.room.drain_events();
        let snapshot = self.room.snapshot();
        let rounds: Vec<RoundResult> = events
            .iter()
            .filter_map(|event| match event {
                GameEvent::RoundCompleted(result) => Some(result.clone()),
                _ => None,
            })
            .collect();
        self.persist(&snapshot, &rounds).await;

        let shared = Arc::new(snapshot.clone());
        self.notify_state_change(StateChangeNotification::StateChanged(shared));
        for event in events {
            log::debug!("Room {}: {}", self.room.code(), event);
            match event {
                GameEvent::Joined(_) | GameEvent::Left(_) => {
                    self.notify_state_change(StateChangeNotification::PlayerListChanged);
                }
                GameEvent::RoundCompleted(result) => {
                    self.notify_state_change(StateChangeNotification::RoundCompleted(result));
                }
                GameEvent::GameEnded => {
                    self.notify_state_change(StateChangeNotification::GameEnded);
                }
                _ => {}
            }
        }

        Ok(snapshot)
    }

    /// Store failures are logged; the commit stands regardless.
    async fn persist(&self, snapshot: &RoomSnapshot, rounds: &[RoundResult]) {
        if let Err(e) = self.store.save_snapshot(snapshot).await {
            log::warn!("Room {}: failed to save snapshot: {}", snapshot.code, e);
        }
        for result in rounds {
            if let Err(e) = self.store.append_round(&snapshot.code, result).await {
                log::warn!(
                    "Room {}: failed to store round {}: {}",
                    snapshot.code,
                    result.round,
                    e
                );
            }
        }
    }

    /// Broadcast state change notification to all subscribers
    fn notify_state_change(&mut self, notification: StateChangeNotification) {
        self.subscribers.retain(|subscriber_id, sender| {
            match sender.try_send(notification.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Subscriber {} channel full, dropping notification",
                        subscriber_id
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", subscriber_id);
                    false
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameError, GameSettings, entities::Phase};
    use crate::room::store::InMemorySnapshotStore;

    fn spawn_room() -> (RoomHandle, Arc<InMemorySnapshotStore>) {
        let store = Arc::new(InMemorySnapshotStore::new());
        let room = Room::create("T1", PlayerId::new("a"), "A", GameSettings::default()).with_seed(3);
        let (actor, handle) = RoomActor::new(room, RoomConfig::default(), store.clone());
        tokio::spawn(actor.run());
        (handle, store)
    }

    #[tokio::test]
    async fn test_command_returns_snapshot() {
        let (handle, _) = spawn_room();
        let snapshot = handle
            .command(
                PlayerId::new("b"),
                Command::JoinRoom {
                    name: "Bea".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(snapshot.seats.len(), 2);
        assert_eq!(snapshot.players[&PlayerId::new("b")].name, "Bea");
    }

    #[tokio::test]
    async fn test_rejection_is_typed() {
        let (handle, _) = spawn_room();
        let err = handle
            .command(PlayerId::new("a"), Command::PlaceBid { value: 160 })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_game_error(),
            Some(GameError::PhaseViolation {
                expected: Phase::Bidding,
                actual: Phase::Lobby
            })
        ));
    }

    #[tokio::test]
    async fn test_commits_reach_store() {
        let (handle, store) = spawn_room();
        handle
            .command(PlayerId::new("a"), Command::SetReady)
            .await
            .unwrap();

        let stored = store.load_snapshot("T1").await.unwrap().unwrap();
        assert!(stored.players[&PlayerId::new("a")].is_ready);
    }

    #[tokio::test]
    async fn test_subscribers_get_notified() {
        let (handle, _) = spawn_room();
        let (_, mut rx) = handle.subscribe().await.unwrap();

        handle
            .command(
                PlayerId::new("b"),
                Command::JoinRoom {
                    name: "B".to_string(),
                },
            )
            .await
            .unwrap();

        match rx.recv().await {
            Some(StateChangeNotification::StateChanged(snapshot)) => {
                assert_eq!(snapshot.seats.len(), 2);
            }
            other => panic!("unexpected notification: {other:?}"),
        }
        assert!(matches!(
            rx.recv().await,
            Some(StateChangeNotification::PlayerListChanged)
        ));
    }

    #[tokio::test]
    async fn test_rejected_command_does_not_notify() {
        let (handle, _) = spawn_room();
        let (_, mut rx) = handle.subscribe().await.unwrap();

        assert!(handle
            .command(PlayerId::new("z"), Command::SetReady)
            .await
            .is_err());
        handle
            .command(PlayerId::new("a"), Command::SetReady)
            .await
            .unwrap();

        match rx.recv().await {
            Some(StateChangeNotification::StateChanged(snapshot)) => {
                assert!(snapshot.players[&PlayerId::new("a")].is_ready);
            }
            other => panic!("unexpected notification: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_snapshot_redaction_through_handle() {
        let (handle, _) = spawn_room();
        for id in ["b", "c", "d"] {
            handle
                .command(
                    PlayerId::new(id),
                    Command::JoinRoom {
                        name: id.to_string(),
                    },
                )
                .await
                .unwrap();
        }
        for id in ["a", "b", "c", "d"] {
            handle
                .command(PlayerId::new(id), Command::SetReady)
                .await
                .unwrap();
        }

        let view = handle.snapshot(Some(PlayerId::new("b"))).await.unwrap();
        assert_eq!(view.phase, Phase::Bidding);
        assert_eq!(view.hands[&PlayerId::new("b")].len(), 13);
        assert!(view.hands[&PlayerId::new("a")].is_empty());
    }

    #[tokio::test]
    async fn test_subscriber_buffer_from_config() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let room = Room::create("T2", PlayerId::new("a"), "A", GameSettings::default());
        let config = RoomConfig {
            subscriber_buffer: 3,
            ..RoomConfig::default()
        };
        let (actor, handle) = RoomActor::new(room, config, store);
        tokio::spawn(actor.run());
        let (_, mut rx) = handle.subscribe().await.unwrap();

        // Each join sends StateChanged and PlayerListChanged.
        for id in ["b", "c", "d"] {
            handle
                .command(
                    PlayerId::new(id),
                    Command::JoinRoom {
                        name: id.to_string(),
                    },
                )
                .await
                .unwrap();
        }

        let mut received = Vec::new();
        while let Ok(notification) = rx.try_recv() {
            received.push(notification);
        }
        assert_eq!(received.len(), 3);
        match &received[2] {
            StateChangeNotification::StateChanged(snapshot) => assert_eq!(snapshot.seats.len(), 3),
            other => panic!("unexpected notification: {other:?}"),
        }

        // Drained subscribers receive again.
        handle
            .command(PlayerId::new("d"), Command::SetReady)
            .await
            .unwrap();
        assert!(matches!(
            rx.try_recv(),
            Ok(StateChangeNotification::StateChanged(_))
        ));
    }

    #[tokio::test]
    async fn test_close_stops_actor() {
        let (handle, _) = spawn_room();
        let (_, mut rx) = handle.subscribe_with_buffer(4).await.unwrap();
        handle.close().await.unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(StateChangeNotification::Closed)
        ));
        assert!(matches!(
            handle.info().await,
            Err(RoomError::Closed(code)) if code == "T1"
        ));
    }
}
