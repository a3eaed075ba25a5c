//! Room manager for spawning and tracking room actors.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use super::{
    actor::{RoomActor, RoomHandle},
    config::RoomConfig,
    errors::{RoomError, RoomResult},
    messages::RoomInfo,
    store::{InMemorySnapshotStore, SnapshotStore},
};
use crate::game::{Room, entities::PlayerId};
use crate::utils::{generate_room_code, is_valid_room_code};

/// Attempts at drawing an unused random code before giving up.
const CODE_ATTEMPTS: usize = 16;

/// Registry of running rooms. Holds handles only; every room's state lives
/// in its own actor task.
#[derive(Clone)]
pub struct RoomManager {
    rooms: Arc<RwLock<HashMap<String, RoomHandle>>>,
    store: Arc<dyn SnapshotStore>,
    default_config: RoomConfig,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(Arc::new(InMemorySnapshotStore::new()), RoomConfig::default())
    }
}

impl RoomManager {
    pub fn new(store: Arc<dyn SnapshotStore>, default_config: RoomConfig) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            store,
            default_config,
        }
    }

    /// CreateRoom: opens a room under a fresh random code with `host` seated
    /// and dealing first.
    pub async fn create_room(&self, host: PlayerId, host_name: &str) -> RoomResult<RoomHandle> {
        self.create_room_with(host, host_name, self.default_config.clone())
            .await
    }

    pub async fn create_room_with(
        &self,
        host: PlayerId,
        host_name: &str,
        config: RoomConfig,
    ) -> RoomResult<RoomHandle> {
        config.validate()?;

        let mut rooms = self.rooms.write().await;
        let code = (0..CODE_ATTEMPTS)
            .map(|_| generate_room_code())
            .find(|code| !rooms.contains_key(code))
            .ok_or_else(|| RoomError::AlreadyExists("<random>".to_string()))?;
        let handle = Self::spawn(&code, host, host_name, config, self.store.clone());
        rooms.insert(code, handle.clone());

        Ok(handle)
    }

    /// Opens a room under a caller-chosen code such as `MAIN`.
    pub async fn create_named_room(
        &self,
        code: &str,
        host: PlayerId,
        host_name: &str,
        config: RoomConfig,
    ) -> RoomResult<RoomHandle> {
        if !is_valid_room_code(code) {
            return Err(RoomError::InvalidCode(code.to_string()));
        }
        config.validate()?;

        let mut rooms = self.rooms.write().await;
        if rooms.get(code).is_some_and(|handle| !handle.is_closed()) {
            return Err(RoomError::AlreadyExists(code.to_string()));
        }
        let handle = Self::spawn(code, host, host_name, config, self.store.clone());
        rooms.insert(code.to_string(), handle.clone());

        Ok(handle)
    }

    fn spawn(
        code: &str,
        host: PlayerId,
        host_name: &str,
        config: RoomConfig,
        store: Arc<dyn SnapshotStore>,
    ) -> RoomHandle {
        let mut room = Room::create(code, host, host_name, config.settings.clone());
        if let Some(seed) = config.seed {
            room = room.with_seed(seed);
        }
        let (actor, handle) = RoomActor::new(room, config, store);

        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!("Created and spawned room {}", code);
        handle
    }

    pub async fn get_room(&self, code: &str) -> RoomResult<RoomHandle> {
        let rooms = self.rooms.read().await;
        rooms
            .get(code)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(code.to_string()))
    }

    /// Summaries of all live rooms, sorted by code. Rooms whose actor has
    /// stopped are skipped.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        let handles: Vec<RoomHandle> = self.rooms.read().await.values().cloned().collect();

        let mut infos = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.info().await {
                Ok(info) => infos.push(info),
                Err(e) => log::debug!("Skipping room {}: {}", handle.code(), e),
            }
        }
        infos.sort_by(|a, b| a.code.cmp(&b.code));
        infos
    }

    /// Stops the room's actor and forgets it.
    pub async fn close_room(&self, code: &str) -> RoomResult<()> {
        let handle = self
            .rooms
            .write()
            .await
            .remove(code)
            .ok_or_else(|| RoomError::NotFound(code.to_string()))?;

        match handle.close().await {
            Ok(()) | Err(RoomError::Closed(_)) => {}
            Err(e) => return Err(e),
        }

        log::info!("Closed room {}", code);
        Ok(())
    }

    pub async fn active_room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.values().filter(|handle| !handle.is_closed()).count()
    }
}
