//! Persistence collaborator for room snapshots and round results.
//!
//! The actor hands every committed snapshot to a [`SnapshotStore`]. Storage
//! technology is up to the implementor; [`InMemorySnapshotStore`] keeps JSON
//! in memory and is what tests and the simulator use.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::game::{RoomSnapshot, entities::RoundResult};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Snapshot store unavailable: {0}")]
    Unavailable(String),

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Replace the stored snapshot for `snapshot.code`.
    async fn save_snapshot(&self, snapshot: &RoomSnapshot) -> Result<(), StoreError>;

    async fn load_snapshot(&self, code: &str) -> Result<Option<RoomSnapshot>, StoreError>;

    /// Append a finished round. Stored rounds are never rewritten.
    async fn append_round(&self, code: &str, result: &RoundResult) -> Result<(), StoreError>;

    async fn rounds(&self, code: &str) -> Result<Vec<RoundResult>, StoreError>;

    /// Forget the snapshot. Round results stay for auditing.
    async fn remove(&self, code: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshots: RwLock<HashMap<String, String>>,
    rounds: RwLock<HashMap<String, Vec<RoundResult>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot_count(&self) -> usize {
        self.snapshots.read().await.len()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn save_snapshot(&self, snapshot: &RoomSnapshot) -> Result<(), StoreError> {
        let json = snapshot.to_json()?;
        self.snapshots
            .write()
            .await
            .insert(snapshot.code.clone(), json);
        Ok(())
    }

    async fn load_snapshot(&self, code: &str) -> Result<Option<RoomSnapshot>, StoreError> {
        let snapshots = self.snapshots.read().await;
        snapshots
            .get(code)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn append_round(&self, code: &str, result: &RoundResult) -> Result<(), StoreError> {
        self.rounds
            .write()
            .await
            .entry(code.to_string())
            .or_default()
            .push(result.clone());
        Ok(())
    }

    async fn rounds(&self, code: &str) -> Result<Vec<RoundResult>, StoreError> {
        Ok(self
            .rounds
            .read()
            .await
            .get(code)
            .cloned()
            .unwrap_or_default())
    }

    async fn remove(&self, code: &str) -> Result<(), StoreError> {
        self.snapshots.write().await.remove(code);
        Ok(())
    }
}
