//! Room module providing per-room actors.
//!
//! Each room runs in its own Tokio task with an mpsc inbox and owns its
//! [`Room`](crate::game::Room) outright; rooms share no mutable state. A
//! command is validated and committed in one synchronous step, then the new
//! snapshot is handed to the [`SnapshotStore`] and broadcast to subscribers
//! without waiting on them. [`RoomManager`] only keeps the registry of
//! handles.
//!
//! ## Example
//!
//! ```no_run
//! use kaali_teeri::{Command, PlayerId, room::RoomManager};
//!
//! # async fn demo() -> Result<(), kaali_teeri::room::RoomError> {
//! let manager = RoomManager::default();
//! let room = manager.create_room(PlayerId::new("host"), "Host").await?;
//! room.command(PlayerId::new("guest"), Command::JoinRoom { name: "Guest".into() })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod manager;
pub mod messages;
pub mod store;

pub use actor::{RoomActor, RoomHandle};
pub use config::{ConfigError, RoomConfig};
pub use errors::{RoomError, RoomResult};
pub use manager::RoomManager;
pub use messages::{RoomInfo, RoomMessage, StateChangeNotification};
pub use store::{InMemorySnapshotStore, SnapshotStore, StoreError};
