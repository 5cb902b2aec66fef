//! In-process room registry for local runs and tests.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::SessionError;
use crate::voice::RoomLifecycle;

/// Tracks open rooms in memory. Deletion is idempotent.
#[derive(Default)]
pub struct LocalRooms {
    open: Mutex<HashSet<String>>,
}

impl LocalRooms {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_open(&self, room: &str) -> bool {
        self.open.lock().await.contains(room)
    }

    pub async fn open_count(&self) -> usize {
        self.open.lock().await.len()
    }
}

#[async_trait]
impl RoomLifecycle for LocalRooms {
    async fn create_room(&self, room: &str) -> Result<(), SessionError> {
        if !self.open.lock().await.insert(room.to_string()) {
            return Err(SessionError::CreateFailed {
                room: room.to_string(),
                reason: "room already exists".into(),
            });
        }
        debug!(room, "Room created");
        Ok(())
    }

    async fn delete_room(&self, room: &str) -> Result<(), SessionError> {
        let removed = self.open.lock().await.remove(room);
        debug!(room, removed, "Room deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_delete_idempotent() {
        let rooms = LocalRooms::new();
        rooms.create_room("call-1").await.unwrap();
        assert!(rooms.is_open("call-1").await);
        assert!(rooms.create_room("call-1").await.is_err());

        rooms.delete_room("call-1").await.unwrap();
        rooms.delete_room("call-1").await.unwrap();
        assert!(!rooms.is_open("call-1").await);
        assert_eq!(rooms.open_count().await, 0);
    }
}
