//! Registry of live rooms.
//!
//! Owns the `code -> room` map, hands out unique room codes, drops rooms
//! that emptied or went stale, and schedules the deferred phase timers.
//! Room state itself is only ever changed through the room engine.

mod ops;
mod timer;

pub use ops::LeaveResult;

use crate::config::PhaseTimers;
use crate::error::{RoomError, RoomResult};
use crate::types::{Room, RoomCode};
use crate::words::WordCatalog;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

const ROOM_CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ROOM_CODE_LENGTH: usize = 4;
/// Random draws before giving up on finding a free code
const MAX_CODE_ATTEMPTS: usize = 1000;

/// Generate a random room code (4 uppercase letters)
fn generate_room_code() -> RoomCode {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LENGTH)
        .map(|_| ROOM_CODE_CHARS[rng.random_range(0..ROOM_CODE_CHARS.len())] as char)
        .collect()
}

/// A random code for which `taken` is false, or None if every draw collided
fn unused_room_code(taken: impl Fn(&str) -> bool) -> Option<RoomCode> {
    (0..MAX_CODE_ATTEMPTS)
        .map(|_| generate_room_code())
        .find(|code| !taken(code))
}

/// One lock per room: operations on a room are serialized, rooms are independent
pub(crate) type RoomHandle = Arc<Mutex<Room>>;

/// Shared application state
#[derive(Clone)]
pub struct Registry {
    rooms: Arc<RwLock<HashMap<RoomCode, RoomHandle>>>,
    catalog: Arc<WordCatalog>,
    timers: PhaseTimers,
}

impl Registry {
    pub fn new(catalog: WordCatalog, timers: PhaseTimers) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            catalog: Arc::new(catalog),
            timers,
        }
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn contains(&self, code: &str) -> bool {
        self.rooms.read().await.contains_key(code)
    }

    /// A code no live room is using
    pub async fn generate_unique_code(&self) -> RoomResult<RoomCode> {
        let rooms = self.rooms.read().await;
        unused_room_code(|code| rooms.contains_key(code)).ok_or(RoomError::NoFreeRoomCode)
    }

    /// Register a freshly created room. The map lock is held while the code
    /// is picked so two concurrent creations cannot claim the same code.
    async fn insert_new_room(&self, host_id: &str, host_name: String) -> RoomResult<Room> {
        let mut rooms = self.rooms.write().await;
        let Some(code) = unused_room_code(|code| rooms.contains_key(code)) else {
            tracing::warn!(rooms = rooms.len(), "No free room code found");
            return Err(RoomError::NoFreeRoomCode);
        };

        let room = Room::new(code.clone(), host_id.to_string(), host_name);
        rooms.insert(code, Arc::new(Mutex::new(room.clone())));
        Ok(room)
    }

    pub(crate) async fn handle(&self, code: &str) -> RoomResult<RoomHandle> {
        self.rooms
            .read()
            .await
            .get(code)
            .cloned()
            .ok_or_else(|| RoomError::RoomNotFound(code.to_string()))
    }

    /// Drop the room if it is still empty. Called after its last player left,
    /// with no room lock held.
    async fn remove_if_empty(&self, code: &str) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(handle) = rooms.get(code).cloned() else {
            return false;
        };
        if !handle.lock().await.is_empty() {
            // Someone joined in between
            return false;
        }
        rooms.remove(code);
        tracing::info!(room = code, "Removed empty room");
        true
    }

    /// Remove every room created more than `max_age` ago. Returns how many
    /// rooms were evicted.
    pub async fn evict_stale(&self, max_age: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(max_age)
            .ok()
            .and_then(|age| chrono::Utc::now().checked_sub_signed(age))
        else {
            return 0;
        };

        let mut rooms = self.rooms.write().await;
        let mut stale = Vec::new();
        for (code, handle) in rooms.iter() {
            if handle.lock().await.created_at < cutoff {
                stale.push(code.clone());
            }
        }
        for code in &stale {
            rooms.remove(code);
        }

        if !stale.is_empty() {
            tracing::info!(count = stale.len(), rooms = ?stale, "Evicted stale rooms");
        }
        stale.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(WordCatalog::default(), PhaseTimers::default())
    }
}
