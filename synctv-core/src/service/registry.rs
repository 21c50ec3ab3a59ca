use std::sync::Arc;

use dashmap::DashMap;

use super::room_clock::RoomClock;
use crate::models::RoomId;

/// Playback clocks of the rooms hosted by this process.
///
/// Each room owns its own clock and lock; the map only serializes lookups
/// for the shard a room id falls into.
#[derive(Debug, Clone, Default)]
pub struct RoomClockRegistry {
    rooms: Arc<DashMap<RoomId, Arc<RoomClock>>>,
}

impl RoomClockRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock for `room_id`, created on first use.
    pub fn create(&self, room_id: RoomId) -> Arc<RoomClock> {
        Arc::clone(self.rooms.entry(room_id).or_default().value())
    }

    #[must_use]
    pub fn get(&self, room_id: &RoomId) -> Option<Arc<RoomClock>> {
        self.rooms.get(room_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Returns whether a clock was removed
    pub fn remove(&self, room_id: &RoomId) -> bool {
        self.rooms.remove(room_id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    #[must_use]
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn clear(&self) {
        self.rooms.clear();
    }
}
