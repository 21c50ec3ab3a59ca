//! Playback command handling
//!
//! Entry point for the session layer: resolves the room's clock, sanitizes
//! client-reported numbers, applies the command and hands the resulting
//! snapshot to the broadcaster. Within a room, each command's write, message
//! and broadcast complete before the next command's write.

use std::sync::Arc;

use synctv_proto::client as pb;

use tokio::time::Instant;

use super::{
    registry::RoomClockRegistry,
    room_clock::{shared_media, RoomClock},
    sync_message::SyncMessageBuilder,
};
use crate::{
    config::PlaybackConfig,
    models::{CurrentPlayback, Media, PlaybackStatus, RoomId},
    Error, Result,
};

/// Trait for pushing a room's new playback state to its members.
///
/// The transport lives in the API layer; implementations should not block
/// (fire-and-forget).
#[cfg_attr(test, mockall::automock)]
pub trait PlaybackBroadcaster: Send + Sync {
    fn broadcast_current(&self, room_id: &RoomId, current: &pb::Current);
}

/// Playback management service
#[derive(Clone)]
pub struct PlaybackService {
    rooms: RoomClockRegistry,
    messages: SyncMessageBuilder,
    config: PlaybackConfig,
    broadcaster: Option<Arc<dyn PlaybackBroadcaster>>,
}

impl std::fmt::Debug for PlaybackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackService")
            .field("rooms", &self.rooms.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PlaybackService {
    #[must_use]
    pub fn new(rooms: RoomClockRegistry, messages: SyncMessageBuilder, config: PlaybackConfig) -> Self {
        Self {
            rooms,
            messages,
            config,
            broadcaster: None,
        }
    }

    pub fn set_broadcaster(&mut self, broadcaster: Arc<dyn PlaybackBroadcaster>) {
        self.broadcaster = Some(broadcaster);
    }

    #[must_use]
    pub const fn rooms(&self) -> &RoomClockRegistry {
        &self.rooms
    }

    /// Start tracking a room's clock. Idempotent.
    pub fn create_room(&self, room_id: RoomId) -> Arc<RoomClock> {
        tracing::debug!(room_id = %room_id, "Room clock created");
        self.rooms.create(room_id)
    }

    /// Returns whether the room was tracked
    pub fn close_room(&self, room_id: &RoomId) -> bool {
        let removed = self.rooms.remove(room_id);
        if removed {
            tracing::debug!(room_id = %room_id, "Room clock discarded");
        }
        removed
    }

    /// Message for a joining client or a periodic resync
    pub async fn current(&self, room_id: &RoomId) -> Result<pb::Current> {
        let clock = self.clock(room_id)?;
        Ok(self.messages.build(&clock.snapshot()).await)
    }

    pub fn status(&self, room_id: &RoomId) -> Result<PlaybackStatus> {
        Ok(self.clock(room_id)?.status())
    }

    pub fn media(&self, room_id: &RoomId) -> Result<Arc<Media>> {
        Ok(self.clock(room_id)?.media())
    }

    /// Switch media (`None` clears the selection)
    pub async fn select_media(
        &self,
        room_id: &RoomId,
        media: Option<Media>,
        auto_play: bool,
    ) -> Result<pb::Current> {
        let clock = self.clock(room_id)?;
        let media_id = media.as_ref().map(|m| m.id.to_string()).unwrap_or_default();
        let media = shared_media(media);
        let ((), message) = self
            .publish(room_id, &clock, |current, now| {
                current.set_media(media, auto_play, now);
            })
            .await;

        tracing::info!(
            room_id = %room_id,
            media_id = %media_id,
            auto_play,
            "Room media switched"
        );

        Ok(message)
    }

    pub async fn set_playback_state(
        &self,
        room_id: &RoomId,
        playing: bool,
        seek: f64,
        rate: f64,
        delay: f64,
    ) -> Result<pb::Current> {
        validate_seek(seek)?;
        validate_rate(rate)?;
        let delay = self.clamp_delay(delay);
        let clock = self.clock(room_id)?;

        let (status, message) = self
            .publish(room_id, &clock, |current, now| {
                current.set_status(playing, seek, rate, delay, now)
            })
            .await;
        tracing::debug!(
            room_id = %room_id,
            playing = status.playing,
            seek = status.seek,
            rate = status.rate,
            delay,
            "Playback state set"
        );

        Ok(message)
    }

    pub async fn set_rate_and_seek(
        &self,
        room_id: &RoomId,
        seek: f64,
        rate: f64,
        delay: f64,
    ) -> Result<pb::Current> {
        validate_seek(seek)?;
        validate_rate(rate)?;
        let delay = self.clamp_delay(delay);
        let clock = self.clock(room_id)?;

        let (status, message) = self
            .publish(room_id, &clock, |current, now| {
                current.set_rate_seek(seek, rate, delay, now)
            })
            .await;
        tracing::debug!(
            room_id = %room_id,
            seek = status.seek,
            rate = status.rate,
            delay,
            "Playback rate and seek set"
        );

        Ok(message)
    }

    pub async fn set_seek(&self, room_id: &RoomId, seek: f64, delay: f64) -> Result<pb::Current> {
        validate_seek(seek)?;
        let delay = self.clamp_delay(delay);
        let clock = self.clock(room_id)?;

        let (status, message) = self
            .publish(room_id, &clock, |current, now| current.set_seek(seek, delay, now))
            .await;
        tracing::debug!(room_id = %room_id, seek = status.seek, delay, "Playback seek set");

        Ok(message)
    }

    fn clock(&self, room_id: &RoomId) -> Result<Arc<RoomClock>> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| Error::NotFound(format!("Room {room_id} not found")))
    }

    /// Negative or non-finite estimates count as no delay.
    fn clamp_delay(&self, delay: f64) -> f64 {
        if !delay.is_finite() || delay <= 0.0 {
            return 0.0;
        }
        delay.min(self.config.max_delay_seconds)
    }

    /// Apply a change and broadcast the state it produced.
    ///
    /// The message is built from the snapshot taken in the same write, and
    /// the room's publish turn is held until it has been broadcast, so
    /// members receive changes in the order they were applied.
    async fn publish<R>(
        &self,
        room_id: &RoomId,
        clock: &RoomClock,
        apply: impl FnOnce(&mut CurrentPlayback, Instant) -> R,
    ) -> (R, pb::Current) {
        let _turn = clock.publish_turn().await;
        let (result, snapshot) = clock.update(apply);
        let message = self.messages.build(&snapshot).await;
        if let Some(ref broadcaster) = self.broadcaster {
            broadcaster.broadcast_current(room_id, &message);
        }
        (result, message)
    }
}

fn validate_seek(seek: f64) -> Result<()> {
    if seek.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidInput("Seek must be a finite number".to_string()))
    }
}

fn validate_rate(rate: f64) -> Result<()> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(
            "Rate must be a finite, non-negative number".to_string(),
        ))
    }
}
