//! Per-room playback clock
//!
//! One [`RoomClock`] is shared by every connection of a room. Media and
//! status sit behind a single lock so a media switch is never observed
//! without its position reset. Reads that report a position advance the
//! clock first, so they take the lock exclusively too. Critical sections are
//! plain arithmetic; nothing awaits or does I/O while the lock is held.
//!
//! Publishing a change involves awaits (name lookups, fan-out), so it is
//! ordered by a separate async turn lock: whoever holds the turn writes,
//! builds and broadcasts before the next writer starts.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

use crate::models::{CurrentPlayback, Media, PlaybackStatus};

#[derive(Debug, Default)]
pub struct RoomClock {
    current: RwLock<CurrentPlayback>,
    publish_turn: Mutex<()>,
}

impl RoomClock {
    /// No media, paused at the origin
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Media and status as of now
    #[must_use]
    pub fn snapshot(&self) -> CurrentPlayback {
        self.update(|current, now| current.advance_to(now)).1
    }

    /// Status as of now
    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.snapshot().status
    }

    /// Currently selected media. Does not advance the clock.
    #[must_use]
    pub fn media(&self) -> Arc<Media> {
        Arc::clone(&self.current.read().media)
    }

    /// Run `apply` under the write lock and return its result together with
    /// the state it left behind.
    pub fn update<R>(
        &self,
        apply: impl FnOnce(&mut CurrentPlayback, Instant) -> R,
    ) -> (R, CurrentPlayback) {
        let mut current = self.current.write();
        let result = apply(&mut current, Instant::now());
        (result, current.clone())
    }

    /// Wait until no other change of this room is being published.
    pub async fn publish_turn(&self) -> MutexGuard<'_, ()> {
        self.publish_turn.lock().await
    }

    /// Select new media, or clear the selection with `None`.
    ///
    /// An empty media is stored as the shared "no media" sentinel.
    pub fn replace_media(&self, media: Option<Media>, auto_play: bool) -> PlaybackStatus {
        let media = shared_media(media);
        self.update(|current, now| current.set_media(media, auto_play, now))
            .1
            .status
    }

    pub fn set_status(&self, playing: bool, seek: f64, rate: f64, delay: f64) -> PlaybackStatus {
        self.update(|current, now| current.set_status(playing, seek, rate, delay, now))
            .0
    }

    pub fn set_rate_seek(&self, seek: f64, rate: f64, delay: f64) -> PlaybackStatus {
        self.update(|current, now| current.set_rate_seek(seek, rate, delay, now))
            .0
    }

    pub fn set_seek(&self, seek: f64, delay: f64) -> PlaybackStatus {
        self.update(|current, now| current.set_seek(seek, delay, now)).0
    }
}

/// `None` and empty media both become the "no media" sentinel.
pub(crate) fn shared_media(media: Option<Media>) -> Arc<Media> {
    Arc::new(media.filter(|m| !m.is_empty()).unwrap_or_else(Media::empty))
}
