//! Room playback clock model
//!
//! Position is evaluated lazily: `seek` is the position at `as_of`, and the
//! true position of a playing, non-live item at time `t` is
//! `seek + (t - as_of) * rate`. Nothing ticks in the background; every read
//! or write materializes the position first.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::media::Media;

/// Playback speed reported for live media
pub const LIVE_RATE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    /// Position in seconds at `as_of`
    pub seek: f64,
    pub rate: f64,
    pub playing: bool,
    #[serde(skip, default = "Instant::now")]
    as_of: Instant,
}

impl PlaybackStatus {
    /// Paused at the origin, normal speed
    #[must_use]
    pub fn new() -> Self {
        Self::new_at(Instant::now())
    }

    #[must_use]
    pub const fn new_at(as_of: Instant) -> Self {
        Self {
            seek: 0.0,
            rate: 1.0,
            playing: false,
            as_of,
        }
    }

    pub(crate) const fn as_of(&self) -> Instant {
        self.as_of
    }

    /// Position this status projects to at `now`, without materializing it.
    #[must_use]
    pub fn position_at(&self, now: Instant) -> f64 {
        if self.playing {
            self.seek + now.saturating_duration_since(self.as_of).as_secs_f64() * self.rate
        } else {
            self.seek
        }
    }
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// The media a room is playing together with its playback status.
///
/// The two halves only change together; see [`crate::service::RoomClock`]
/// for the lock that guards them.
#[derive(Debug, Clone)]
pub struct CurrentPlayback {
    pub media: Arc<Media>,
    pub status: PlaybackStatus,
}

impl CurrentPlayback {
    #[must_use]
    pub fn new() -> Self {
        Self {
            media: Arc::new(Media::empty()),
            status: PlaybackStatus::new(),
        }
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.media.is_live()
    }

    /// Materialize the position at `now`.
    pub fn advance_to(&mut self, now: Instant) {
        if self.is_live() {
            self.set_live_status(now);
            return;
        }
        self.status.seek = self.status.position_at(now);
        self.status.as_of = now;
    }

    /// Switch media and restart from the origin. Rate carries over.
    pub fn set_media(&mut self, media: Arc<Media>, auto_play: bool, now: Instant) {
        self.media = media;
        if self.is_live() {
            self.set_live_status(now);
            return;
        }
        self.status.seek = 0.0;
        self.status.playing = auto_play;
        self.status.as_of = now;
    }

    /// Apply a client-reported state measured `delay` seconds ago.
    pub fn set_status(
        &mut self,
        playing: bool,
        seek: f64,
        rate: f64,
        delay: f64,
        now: Instant,
    ) -> PlaybackStatus {
        if self.is_live() {
            return self.set_live_status(now);
        }
        self.status.playing = playing;
        self.status.rate = rate;
        self.status.seek = if playing { seek + delay * rate } else { seek };
        self.status.as_of = now;
        self.status
    }

    /// Change rate and position without touching play/pause.
    ///
    /// The projection uses the new rate.
    pub fn set_rate_seek(&mut self, seek: f64, rate: f64, delay: f64, now: Instant) -> PlaybackStatus {
        if self.is_live() {
            return self.set_live_status(now);
        }
        self.status.seek = if self.status.playing {
            seek + delay * rate
        } else {
            seek
        };
        self.status.rate = rate;
        self.status.as_of = now;
        self.status
    }

    pub fn set_seek(&mut self, seek: f64, delay: f64, now: Instant) -> PlaybackStatus {
        if self.is_live() {
            return self.set_live_status(now);
        }
        self.status.seek = if self.status.playing {
            seek + delay * self.status.rate
        } else {
            seek
        };
        self.status.as_of = now;
        self.status
    }

    fn set_live_status(&mut self, now: Instant) -> PlaybackStatus {
        self.status.playing = true;
        self.status.rate = LIVE_RATE;
        self.status.seek = 0.0;
        self.status.as_of = now;
        self.status
    }
}

impl Default for CurrentPlayback {
    fn default() -> Self {
        Self::new()
    }
}
