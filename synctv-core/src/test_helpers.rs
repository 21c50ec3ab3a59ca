//! Test helpers and fixtures for synctv-core tests

use std::sync::Arc;

use crate::config::PlaybackConfig;
use crate::models::{Media, MediaBase, RoomId, UserId, VendorSource};
use crate::service::{PlaybackService, RoomClockRegistry, SyncMessageBuilder, UsernameStore};

/// Create a test user ID
pub fn test_user_id(id: &str) -> UserId {
    UserId::from_string(id.to_string())
}

/// Create a test room ID
pub fn test_room_id(id: &str) -> RoomId {
    RoomId::from_string(id.to_string())
}

/// Generate a random room ID for testing
pub fn random_room_id() -> RoomId {
    RoomId::new()
}

/// Playback service over a fresh registry, resolving names from `users`
pub fn playback_service(users: &UsernameStore) -> PlaybackService {
    PlaybackService::new(
        RoomClockRegistry::new(),
        SyncMessageBuilder::new(Arc::new(users.clone())),
        PlaybackConfig::default(),
    )
}

/// Test fixture builder for Media
pub struct MediaFixture {
    creator_id: UserId,
    base: MediaBase,
    vendor: Option<(bool, VendorSource)>,
}

impl MediaFixture {
    pub fn new() -> Self {
        Self {
            creator_id: UserId::new(),
            base: MediaBase {
                url: "https://example.com/video.mp4".to_string(),
                name: "Test Video".to_string(),
                media_type: "mp4".to_string(),
                ..MediaBase::default()
            },
            vendor: None,
        }
    }

    pub fn with_creator(mut self, creator_id: UserId) -> Self {
        self.creator_id = creator_id;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.base.name = name.to_string();
        self
    }

    pub fn live(mut self) -> Self {
        self.base.live = true;
        self.base.media_type = "m3u8".to_string();
        self
    }

    pub fn with_vendor(mut self, shared: bool, source: VendorSource) -> Self {
        self.vendor = Some((shared, source));
        self
    }

    pub fn build(self) -> Media {
        let media = Media::new(self.creator_id, self.base);
        match self.vendor {
            Some((shared, source)) => media.with_vendor(shared, source),
            None => media,
        }
    }
}

impl Default for MediaFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Async test wrapper with timeout
///
/// Use this to prevent tests from hanging indefinitely.
pub async fn with_timeout<F>(duration: std::time::Duration, future: F) -> F::Output
where
    F: std::future::Future,
{
    tokio::select! {
        result = future => result,
        _ = tokio::time::sleep(duration) => {
            panic!("Test timed out after {:?}", duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_fixture() {
        let creator = test_user_id("creator1");
        let media = MediaFixture::new()
            .with_creator(creator.clone())
            .with_name("episode 1")
            .build();

        assert_eq!(media.creator_id, creator);
        assert_eq!(media.base.name, "episode 1");
        assert!(!media.is_empty());
        assert!(!media.is_live());
        assert!(MediaFixture::new().live().build().is_live());
    }

    #[tokio::test]
    async fn test_fixture_service_tracks_rooms() {
        let service = playback_service(&UsernameStore::new());
        let room = test_room_id("room1");
        service.create_room(room.clone());
        let message = with_timeout(std::time::Duration::from_secs(1), service.current(&room))
            .await
            .unwrap();
        assert!(message.movie.is_none());
        assert_ne!(random_room_id(), room);
    }
}
