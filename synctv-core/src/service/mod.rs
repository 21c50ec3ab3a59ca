pub mod playback;
pub mod registry;
pub mod room_clock;
pub mod sync_message;
pub mod user_directory;

pub use playback::{PlaybackBroadcaster, PlaybackService};
pub use registry::RoomClockRegistry;
pub use room_clock::RoomClock;
pub use sync_message::{status_message, SyncMessageBuilder};
pub use user_directory::{
    resolve_display_name, CachedUserDirectory, UserDirectory, UsernameStore, UNKNOWN_USERNAME,
};
