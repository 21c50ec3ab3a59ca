pub mod id;
pub mod media;
pub mod playback;
pub mod room;

pub use id::{generate_id, MediaId, RoomId, UserId};
pub use media::{
    AlistSource, BilibiliSource, EmbySource, Media, MediaBase, VendorInfo, VendorSource,
};
pub use playback::{CurrentPlayback, PlaybackStatus, LIVE_RATE};
pub use room::{CreateRoomRequest, LoginRoomRequest, SetRoomPasswordRequest, UsernameRequest};
