//! Projection of a room's playback snapshot into the broadcast message

use std::sync::Arc;

use synctv_proto::client as pb;

use super::user_directory::{resolve_display_name, UserDirectory};
use crate::models::{CurrentPlayback, Media, PlaybackStatus, VendorInfo, VendorSource};

/// Builds [`pb::Current`] messages for fan-out to room members.
#[derive(Clone)]
pub struct SyncMessageBuilder {
    users: Arc<dyn UserDirectory>,
}

impl std::fmt::Debug for SyncMessageBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncMessageBuilder").finish_non_exhaustive()
    }
}

impl SyncMessageBuilder {
    #[must_use]
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// The media block is omitted when nothing is selected.
    pub async fn build(&self, current: &CurrentPlayback) -> pb::Current {
        let movie = if current.media.is_empty() {
            None
        } else {
            Some(self.movie_info(&current.media).await)
        };

        pb::Current {
            movie,
            status: Some(status_message(&current.status)),
        }
    }

    async fn movie_info(&self, media: &Media) -> pb::MovieInfo {
        let creator = resolve_display_name(self.users.as_ref(), &media.creator_id).await;
        let base = &media.base;

        pb::MovieInfo {
            id: media.id.to_string(),
            base: Some(pb::BaseMovieInfo {
                url: base.url.clone(),
                name: base.name.clone(),
                live: base.live,
                proxy: base.proxy,
                rtmp_source: base.rtmp_source,
                r#type: base.media_type.clone(),
                headers: base.headers.clone(),
                vendor_info: base
                    .vendor_info
                    .as_ref()
                    .filter(|info| !info.source.tag().is_empty())
                    .map(vendor_message),
            }),
            created_at: media.created_at.timestamp_millis(),
            creator,
        }
    }
}

#[must_use]
pub fn status_message(status: &PlaybackStatus) -> pb::Status {
    pb::Status {
        seek: status.seek,
        rate: status.rate,
        playing: status.playing,
    }
}

/// Vendors without a structured locator only carry their tag. Callers skip
/// vendor info whose tag is blank.
fn vendor_message(info: &VendorInfo) -> pb::VendorInfo {
    use pb::vendor_info::Detail;

    let detail = match &info.source {
        VendorSource::Bilibili(b) => Some(Detail::Bilibili(pb::BilibiliVendorInfo {
            bvid: b.bvid.clone(),
            cid: b.cid,
            epid: b.epid,
            quality: b.quality,
            vendor_name: b.vendor_name.clone(),
        })),
        VendorSource::Alist(a) => Some(Detail::Alist(pb::AlistVendorInfo {
            path: a.path.clone(),
            password: a.password.clone().unwrap_or_default(),
            vendor_name: a.vendor_name.clone(),
        })),
        VendorSource::Emby(e) => Some(Detail::Emby(pb::EmbyVendorInfo {
            path: e.path.clone(),
            transcode: e.transcode,
            vendor_name: e.vendor_name.clone(),
        })),
        VendorSource::Other(_) => None,
    };

    pb::VendorInfo {
        vendor: info.source.tag().to_string(),
        shared: info.shared,
        detail,
    }
}
