use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MediaId, UserId};

/// Media selected as a room's current item.
///
/// A room holds exactly one `Media` at a time. Switching media replaces the
/// whole value; the fields of a selected media never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: MediaId,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
    pub base: MediaBase,
}

/// Source description of a media item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaBase {
    pub url: String,
    pub name: String,
    /// Live streams have no seekable offset
    pub live: bool,
    pub proxy: bool,
    pub rtmp_source: bool,
    /// Container/stream type hint for the player (e.g. "m3u8", "flv")
    #[serde(rename = "type")]
    pub media_type: String,
    pub headers: HashMap<String, String>,
    pub vendor_info: Option<VendorInfo>,
}

/// Provider that resolves the playable address of a media item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorInfo {
    /// Whether the vendor credentials of the creator are shared with the room
    pub shared: bool,
    pub source: VendorSource,
}

/// Vendor-specific locator. Exactly one variant applies to a media item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorSource {
    Bilibili(BilibiliSource),
    Alist(AlistSource),
    Emby(EmbySource),
    /// Vendor without a structured locator; only its tag is known
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BilibiliSource {
    pub bvid: String,
    pub cid: u64,
    pub epid: u64,
    pub quality: u64,
    pub vendor_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlistSource {
    pub path: String,
    pub password: Option<String>,
    pub vendor_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbySource {
    pub path: String,
    pub transcode: bool,
    pub vendor_name: String,
}

impl VendorSource {
    /// Vendor tag as it appears on the wire
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Bilibili(_) => "bilibili",
            Self::Alist(_) => "alist",
            Self::Emby(_) => "emby",
            Self::Other(tag) => tag,
        }
    }
}

impl Media {
    /// Create a media item with a fresh id, created now.
    #[must_use]
    pub fn new(creator_id: UserId, base: MediaBase) -> Self {
        Self {
            id: MediaId::new(),
            creator_id,
            created_at: Utc::now(),
            base,
        }
    }

    /// The "nothing selected" sentinel.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: MediaId::from_string(String::new()),
            creator_id: UserId::from_string(String::new()),
            created_at: DateTime::<Utc>::default(),
            base: MediaBase::default(),
        }
    }

    /// Plain URL media (on-demand)
    #[must_use]
    pub fn direct(creator_id: UserId, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(
            creator_id,
            MediaBase {
                url: url.into(),
                name: name.into(),
                ..MediaBase::default()
            },
        )
    }

    /// Live stream media
    #[must_use]
    pub fn live(creator_id: UserId, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(
            creator_id,
            MediaBase {
                url: url.into(),
                name: name.into(),
                live: true,
                ..MediaBase::default()
            },
        )
    }

    #[must_use]
    pub fn with_vendor(mut self, shared: bool, source: VendorSource) -> Self {
        self.base.vendor_info = Some(VendorInfo { shared, source });
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.base.live
    }
}

impl Default for Media {
    fn default() -> Self {
        Self::empty()
    }
}
