//! Messages of `proto/client.proto` (package `synctv.client`). Field tags
//! must stay in step with the schema file.

/// Playback status of a room at the moment the message was built.
#[derive(Clone, Copy, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct Status {
    #[prost(double, tag = "1")]
    pub seek: f64,
    #[prost(double, tag = "2")]
    pub rate: f64,
    #[prost(bool, tag = "3")]
    pub playing: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct BilibiliVendorInfo {
    #[prost(string, tag = "1")]
    pub bvid: ::prost::alloc::string::String,
    #[prost(uint64, tag = "2")]
    pub cid: u64,
    #[prost(uint64, tag = "3")]
    pub epid: u64,
    #[prost(uint64, tag = "4")]
    pub quality: u64,
    #[prost(string, tag = "5")]
    pub vendor_name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct AlistVendorInfo {
    #[prost(string, tag = "1")]
    pub path: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub password: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub vendor_name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct EmbyVendorInfo {
    #[prost(string, tag = "1")]
    pub path: ::prost::alloc::string::String,
    #[prost(bool, tag = "2")]
    pub transcode: bool,
    #[prost(string, tag = "3")]
    pub vendor_name: ::prost::alloc::string::String,
}

/// Vendor envelope. `detail` carries at most one vendor-specific block.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct VendorInfo {
    #[prost(string, tag = "1")]
    pub vendor: ::prost::alloc::string::String,
    #[prost(bool, tag = "2")]
    pub shared: bool,
    #[prost(oneof = "vendor_info::Detail", tags = "3, 4, 5")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: ::core::option::Option<vendor_info::Detail>,
}

/// Nested message and enum types in `VendorInfo`.
pub mod vendor_info {
    #[derive(Clone, PartialEq, ::prost::Oneof, serde::Serialize, serde::Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Detail {
        #[prost(message, tag = "3")]
        Bilibili(super::BilibiliVendorInfo),
        #[prost(message, tag = "4")]
        Alist(super::AlistVendorInfo),
        #[prost(message, tag = "5")]
        Emby(super::EmbyVendorInfo),
    }
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct BaseMovieInfo {
    #[prost(string, tag = "1")]
    pub url: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(bool, tag = "3")]
    pub live: bool,
    #[prost(bool, tag = "4")]
    pub proxy: bool,
    #[prost(bool, tag = "5")]
    pub rtmp_source: bool,
    #[prost(string, tag = "6")]
    #[serde(rename = "type")]
    pub r#type: ::prost::alloc::string::String,
    #[prost(map = "string, string", tag = "7")]
    pub headers: ::std::collections::HashMap<
        ::prost::alloc::string::String,
        ::prost::alloc::string::String,
    >,
    #[prost(message, optional, tag = "8")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vendor_info: ::core::option::Option<VendorInfo>,
}

#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct MovieInfo {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub base: ::core::option::Option<BaseMovieInfo>,
    /// Unix milliseconds
    #[prost(int64, tag = "3")]
    pub created_at: i64,
    #[prost(string, tag = "4")]
    pub creator: ::prost::alloc::string::String,
}

/// Snapshot of what a room is playing, broadcast to every member.
#[derive(Clone, PartialEq, ::prost::Message, serde::Serialize, serde::Deserialize)]
pub struct Current {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub movie: ::core::option::Option<MovieInfo>,
    #[prost(message, optional, tag = "2")]
    pub status: ::core::option::Option<Status>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    fn bilibili_current() -> Current {
        Current {
            movie: Some(MovieInfo {
                id: "abcdefghijkl".to_string(),
                base: Some(BaseMovieInfo {
                    url: String::new(),
                    name: "episode 1".to_string(),
                    vendor_info: Some(VendorInfo {
                        vendor: "bilibili".to_string(),
                        shared: true,
                        detail: Some(vendor_info::Detail::Bilibili(BilibiliVendorInfo {
                            bvid: "BV1xx411c7mD".to_string(),
                            cid: 42,
                            ..Default::default()
                        })),
                    }),
                    ..Default::default()
                }),
                created_at: 1_700_000_000_000,
                creator: "alice".to_string(),
            }),
            status: Some(Status {
                seek: 12.5,
                rate: 1.0,
                playing: true,
            }),
        }
    }

    #[test]
    fn test_protobuf_keeps_vendor_oneof() {
        let current = bilibili_current();
        let bytes = current.encode_to_vec();
        let decoded = Current::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, current);
    }

    #[test]
    fn test_json_omits_absent_movie() {
        let current = Current {
            movie: None,
            status: Some(Status {
                seek: 0.0,
                rate: 1.0,
                playing: false,
            }),
        };
        let json = serde_json::to_value(&current).unwrap();
        assert!(json.get("movie").is_none());
        assert_eq!(json["status"]["rate"], 1.0);
    }

    #[test]
    fn test_json_vendor_detail_is_tagged() {
        let json = serde_json::to_value(bilibili_current()).unwrap();
        let vendor = &json["movie"]["base"]["vendor_info"];
        assert_eq!(vendor["vendor"], "bilibili");
        assert_eq!(vendor["detail"]["bilibili"]["cid"], 42);
        assert!(vendor["detail"].get("emby").is_none());
    }

    /// Field declarations of the schema file, as `(message, field, tag)`
    fn schema_fields() -> Vec<(String, String, u32)> {
        let schema = include_str!("../../proto/client.proto");
        let mut message = String::new();
        let mut fields = Vec::new();
        for line in schema.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("message ") {
                message = rest.trim_end_matches(" {").to_string();
                continue;
            }
            let Some((decl, tag)) = line.trim_end_matches(';').split_once(" = ") else {
                continue;
            };
            let (Some(name), Ok(tag)) = (decl.split_whitespace().last(), tag.parse::<u32>()) else {
                continue;
            };
            fields.push((message.clone(), name.to_string(), tag));
        }
        fields
    }

    #[test]
    fn test_tags_match_schema_file() {
        let declared: &[(&str, &[(&str, u32)])] = &[
            ("Status", &[("seek", 1), ("rate", 2), ("playing", 3)]),
            (
                "BilibiliVendorInfo",
                &[("bvid", 1), ("cid", 2), ("epid", 3), ("quality", 4), ("vendor_name", 5)],
            ),
            ("AlistVendorInfo", &[("path", 1), ("password", 2), ("vendor_name", 3)]),
            ("EmbyVendorInfo", &[("path", 1), ("transcode", 2), ("vendor_name", 3)]),
            (
                "VendorInfo",
                &[("vendor", 1), ("shared", 2), ("bilibili", 3), ("alist", 4), ("emby", 5)],
            ),
            (
                "BaseMovieInfo",
                &[
                    ("url", 1),
                    ("name", 2),
                    ("live", 3),
                    ("proxy", 4),
                    ("rtmp_source", 5),
                    ("type", 6),
                    ("headers", 7),
                    ("vendor_info", 8),
                ],
            ),
            ("MovieInfo", &[("id", 1), ("base", 2), ("created_at", 3), ("creator", 4)]),
            ("Current", &[("movie", 1), ("status", 2)]),
        ];
        let expected: Vec<(String, String, u32)> = declared
            .iter()
            .flat_map(|(message, fields)| {
                fields
                    .iter()
                    .map(move |(field, tag)| (message.to_string(), field.to_string(), *tag))
            })
            .collect();

        assert_eq!(schema_fields(), expected);
    }

    #[test]
    fn test_schema_tags_decode_into_messages() {
        // Hand-encoded per the schema: Current.status (2) { seek (1) = 2.5, playing (3) = true }
        let mut status = vec![0x09];
        status.extend_from_slice(&2.5f64.to_le_bytes());
        status.extend_from_slice(&[0x18, 0x01]);
        let mut bytes = vec![0x12, u8::try_from(status.len()).unwrap()];
        bytes.extend_from_slice(&status);

        let current = Current::decode(bytes.as_slice()).unwrap();
        assert!(current.movie.is_none());
        let status = current.status.unwrap();
        assert_eq!(status.seek, 2.5);
        assert!(status.playing);
        assert_eq!(status.rate, 0.0);
    }
}
