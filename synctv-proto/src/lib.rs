//! SyncTV Protocol Definitions
//!
//! Wire types pushed to room members. The schema is `proto/client.proto`;
//! messages derive `prost::Message` so the WebSocket layer can send them as
//! binary protobuf frames, and serde so the same values can be emitted as
//! JSON.

// Client-facing room synchronization messages
pub mod client;

pub use client::{
    vendor_info, AlistVendorInfo, BaseMovieInfo, BilibiliVendorInfo, Current, EmbyVendorInfo,
    MovieInfo, Status, VendorInfo,
};
