//! Data models for service responses.
//!
//! Only the shapes the client pipeline touches are modelled: the account
//! config, the device list, search rows, and the catalog items those rows
//! carry.

pub mod album;
pub mod artist;
pub mod common;
pub mod config;
pub mod device;
pub mod playlist;
pub mod search;
pub mod track;

// Re-exports for convenience
pub use album::Album;
pub use artist::Artist;
pub use common::{ArtRef, StreamQuality, Subscription};
pub use config::{Config, ConfigBuilder, RemoteConfig};
pub use device::{Device, DeviceList, DeviceType};
pub use playlist::Playlist;
pub use search::{ResultType, SearchResponse, SearchResult, SearchTypes};
pub use track::Track;
