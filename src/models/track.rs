//! Track model.

use serde::{Deserialize, Serialize};

use super::common::{lenient_u64, ArtRef};

/// A catalog or library track (`sj#track`).
///
/// Only the fields the client touches are modelled. The store ID doubles as
/// the seed for stream signatures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Track title.
    #[serde(default)]
    pub title: String,

    /// Performing artist.
    #[serde(default)]
    pub artist: String,

    /// Album title.
    #[serde(default)]
    pub album: String,

    #[serde(default)]
    pub album_artist: String,

    /// Catalog ID. Absent for uploaded tracks.
    #[serde(default)]
    pub store_id: Option<String>,

    /// Library entry ID.
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub nid: Option<String>,

    #[serde(default)]
    pub album_id: Option<String>,

    #[serde(default)]
    pub artist_id: Vec<String>,

    #[serde(default)]
    pub track_number: Option<u32>,

    #[serde(default)]
    pub disc_number: Option<u32>,

    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default)]
    pub genre: Option<String>,

    /// Duration in milliseconds.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration_millis: Option<u64>,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub estimated_size: Option<u64>,

    #[serde(default)]
    pub album_art_ref: Vec<ArtRef>,
}

impl Track {
    /// Seed for the stream signature.
    pub fn signing_seed(&self) -> Option<&str> {
        self.store_id.as_deref()
    }

    /// Get duration formatted as MM:SS.
    pub fn duration_formatted(&self) -> String {
        let total_seconds = self.duration_millis.unwrap_or(0) / 1000;
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }
}
