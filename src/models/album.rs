//! Album model, as it appears in search results.

use serde::{Deserialize, Serialize};

/// A catalog album (`sj#album`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Album title.
    #[serde(default)]
    pub name: String,

    /// Album artist.
    #[serde(default)]
    pub album_artist: String,

    /// Catalog ID.
    #[serde(default)]
    pub album_id: Option<String>,

    #[serde(default)]
    pub year: Option<i32>,

    /// Cover URL.
    #[serde(default)]
    pub album_art_ref: Option<String>,
}
