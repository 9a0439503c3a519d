//! Playlist model, as it appears in search results.

use serde::{Deserialize, Serialize};

/// A shared playlist (`sj#playlist`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Playlist name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub share_token: Option<String>,

    #[serde(default)]
    pub owner_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}
