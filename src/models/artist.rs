//! Artist model, as it appears in search results.

use serde::{Deserialize, Serialize};

use super::common::ArtRef;

/// A catalog artist (`sj#artist`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    /// Artist name.
    #[serde(default)]
    pub name: String,

    /// Catalog ID.
    #[serde(default)]
    pub artist_id: Option<String>,

    /// Artist picture.
    #[serde(default)]
    pub artist_art_ref: Option<String>,

    #[serde(default)]
    pub artist_art_refs: Vec<ArtRef>,
}
