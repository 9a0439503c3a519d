//! Search request flags and the polymorphic search result row.
//!
//! Every row of a search response carries a `type` discriminator and the
//! payload under a key named after the type:
//!
//! ```json
//! { "type": "1", "track": { ... }, "score": 412.3 }
//! ```
//!
//! Rows whose type this crate does not model decode to
//! [`SearchResult::Unknown`] instead of failing the whole response.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{Album, Artist, Playlist, Track};

/// Content types that can be requested from the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResultType {
    Track,
    Artist,
    Album,
    Playlist,
    Genre,
    Station,
    Situation,
    Video,
    Podcast,
}

impl ResultType {
    /// Numeric code used in the `ct` parameter and the row discriminator.
    pub fn code(&self) -> u8 {
        match self {
            ResultType::Track => 1,
            ResultType::Artist => 2,
            ResultType::Album => 3,
            ResultType::Playlist => 4,
            ResultType::Genre => 5,
            ResultType::Station => 6,
            ResultType::Situation => 7,
            ResultType::Video => 8,
            ResultType::Podcast => 9,
        }
    }

    /// All known result types.
    pub fn all() -> &'static [ResultType] {
        &[
            ResultType::Track,
            ResultType::Artist,
            ResultType::Album,
            ResultType::Playlist,
            ResultType::Genre,
            ResultType::Station,
            ResultType::Situation,
            ResultType::Video,
            ResultType::Podcast,
        ]
    }
}

/// Set of result types to query for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTypes {
    types: Vec<ResultType>,
}

impl SearchTypes {
    /// Query the given types. Duplicates are removed.
    pub fn new(types: &[ResultType]) -> Self {
        let mut types = types.to_vec();
        types.sort();
        types.dedup();
        Self { types }
    }

    /// Query a single type.
    pub fn only(result_type: ResultType) -> Self {
        Self {
            types: vec![result_type],
        }
    }

    /// Query every known type.
    pub fn all() -> Self {
        Self::new(ResultType::all())
    }

    pub fn types(&self) -> &[ResultType] {
        &self.types
    }

    pub fn contains(&self, result_type: ResultType) -> bool {
        self.types.contains(&result_type)
    }

    /// Value of the `ct` parameter, e.g. `"1,2,3"`.
    pub fn to_param(&self) -> String {
        self.types
            .iter()
            .map(|t| t.code().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for SearchTypes {
    fn default() -> Self {
        Self::all()
    }
}

/// One row of a search response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchResult {
    Track(Track),
    Artist(Artist),
    Album(Album),
    Playlist(Playlist),
    /// A row type this crate does not model.
    Unknown {
        /// Raw discriminator.
        kind: String,
        /// The whole row.
        raw: Value,
    },
}

impl SearchResult {
    /// Decode a row from its JSON value.
    pub fn from_value(row: Value) -> Result<Self, serde_json::Error> {
        let kind = match row.get("type") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let payload = |key: &str| row.get(key).cloned().unwrap_or(Value::Null);

        let result = match kind.as_str() {
            "1" => SearchResult::Track(serde_json::from_value(payload("track"))?),
            "2" => SearchResult::Artist(serde_json::from_value(payload("artist"))?),
            "3" => SearchResult::Album(serde_json::from_value(payload("album"))?),
            "4" => SearchResult::Playlist(serde_json::from_value(payload("playlist"))?),
            _ => {
                debug!("Keeping search row of unmodelled type {:?}", kind);
                SearchResult::Unknown { kind, raw: row }
            }
        };

        Ok(result)
    }

    /// The track, if this row holds one.
    pub fn as_track(&self) -> Option<&Track> {
        match self {
            SearchResult::Track(track) => Some(track),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for SearchResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let row = Value::deserialize(deserializer)?;
        SearchResult::from_value(row).map_err(D::Error::custom)
    }
}

/// Decoded search response (`sj#searchresponse`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    /// Result rows in server order.
    #[serde(default)]
    pub entries: Vec<SearchResult>,
}

impl SearchResponse {
    /// Tracks among the results.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.entries.iter().filter_map(SearchResult::as_track)
    }

    /// Consume the response, keeping only tracks.
    pub fn into_tracks(self) -> Vec<Track> {
        self.entries
            .into_iter()
            .filter_map(|entry| match entry {
                SearchResult::Track(track) => Some(track),
                _ => None,
            })
            .collect()
    }

    pub fn artists(&self) -> impl Iterator<Item = &Artist> {
        self.entries.iter().filter_map(|entry| match entry {
            SearchResult::Artist(artist) => Some(artist),
            _ => None,
        })
    }

    pub fn albums(&self) -> impl Iterator<Item = &Album> {
        self.entries.iter().filter_map(|entry| match entry {
            SearchResult::Album(album) => Some(album),
            _ => None,
        })
    }
}
