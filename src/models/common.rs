//! Common types shared across all models.

use serde::{Deserialize, Serialize};

/// Artwork reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtRef {
    /// URL to the image.
    pub url: String,
}

/// Stream quality options for the streaming endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StreamQuality {
    /// 320 kbps.
    #[default]
    #[serde(rename = "hi")]
    High,
    /// 160 kbps.
    #[serde(rename = "med")]
    Medium,
    /// 128 kbps.
    #[serde(rename = "low")]
    Low,
}

impl StreamQuality {
    /// Value of the `opt` query parameter.
    pub fn code(&self) -> &'static str {
        match self {
            StreamQuality::High => "hi",
            StreamQuality::Medium => "med",
            StreamQuality::Low => "low",
        }
    }
}

/// Subscription tier of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Subscription {
    /// Paid, full catalog access.
    #[serde(rename = "aa")]
    AllAccess,
    /// Free tier.
    #[default]
    #[serde(rename = "fr")]
    Free,
}

impl Subscription {
    /// Value of the `tier` query parameter.
    pub fn code(&self) -> &'static str {
        match self {
            Subscription::AllAccess => "aa",
            Subscription::Free => "fr",
        }
    }
}

impl std::fmt::Display for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Deserialize a number that the service sometimes sends as a string.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_u64()),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s.parse().map(Some).map_err(D::Error::custom),
        Some(other) => Err(D::Error::custom(format!("expected number, got {}", other))),
    }
}
