//! Account configuration.
//!
//! The service answers the config call with a flat list of key/value
//! entries. [`RemoteConfig`] is that server half. A usable [`Config`] also
//! needs the locale and android ID chosen on the client side, and can only
//! be obtained through [`ConfigBuilder`] once both are known.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::common::Subscription;
use crate::error::{ApiError, Result};

/// Entry that flags a paid subscription.
const SUBSCRIPTION_KEY: &str = "isNautilusUser";

/// Entry holding the maximum number of tracks per playlist.
const MAX_PLAYLIST_SIZE_KEY: &str = "maxPlaylistSize";

/// Server-provided configuration (`sj#configList`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "ConfigList")]
pub struct RemoteConfig {
    subscription: Subscription,
    entries: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct ConfigList {
    #[serde(default)]
    data: ConfigData,
}

#[derive(Default, Deserialize)]
struct ConfigData {
    #[serde(default)]
    entries: Vec<ConfigEntry>,
}

#[derive(Deserialize)]
struct ConfigEntry {
    key: String,
    #[serde(default)]
    value: String,
}

impl From<ConfigList> for RemoteConfig {
    fn from(list: ConfigList) -> Self {
        let entries: BTreeMap<String, String> = list
            .data
            .entries
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect();

        let subscription = match entries.get(SUBSCRIPTION_KEY).map(String::as_str) {
            Some("true") => Subscription::AllAccess,
            _ => Subscription::Free,
        };

        Self {
            subscription,
            entries,
        }
    }
}

impl RemoteConfig {
    pub fn subscription(&self) -> Subscription {
        self.subscription
    }

    pub fn entry(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// Fully initialized session configuration.
///
/// Immutable. Every field a request needs is guaranteed to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    locale: String,
    android_id: String,
    remote: RemoteConfig,
}

impl Config {
    /// Start building a config from the server half.
    pub fn builder(remote: RemoteConfig) -> ConfigBuilder {
        ConfigBuilder {
            remote,
            locale: None,
            android_id: None,
        }
    }

    /// Locale sent as `hl`, e.g. `en_US`.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Device ID sent with stream requests.
    pub fn android_id(&self) -> &str {
        &self.android_id
    }

    pub fn subscription(&self) -> Subscription {
        self.remote.subscription
    }

    /// Raw config entry from the server.
    pub fn entry(&self, key: &str) -> Option<&str> {
        self.remote.entry(key)
    }

    /// All config entries from the server.
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.remote.entries
    }

    /// Maximum number of tracks per playlist, when the server reports it.
    pub fn max_playlist_size(&self) -> Option<u32> {
        self.entry(MAX_PLAYLIST_SIZE_KEY)?.parse().ok()
    }
}

/// Accumulates the client-side fields of a [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    remote: RemoteConfig,
    locale: Option<String>,
    android_id: Option<String>,
}

impl ConfigBuilder {
    pub fn locale<S: Into<String>>(mut self, locale: S) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn android_id<S: Into<String>>(mut self, android_id: S) -> Self {
        self.android_id = Some(android_id.into());
        self
    }

    /// Yield the config, failing if a required field is missing or empty.
    pub fn build(self) -> Result<Config> {
        let locale = self
            .locale
            .filter(|l| !l.is_empty())
            .ok_or(ApiError::IncompleteConfig("locale"))?;
        let android_id = self
            .android_id
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::IncompleteConfig("android ID"))?;

        Ok(Config {
            locale,
            android_id,
            remote: self.remote,
        })
    }
}
