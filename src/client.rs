//! Client facade.
//!
//! This module provides the high-level interface most callers need:
//! build a [`Client`] from a token, then search, list devices and get
//! stream URLs.

use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::api::{
    ApiResponse, ErrorBehaviour, ReqwestTransport, ServiceClient, Transport, DEFAULT_BASE_URL,
};
use crate::auth::AuthToken;
use crate::bootstrap::Bootstrap;
use crate::crypto::RequestSigner;
use crate::error::{ApiError, Result, SigningError};
use crate::models::{
    Config, DeviceList, ResultType, SearchResponse, SearchTypes, StreamQuality, Track,
};

/// Locale used when the builder is given none.
pub const DEFAULT_LOCALE: &str = "en_US";

/// Result cap used when the caller gives none.
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Main client.
///
/// Only obtainable through [`ClientBuilder::build`] (or a completed
/// [`Bootstrap`]), so its config is always complete.
///
/// # Example
///
/// ```rust,no_run
/// use gpmusic::{Client, StreamQuality};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::builder()
///         .auth_token("your_token")
///         .locale("de_DE")
///         .build()
///         .await?;
///
///     let tracks = client.search_tracks("kind of blue", Some(10)).await?;
///     if let Some(track) = tracks.first() {
///         if let Some(url) = client.get_track_url(track, StreamQuality::High).await? {
///             println!("{} -> {}", track.title, url);
///         }
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    service: ServiceClient,
    config: Config,
    signer: RequestSigner,
}

impl Client {
    /// Start configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn new(service: ServiceClient, config: Config) -> Self {
        Self {
            service,
            config,
            signer: RequestSigner::new(),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Low-level service client, for raw responses.
    ///
    /// Check the returned status yourself when using it.
    pub fn service(&self) -> &ServiceClient {
        &self.service
    }

    /// Search the catalog for any combination of result types.
    ///
    /// Higher `max_results` values make the call slower. `None` means the
    /// service answered with an error status that was only logged.
    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
        types: &SearchTypes,
    ) -> Result<Option<SearchResponse>> {
        let response = self.service.search(query, max_results, types).await?;
        self.accept(response)
    }

    /// [`search`](Self::search) capped at [`DEFAULT_MAX_RESULTS`].
    pub async fn search_default(
        &self,
        query: &str,
        types: &SearchTypes,
    ) -> Result<Option<SearchResponse>> {
        self.search(query, DEFAULT_MAX_RESULTS, types).await
    }

    /// Search for tracks only.
    ///
    /// Returns at most `max_results` tracks ([`DEFAULT_MAX_RESULTS`] if
    /// `None`). A logged error status yields no tracks.
    pub async fn search_tracks(&self, query: &str, max_results: Option<u32>) -> Result<Vec<Track>> {
        let max_results = max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        let mut tracks = self
            .search(query, max_results, &SearchTypes::only(ResultType::Track))
            .await?
            .map(SearchResponse::into_tracks)
            .unwrap_or_default();
        tracks.truncate(max_results as usize);
        Ok(tracks)
    }

    /// Devices registered to the account, `None` on a logged error status.
    pub async fn get_registered_devices(&self) -> Result<Option<DeviceList>> {
        let response = self.service.get_devices().await?;
        self.accept(response)
    }

    /// Signed stream URL for `track`.
    ///
    /// The URL is only valid for about a minute and for a single download.
    /// Do not cache it.
    ///
    /// Returns `None` when the service answered with an error status and
    /// the client only logs those.
    ///
    /// # Errors
    ///
    /// Returns `Signing` if the track has no store ID, and `MissingRedirect`
    /// if a non-error answer carried no `Location` header.
    pub async fn get_track_url(
        &self,
        track: &Track,
        quality: StreamQuality,
    ) -> Result<Option<String>> {
        let store_id = track.signing_seed().ok_or(SigningError::MissingSeed)?;
        let signature = self.signer.sign_now(Some(store_id))?;

        let response = self
            .service
            .get_track_location(
                self.config.android_id(),
                quality,
                &signature.salt,
                &signature.signature,
                store_id,
            )
            .await?;

        let status = response.status.as_u16();
        if response.is_error() && self.logs_errors() {
            return Ok(None);
        }

        let location = response
            .header("location")
            .map(str::to_string)
            .ok_or(ApiError::MissingRedirect { status })?;

        debug!("Got stream location for {} (status {})", store_id, status);
        Ok(Some(location))
    }

    fn logs_errors(&self) -> bool {
        self.service.chain().error_behaviour() == ErrorBehaviour::Log
    }

    /// Decoded body, `None` for a logged error status.
    fn accept<T>(&self, response: ApiResponse<T>) -> Result<Option<T>> {
        let status = response.status;
        match response.body {
            Some(body) => Ok(Some(body)),
            None if self.logs_errors() && (status.is_client_error() || status.is_server_error()) => {
                Ok(None)
            }
            None => Err(ApiError::EmptyBody {
                status: status.as_u16(),
            }),
        }
    }
}

/// Configures and builds a [`Client`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    token: Option<AuthToken>,
    locale: Option<String>,
    android_id: Option<String>,
    behaviour: ErrorBehaviour,
    transport: Option<Arc<dyn Transport>>,
    base_url: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token to authenticate with. Required.
    pub fn auth_token<T: Into<AuthToken>>(mut self, token: T) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Locale sent with every call. Defaults to [`DEFAULT_LOCALE`].
    pub fn locale<S: Into<String>>(mut self, locale: S) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Device ID used for stream calls, sent as given.
    ///
    /// If left unset, the ID of the first Android device registered to the
    /// account is used, unchanged (e.g. `0x0123456789abcdef`).
    pub fn android_id<S: Into<String>>(mut self, android_id: S) -> Self {
        self.android_id = Some(android_id.into());
        self
    }

    /// How error statuses are handled. Defaults to raising.
    ///
    /// With [`ErrorBehaviour::Log`] error statuses are only logged and the
    /// client methods return `None` instead of failing with `Remote`.
    pub fn error_behaviour(mut self, behaviour: ErrorBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    /// Custom transport. Must not follow redirects.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Override the service base URL.
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Run the bootstrap sequence.
    ///
    /// # Errors
    ///
    /// `MissingToken` if no token was set, `Initialization` for anything
    /// that goes wrong afterwards.
    pub async fn build(self) -> Result<Client> {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingToken)?;

        let base_url = parse_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
            .map_err(|e| ApiError::initialization("parsing base URL", e))?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::new()
                    .map_err(|e| ApiError::initialization("building transport", e))?,
            ),
        };

        let locale = self.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Bootstrap::new(token, transport, self.behaviour, base_url)?
            .fetch_config(&locale)
            .await?
            .resolve_device(self.android_id)
            .await?
            .finish()
    }
}

/// Parse a base URL, making sure relative paths join below it.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
