//! # gpmusic
//!
//! A Rust client for the Google Play Music mobile client API.
//!
//! ## Quick Start
//!
//! The easiest way to use this library is through the [`Client`] struct:
//!
//! ```rust,no_run
//! use gpmusic::{Client, SearchTypes, StreamQuality};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build a client from a token obtained through the login flow
//!     let client = Client::builder().auth_token("your_token").build().await?;
//!
//!     // Search everything
//!     if let Some(response) = client.search_default("miles davis", &SearchTypes::all()).await? {
//!         println!("{} results", response.entries.len());
//!     }
//!
//!     // Stream URL of the first track, valid for about a minute
//!     let tracks = client.search_tracks("so what", Some(1)).await?;
//!     if let Some(track) = tracks.first() {
//!         if let Some(url) = client.get_track_url(track, StreamQuality::High).await? {
//!             println!("{}", url);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## How a client is built
//!
//! [`ClientBuilder::build`] fetches the account config, installs the session
//! query parameters, and picks an Android device ID before handing out a
//! [`Client`]. Either every step succeeds or the build fails as a whole.
//! The individual steps are exposed through [`bootstrap::Bootstrap`].
//!
//! ## Error statuses
//!
//! By default a 4xx or 5xx answer fails the call with [`ApiError::Remote`].
//! With [`ErrorBehaviour::Log`] the status is only logged and the client
//! methods return `None` (or no tracks) instead.
//!
//! ## Low-Level APIs
//!
//! - [`ServiceClient`] - One method per endpoint, raw status and headers
//! - [`api::InterceptorChain`] - Header, error and parameter stages
//! - [`Transport`] - Plug in your own HTTP stack
//! - [`crypto`] - Stream request signing

pub mod api;
pub mod auth;
pub mod bootstrap;
mod client;
pub mod crypto;
pub mod error;
pub mod models;

// Main interface (recommended)
pub use client::{Client, ClientBuilder, DEFAULT_LOCALE, DEFAULT_MAX_RESULTS};

// Low-level APIs
pub use api::{ErrorBehaviour, ReqwestTransport, ServiceClient, Transport};
pub use auth::AuthToken;
pub use crypto::{RequestSigner, Signature};
pub use error::{ApiError, Result, SigningError};
pub use models::{
    Config, Device, DeviceList, ResultType, SearchResponse, SearchResult, SearchTypes,
    StreamQuality, Subscription, Track,
};
