//! Step-by-step client construction.
//!
//! Turning a bare token into a [`Client`] takes a fixed sequence of calls,
//! each depending on the previous one:
//!
//! ```text
//! TransportReady --fetch_config--> ConfigFetched --resolve_device--> DeviceResolved --finish--> Client
//! ```
//!
//! Every step consumes the previous state, so the order cannot be broken.
//! In particular the session parameters (`dv`, `hl`, `tier`) are installed
//! as part of [`Bootstrap::fetch_config`], before the device list can be
//! requested. Any failure along the way is reported as
//! [`ApiError::Initialization`]; there is nothing to resume.
//!
//! [`ClientBuilder::build`](crate::ClientBuilder::build) runs the whole
//! sequence. Use this module directly to inspect intermediate states.

use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::api::{ApiResponse, DynamicParameters, ErrorBehaviour, InterceptorChain, ServiceClient, Transport};
use crate::auth::AuthToken;
use crate::client::Client;
use crate::error::{ApiError, Result, ServerError};
use crate::models::{Config, RemoteConfig};

/// Transport and interceptors are assembled; nothing has been sent yet.
#[derive(Debug)]
pub struct TransportReady;

/// Config received and session parameters installed.
#[derive(Debug)]
pub struct ConfigFetched {
    remote: RemoteConfig,
    locale: String,
}

/// Android ID known.
#[derive(Debug)]
pub struct DeviceResolved {
    remote: RemoteConfig,
    locale: String,
    android_id: String,
}

/// Client under construction, in state `S`.
#[derive(Debug)]
pub struct Bootstrap<S> {
    service: ServiceClient,
    state: S,
}

impl<S> Bootstrap<S> {
    /// Service client as configured so far.
    pub fn service(&self) -> &ServiceClient {
        &self.service
    }

    /// Parameters currently sent with every request.
    pub fn parameters(&self) -> &DynamicParameters {
        self.service.parameters()
    }
}

impl Bootstrap<TransportReady> {
    /// Assemble the pipeline around `transport`.
    ///
    /// Fails with [`ApiError::MissingToken`] on an empty token, before any
    /// request is made.
    pub fn new(
        token: AuthToken,
        transport: Arc<dyn Transport>,
        behaviour: ErrorBehaviour,
        base_url: Url,
    ) -> Result<Self> {
        if token.is_empty() {
            return Err(ApiError::MissingToken);
        }

        let chain = InterceptorChain::new(token, behaviour);
        debug!("Pipeline ready for {} ({:?} on errors)", base_url, behaviour);

        Ok(Self {
            service: ServiceClient::new(transport, chain, base_url),
            state: TransportReady,
        })
    }

    /// Fetch the account config and install the session parameters.
    pub async fn fetch_config(self, locale: &str) -> Result<Bootstrap<ConfigFetched>> {
        let stage = "fetching config";

        let response = self
            .service
            .get_config(locale)
            .await
            .map_err(|e| ApiError::initialization(stage, e))?;
        let remote = require_body(response).map_err(|e| ApiError::initialization(stage, e))?;

        let params = DynamicParameters::for_session(locale, remote.subscription());
        let service = self.service.with_parameters(params);

        info!(
            "Config fetched. Locale: {}, tier: {}",
            locale,
            remote.subscription()
        );

        Ok(Bootstrap {
            service,
            state: ConfigFetched {
                remote,
                locale: locale.to_string(),
            },
        })
    }
}

impl Bootstrap<ConfigFetched> {
    pub fn remote_config(&self) -> &RemoteConfig {
        &self.state.remote
    }

    pub fn locale(&self) -> &str {
        &self.state.locale
    }

    /// Settle the android ID used for streaming.
    ///
    /// An explicit ID is taken as-is, without checking it against the
    /// account. Otherwise the device list is fetched and the first Android
    /// device wins.
    pub async fn resolve_device(self, android_id: Option<String>) -> Result<Bootstrap<DeviceResolved>> {
        let stage = "resolving device";

        let android_id = match android_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                debug!("Using caller-supplied android ID");
                id
            }
            None => {
                let response = self
                    .service
                    .get_devices()
                    .await
                    .map_err(|e| ApiError::initialization(stage, e))?;
                let devices = require_body(response).map_err(|e| ApiError::initialization(stage, e))?;

                let device = devices
                    .first_android()
                    .ok_or_else(|| ApiError::initialization(stage, ApiError::NoAndroidDevice))?;
                info!(
                    "Using device '{}' out of {} registered",
                    device.friendly_name,
                    devices.len()
                );
                device.id.clone()
            }
        };

        let ConfigFetched { remote, locale } = self.state;

        Ok(Bootstrap {
            service: self.service,
            state: DeviceResolved {
                remote,
                locale,
                android_id,
            },
        })
    }
}

impl Bootstrap<DeviceResolved> {
    pub fn android_id(&self) -> &str {
        &self.state.android_id
    }

    /// Build the immutable config and hand out the client.
    pub fn finish(self) -> Result<Client> {
        let DeviceResolved {
            remote,
            locale,
            android_id,
        } = self.state;

        let config = Config::builder(remote)
            .locale(locale)
            .android_id(android_id)
            .build()
            .map_err(|e| ApiError::initialization("finishing", e))?;

        Ok(Client::new(self.service, config))
    }
}

/// Body of a successful response; error statuses become [`ApiError::Remote`]
/// even when the chain only logs them.
fn require_body<T>(response: ApiResponse<T>) -> Result<T> {
    if !response.is_success() {
        return Err(ApiError::Remote {
            status: response.status.as_u16(),
            error: ServerError::parse(&response.raw),
        });
    }
    response.into_body()
}
