//! Typed RPC surface of the mobile client API.
//!
//! Each method issues exactly one request through the interceptor chain and
//! reports the outcome as-is. Nothing here retries.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error};
use url::Url;

use super::interceptor::{DynamicParameters, InterceptorChain};
use super::transport::{ApiRequest, RawResponse, Transport};
use crate::error::{ApiError, Result, ServerError};
use crate::models::{DeviceList, RemoteConfig, SearchResponse, SearchTypes, StreamQuality};

/// Base URL of the service.
pub const DEFAULT_BASE_URL: &str = "https://mclients.googleapis.com/";

const CONFIG_PATH: &str = "sj/v2.5/config";
const DEVICES_PATH: &str = "sj/v2.5/devicemanagementinfo";
const SEARCH_PATH: &str = "sj/v2.5/query";
const STREAM_PATH: &str = "music/mplay";

/// Outcome of a service call.
///
/// `body` is only decoded for 2xx statuses. With
/// [`ErrorBehaviour::Log`](super::ErrorBehaviour::Log) error statuses end up
/// here too, with `body` empty and the server's error in `raw`.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<T>,
    pub raw: Bytes,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Server error carried by an error response.
    pub fn error(&self) -> Option<ServerError> {
        if self.status.is_client_error() || self.status.is_server_error() {
            Some(ServerError::parse(&self.raw))
        } else {
            None
        }
    }

    /// The decoded body, or [`ApiError::EmptyBody`].
    pub fn into_body(self) -> Result<T> {
        let status = self.status.as_u16();
        self.body.ok_or(ApiError::EmptyBody { status })
    }
}

/// Low-level client bound to a transport and an interceptor chain.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    transport: Arc<dyn Transport>,
    chain: InterceptorChain,
    base_url: Url,
}

impl ServiceClient {
    pub fn new(transport: Arc<dyn Transport>, chain: InterceptorChain, base_url: Url) -> Self {
        Self {
            transport,
            chain,
            base_url,
        }
    }

    /// A client sharing this transport with `params` sent on every call.
    pub fn with_parameters(&self, params: DynamicParameters) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            chain: self.chain.with_parameters(params),
            base_url: self.base_url.clone(),
        }
    }

    pub fn parameters(&self) -> &DynamicParameters {
        self.chain.parameters()
    }

    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        debug!("{} {}", request.method, request.url);
        self.chain.send(self.transport.as_ref(), request).await
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<ApiResponse<T>> {
        let raw = self.send(request).await?;

        let body = if raw.status.is_success() && !raw.body.is_empty() {
            match serde_json::from_slice(&raw.body) {
                Ok(body) => Some(body),
                Err(e) => {
                    error!("Failed to decode response (status {}): {}", raw.status, e);
                    return Err(ApiError::ParseError(e));
                }
            }
        } else {
            None
        };

        Ok(ApiResponse {
            status: raw.status,
            headers: raw.headers,
            body,
            raw: raw.body,
        })
    }

    /// Search the catalog.
    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
        types: &SearchTypes,
    ) -> Result<ApiResponse<SearchResponse>> {
        let mut request = ApiRequest::get(self.endpoint(SEARCH_PATH)?);
        request.append_query("q", query);
        request.append_query("max-results", &max_results.to_string());
        request.append_query("ct", &types.to_param());
        self.call(request).await
    }

    /// Devices registered to the account.
    pub async fn get_devices(&self) -> Result<ApiResponse<DeviceList>> {
        let request = ApiRequest::get(self.endpoint(DEVICES_PATH)?);
        self.call(request).await
    }

    /// Account configuration for `locale`.
    pub async fn get_config(&self, locale: &str) -> Result<ApiResponse<RemoteConfig>> {
        let mut request = ApiRequest::get(self.endpoint(CONFIG_PATH)?);
        request.append_query("hl", locale);
        self.call(request).await
    }

    /// Ask for the stream location of a track.
    ///
    /// The service answers with a redirect; the signed URL is in the
    /// `Location` header of the returned response.
    pub async fn get_track_location(
        &self,
        android_id: &str,
        quality: StreamQuality,
        salt: &str,
        signature: &str,
        store_id: &str,
    ) -> Result<RawResponse> {
        let mut request = ApiRequest::get(self.endpoint(STREAM_PATH)?);
        request.append_header("x-device-id", android_id)?;
        request.append_query("opt", quality.code());
        request.append_query("net", "mob");
        request.append_query("pt", "e");
        request.append_query("slt", salt);
        request.append_query("sig", signature);
        request.append_query("mjck", store_id);
        self.send(request).await
    }
}
