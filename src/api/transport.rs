//! Transport boundary.
//!
//! The pipeline only needs something that can turn an [`ApiRequest`] into a
//! [`RawResponse`]. [`ReqwestTransport`] is the default implementation; any
//! other [`Transport`] can be plugged into the client builder, as long as it
//! does not follow redirects on its own (the streaming endpoint answers with
//! a redirect whose `Location` header is the payload).

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Method, StatusCode};
use rustls::CipherSuite;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, Result};

/// User agent of the official Android client.
const USER_AGENT: &str = "Android-Music/41201 (Build/MMB29Q)";

/// Per-request timeout of the default transport.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cipher suites the default transport is allowed to negotiate.
const ALLOWED_CIPHER_SUITES: &[CipherSuite] = &[
    CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
];

/// An outbound request, before and after the interceptor chain.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Append a query parameter, keeping existing ones.
    pub fn append_query(&mut self, key: &str, value: &str) {
        self.url.query_pairs_mut().append_pair(key, value);
    }

    /// Add a header, keeping existing values for the same name.
    ///
    /// Names are case-insensitive and stored lowercased.
    pub fn append_header(&mut self, name: &str, value: &str) -> Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.headers.append(name, value);
        Ok(())
    }

    /// All query parameters, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// First value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A response as it came off the wire.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether the status is a client or server error.
    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }

    /// Body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can execute HTTP requests.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// Default transport built on [`reqwest`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with the pinned TLS profile.
    pub fn new() -> Result<Self> {
        Self::from_builder(Self::default_client_builder()?)
    }

    /// Transport from a caller-supplied builder.
    ///
    /// Redirect following is switched off regardless of the builder's
    /// settings.
    pub fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self> {
        let client = builder.redirect(Policy::none()).build()?;
        Ok(Self { client })
    }

    /// Builder used when no transport is supplied.
    ///
    /// TLS 1.2 only, restricted to the ECDHE AES-128-GCM suites.
    pub fn default_client_builder() -> Result<reqwest::ClientBuilder> {
        Ok(reqwest::Client::builder()
            .use_preconfigured_tls(pinned_tls_config()?)
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT))
    }
}

fn pinned_tls_config() -> Result<rustls::ClientConfig> {
    let mut provider = rustls::crypto::ring::default_provider();
    provider
        .cipher_suites
        .retain(|suite| ALLOWED_CIPHER_SUITES.contains(&suite.suite()));

    let roots = rustls::RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config = rustls::ClientConfig::builder_with_provider(Arc::new(provider))
        .with_protocol_versions(&[&rustls::version::TLS12])
        .map_err(|e| ApiError::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(config)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        debug!("{} {}", request.method, request.url.path());

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!("Response status: {} ({} bytes)", status, body.len());

        Ok(RawResponse::new(status, headers, body))
    }
}
