//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use gpmusic::api::{ApiRequest, RawResponse, Transport};
use gpmusic::Result;
use reqwest::header::{HeaderMap, HeaderValue, LOCATION};
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "ya29.test-token";

pub const CONFIG_PATH: &str = "/sj/v2.5/config";
pub const DEVICES_PATH: &str = "/sj/v2.5/devicemanagementinfo";
pub const SEARCH_PATH: &str = "/sj/v2.5/query";
pub const STREAM_PATH: &str = "/music/mplay";

pub const CONFIG_JSON: &str = r#"{
    "kind": "sj#configList",
    "data": {
        "entries": [
            {"kind": "sj#configEntry", "key": "isNautilusUser", "value": "true"},
            {"kind": "sj#configEntry", "key": "maxPlaylistSize", "value": "1000"}
        ]
    }
}"#;

pub const DEVICES_JSON: &str = r#"{
    "kind": "sj#devicemanagementinfo",
    "data": {
        "items": [
            {"kind": "sj#devicemanagementinfoentry", "id": "ios:0123", "friendlyName": "iPhone", "type": "IOS"},
            {"kind": "sj#devicemanagementinfoentry", "id": "0x00112233aabbccdd", "friendlyName": "Pixel", "type": "ANDROID"},
            {"kind": "sj#devicemanagementinfoentry", "id": "0x99", "friendlyName": "Tablet", "type": "ANDROID"}
        ]
    }
}"#;

pub const IOS_ONLY_DEVICES_JSON: &str = r#"{
    "kind": "sj#devicemanagementinfo",
    "data": {"items": [{"id": "ios:0123", "friendlyName": "iPhone", "type": "IOS"}]}
}"#;

pub const SEARCH_JSON: &str = r#"{
    "kind": "sj#searchresponse",
    "entries": [
        {"type": "1", "track": {"title": "So What", "artist": "Miles Davis", "storeId": "T1"}},
        {"type": "2", "artist": {"name": "Miles Davis", "artistId": "A1"}},
        {"type": "1", "track": {"title": "Freddie Freeloader", "artist": "Miles Davis", "storeId": "T2"}},
        {"type": "1", "track": {"title": "Blue in Green", "artist": "Miles Davis", "storeId": "T3"}}
    ]
}"#;

pub const STREAM_LOCATION: &str = "https://r4---sn-example.c.doc-0-0-sj.sj.googleusercontent.com/videoplayback?id=abc&itag=25";

#[derive(Debug, Clone)]
enum Reply {
    Body(u16, &'static str),
    Redirect(&'static str),
    Fail,
}

/// In-memory transport answering by path and recording every request.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<Vec<(&'static str, Reply)>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Transport answering config and device calls successfully.
    pub fn account() -> Arc<Self> {
        let transport = Self::new();
        transport.respond(CONFIG_PATH, 200, CONFIG_JSON);
        transport.respond(DEVICES_PATH, 200, DEVICES_JSON);
        transport
    }

    pub fn respond(&self, path: &'static str, status: u16, body: &'static str) {
        self.routes
            .lock()
            .unwrap()
            .push((path, Reply::Body(status, body)));
    }

    pub fn redirect(&self, path: &'static str, location: &'static str) {
        self.routes
            .lock()
            .unwrap()
            .push((path, Reply::Redirect(location)));
    }

    pub fn fail(&self, path: &'static str) {
        self.routes.lock().unwrap().push((path, Reply::Fail));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let path = request.url.path().to_string();
        self.requests.lock().unwrap().push(request);

        let reply = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| *p == path)
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Body(status, body)) => Ok(RawResponse::new(
                StatusCode::from_u16(status).unwrap(),
                HeaderMap::new(),
                Bytes::from(body),
            )),
            Some(Reply::Redirect(location)) => {
                let mut headers = HeaderMap::new();
                headers.insert(LOCATION, HeaderValue::from_static(location));
                Ok(RawResponse::new(StatusCode::FOUND, headers, Bytes::new()))
            }
            Some(Reply::Fail) => Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )
            .into()),
            None => Ok(RawResponse::new(
                StatusCode::NOT_FOUND,
                HeaderMap::new(),
                Bytes::from_static(b"Not Found"),
            )),
        }
    }
}

/// Query parameters of a request as `(key, value)` pairs.
pub fn query(request: &ApiRequest) -> Vec<(String, String)> {
    request.query_pairs()
}

pub fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}
