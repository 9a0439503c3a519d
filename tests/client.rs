//! Facade tests against an in-memory transport.

mod common;

use std::sync::Arc;

use common::*;
use gpmusic::{
    ApiError, Client, ErrorBehaviour, ResultType, SearchTypes, SigningError, StreamQuality,
    Track,
};

async fn client(transport: &Arc<MockTransport>, behaviour: ErrorBehaviour) -> Client {
    Client::builder()
        .auth_token(TOKEN)
        .error_behaviour(behaviour)
        .transport(transport.clone())
        .build()
        .await
        .unwrap()
}

fn track(store_id: Option<&str>) -> Track {
    Track {
        title: "So What".to_string(),
        store_id: store_id.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_get_track_url_returns_location() {
    let transport = MockTransport::account();
    transport.redirect(STREAM_PATH, STREAM_LOCATION);
    let client = client(&transport, ErrorBehaviour::Raise).await;

    let url = client
        .get_track_url(&track(Some("Tj6fhurtstzgdpvfm4xv6i5cei4")), StreamQuality::Medium)
        .await
        .unwrap();
    assert_eq!(url.as_deref(), Some(STREAM_LOCATION));

    let requests = transport.requests_to(STREAM_PATH);
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(request.header("x-device-id"), Some("0x00112233aabbccdd"));
    assert_eq!(
        request.query_value("mjck").as_deref(),
        Some("Tj6fhurtstzgdpvfm4xv6i5cei4")
    );
    assert_eq!(request.query_value("opt").as_deref(), Some("med"));
    assert_eq!(request.query_value("tier").as_deref(), Some("aa"));

    let salt = request.query_value("slt").unwrap();
    let sig = request.query_value("sig").unwrap();
    assert!(salt.parse::<u128>().is_ok());
    assert_eq!(sig.len(), 27);

    // The signature on the wire matches the salt that was sent.
    let expected = gpmusic::RequestSigner::new()
        .sign(Some("Tj6fhurtstzgdpvfm4xv6i5cei4"), &salt)
        .unwrap();
    assert_eq!(sig, expected.signature);
}

#[tokio::test]
async fn test_get_track_url_without_store_id() {
    let transport = MockTransport::account();
    transport.redirect(STREAM_PATH, STREAM_LOCATION);
    let client = client(&transport, ErrorBehaviour::Raise).await;

    let err = client
        .get_track_url(&track(None), StreamQuality::High)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Signing(SigningError::MissingSeed)));

    let err = client
        .get_track_url(&track(Some("")), StreamQuality::High)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Signing(SigningError::MissingSeed)));

    assert_eq!(transport.calls_to(STREAM_PATH), 0);
}

#[tokio::test]
async fn test_get_track_url_without_redirect() {
    let transport = MockTransport::account();
    transport.respond(STREAM_PATH, 200, "");
    let client = client(&transport, ErrorBehaviour::Raise).await;

    let err = client
        .get_track_url(&track(Some("T1")), StreamQuality::High)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::MissingRedirect { status: 200 }));
}

#[tokio::test]
async fn test_search_request_shape() {
    let transport = MockTransport::account();
    transport.respond(SEARCH_PATH, 200, SEARCH_JSON);
    let client = client(&transport, ErrorBehaviour::Raise).await;

    let types = SearchTypes::new(&[ResultType::Track, ResultType::Album]);
    let response = client
        .search("kind of blue", 20, &types)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.entries.len(), 4);

    let request = &transport.requests_to(SEARCH_PATH)[0];
    assert_eq!(request.query_value("q").as_deref(), Some("kind of blue"));
    assert_eq!(request.query_value("max-results").as_deref(), Some("20"));
    assert_eq!(request.query_value("ct").as_deref(), Some("1,3"));
}

#[tokio::test]
async fn test_search_default_caps_results() {
    let transport = MockTransport::account();
    transport.respond(SEARCH_PATH, 200, SEARCH_JSON);
    let client = client(&transport, ErrorBehaviour::Raise).await;

    client
        .search_default("miles", &SearchTypes::all())
        .await
        .unwrap();

    let request = &transport.requests_to(SEARCH_PATH)[0];
    assert_eq!(request.query_value("max-results").as_deref(), Some("50"));
}

#[tokio::test]
async fn test_search_tracks_is_subset_of_track_search() {
    let transport = MockTransport::account();
    transport.respond(SEARCH_PATH, 200, SEARCH_JSON);
    let client = client(&transport, ErrorBehaviour::Raise).await;

    let limit = 2;
    let tracks = client.search_tracks("miles", Some(limit)).await.unwrap();
    let full: Vec<Track> = client
        .search("miles", limit, &SearchTypes::only(ResultType::Track))
        .await
        .unwrap()
        .unwrap()
        .into_tracks();

    assert!(tracks.len() <= limit as usize);
    assert!(tracks.iter().all(|t| full.contains(t)));
    assert_eq!(tracks[0].title, "So What");

    let request = &transport.requests_to(SEARCH_PATH)[0];
    assert_eq!(request.query_value("ct").as_deref(), Some("1"));
    assert_eq!(request.query_value("max-results").as_deref(), Some("2"));
}

#[tokio::test]
async fn test_search_tracks_default_limit() {
    let transport = MockTransport::account();
    transport.respond(SEARCH_PATH, 200, SEARCH_JSON);
    let client = client(&transport, ErrorBehaviour::Raise).await;

    let tracks = client.search_tracks("miles", None).await.unwrap();
    assert_eq!(tracks.len(), 3);

    let request = &transport.requests_to(SEARCH_PATH)[0];
    assert_eq!(request.query_value("max-results").as_deref(), Some("50"));
}

#[tokio::test]
async fn test_get_registered_devices() {
    let transport = MockTransport::account();
    let client = client(&transport, ErrorBehaviour::Raise).await;

    let devices = client.get_registered_devices().await.unwrap().unwrap();
    assert_eq!(devices.len(), 3);
    assert_eq!(devices.first_android().unwrap().friendly_name, "Pixel");
    assert_eq!(transport.calls_to(DEVICES_PATH), 2);
}

#[tokio::test]
async fn test_remote_error_raised() {
    let transport = MockTransport::account();
    transport.respond(
        SEARCH_PATH,
        500,
        r#"{"error":{"code":500,"message":"Backend Error"}}"#,
    );
    let client = client(&transport, ErrorBehaviour::Raise).await;

    let err = client
        .search("miles", 5, &SearchTypes::all())
        .await
        .unwrap_err();
    match err {
        ApiError::Remote { status, error } => {
            assert_eq!(status, 500);
            assert_eq!(error.message, "Backend Error");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_log_only_returns_error_response() {
    let transport = MockTransport::account();
    transport.respond(
        SEARCH_PATH,
        500,
        r#"{"error":{"code":500,"message":"Backend Error"}}"#,
    );
    let client = client(&transport, ErrorBehaviour::Log).await;

    let response = client
        .service()
        .search("miles", 5, &SearchTypes::all())
        .await
        .unwrap();
    assert_eq!(response.status.as_u16(), 500);
    assert!(!response.is_success());
    assert!(response.body.is_none());
    assert_eq!(response.error().unwrap().message, "Backend Error");

    let result = client
        .search("miles", 5, &SearchTypes::all())
        .await
        .unwrap();
    assert!(result.is_none());

    let tracks = client.search_tracks("miles", None).await.unwrap();
    assert!(tracks.is_empty());
}

#[tokio::test]
async fn test_log_only_devices_and_track_url() {
    let transport = MockTransport::account();
    let client = client(&transport, ErrorBehaviour::Log).await;

    transport.respond(DEVICES_PATH, 503, "Service Unavailable");
    let devices = client.get_registered_devices().await.unwrap();
    assert!(devices.is_none());

    // Unrouted paths answer 404.
    let url = client
        .get_track_url(&track(Some("T1")), StreamQuality::High)
        .await
        .unwrap();
    assert!(url.is_none());
    assert_eq!(transport.calls_to(STREAM_PATH), 1);
}

#[tokio::test]
async fn test_raise_mode_track_url_error() {
    let transport = MockTransport::account();
    let client = client(&transport, ErrorBehaviour::Raise).await;

    let err = client
        .get_track_url(&track(Some("T1")), StreamQuality::High)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_log_only_client_error() {
    let transport = MockTransport::account();
    let client = client(&transport, ErrorBehaviour::Log).await;

    // Unrouted paths answer 404.
    let response = client
        .service()
        .get_track_location("0x00112233aabbccdd", StreamQuality::Low, "1", "sig", "T1")
        .await
        .unwrap();
    assert_eq!(response.status.as_u16(), 404);
    assert_eq!(response.text(), "Not Found");
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_client_is_send_sync() {
    assert_send_sync::<Client>();
    assert_send_sync::<gpmusic::ServiceClient>();
}

#[tokio::test]
async fn test_concurrent_searches_share_session_parameters() {
    let transport = MockTransport::account();
    transport.respond(SEARCH_PATH, 200, SEARCH_JSON);
    let client = Arc::new(client(&transport, ErrorBehaviour::Raise).await);

    let types = SearchTypes::all();
    let (first, second) = tokio::join!(
        client.search("miles", 5, &types),
        client.search_tracks("coltrane", Some(3)),
    );
    assert!(first.unwrap().is_some());
    assert_eq!(second.unwrap().len(), 3);

    let other = Arc::clone(&client);
    let spawned = tokio::spawn(async move { other.search_default("evans", &SearchTypes::all()).await });
    assert!(spawned.await.unwrap().unwrap().is_some());

    let requests = transport.requests_to(SEARCH_PATH);
    assert_eq!(requests.len(), 3);
    for request in &requests {
        let params = query(request);
        assert!(params.contains(&pair("dv", "0")));
        assert!(params.contains(&pair("hl", "en_US")));
        assert!(params.contains(&pair("tier", "aa")));
    }
    let mut queries: Vec<String> = requests
        .iter()
        .filter_map(|r| r.query_value("q"))
        .collect();
    queries.sort();
    assert_eq!(queries, vec!["coltrane", "evans", "miles"]);
}

#[tokio::test]
async fn test_empty_success_body_is_an_error() {
    let transport = MockTransport::account();
    transport.respond(SEARCH_PATH, 200, "");
    let client = client(&transport, ErrorBehaviour::Log).await;

    let err = client
        .search("miles", 5, &SearchTypes::all())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::EmptyBody { status: 200 }));
}
