#![allow(clippy::unwrap_used)]
// Integration tests for `BridgeClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nukilatch_api::{BridgeClient, CallbackRegistration, Error, LockAction, LockState};

const TOKEN: &str = "abc123";
const NUKI_ID: u64 = 123_456_789;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BridgeClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = BridgeClient::with_client(
        reqwest::Client::new(),
        base_url,
        SecretString::from(TOKEN.to_string()),
    );
    (server, client)
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    let body = json!([{
        "nukiId": NUKI_ID,
        "name": "Front Door",
        "deviceType": 0,
        "lastKnownState": {
            "mode": 2,
            "state": 1,
            "stateName": "locked",
            "batteryCritical": false,
            "batteryCharging": false,
            "batteryChargeState": 64,
            "doorsensorState": 2,
            "timestamp": "2026-10-01T12:00:00+00:00"
        }
    }]);

    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].nuki_id, NUKI_ID);
    assert_eq!(devices[0].name, "Front Door");
    let state = devices[0].last_known_state.clone().unwrap();
    assert_eq!(state.state, Some(LockState::Locked));
    assert_eq!(state.battery_charge_state, Some(64));
}

#[tokio::test]
async fn test_find_device_missing() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "nukiId": 1, "name": "Back Door" }
        ])))
        .mount(&server)
        .await;

    let device = client.find_device(NUKI_ID).await.unwrap();
    assert!(device.is_none());
}

#[tokio::test]
async fn test_list_devices_malformed_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;

    match result {
        Err(ref e @ Error::Deserialization { ref body, .. }) => {
            assert!(e.is_protocol());
            assert_eq!(body, "<html>oops</html>");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_bad_token_is_status_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.is_protocol());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    drop(server);

    let client = BridgeClient::with_client(
        reqwest::Client::new(),
        base_url,
        SecretString::from(TOKEN.to_string()),
    );

    let err = client.list_devices().await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got: {err:?}");
    assert!(!err.to_string().contains(TOKEN), "token leaked: {err}");
}

// ── Lock action tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_lock_action_codes() {
    let (server, client) = setup().await;

    for (code, action) in [("1", LockAction::Unlock), ("2", LockAction::Lock), ("3", LockAction::Unlatch)] {
        Mock::given(method("GET"))
            .and(path("/lockAction"))
            .and(query_param("token", TOKEN))
            .and(query_param("nukiId", NUKI_ID.to_string()))
            .and(query_param("action", code))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .named(action.as_str())
            .mount(&server)
            .await;
    }

    assert!(client.unlock(NUKI_ID).await.unwrap().success);
    assert!(client.lock(NUKI_ID).await.unwrap().success);
    assert!(client.unlatch(NUKI_ID).await.unwrap().success);
}

#[tokio::test]
async fn test_lock_action_rejected_is_data() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lockAction"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "busy" })),
        )
        .mount(&server)
        .await;

    let resp = client.lock(NUKI_ID).await.unwrap();
    assert!(!resp.success);
    assert_eq!(resp.message.as_deref(), Some("busy"));
}

// ── Callback tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_callbacks() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/callback/list"))
        .and(query_param("token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "callbacks": [
                { "id": 0, "url": "http://192.168.1.10:8899/" },
                { "id": 1, "url": "http://192.168.1.11:9000/" }
            ]
        })))
        .mount(&server)
        .await;

    let callbacks = client.list_callbacks().await.unwrap();
    assert_eq!(callbacks.len(), 2);
    assert_eq!(callbacks[1].url, "http://192.168.1.11:9000/");
}

#[tokio::test]
async fn test_register_webhook_already_registered() {
    let (server, client) = setup().await;
    let url = "http://192.168.1.10:8899/";

    Mock::given(method("GET"))
        .and(path("/callback/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "callbacks": [{ "id": 0, "url": url }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/callback/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = client.register_webhook(url).await;
    assert_eq!(outcome, CallbackRegistration::AlreadyRegistered);
}

#[tokio::test]
async fn test_register_webhook_twice_adds_once() {
    let (server, client) = setup().await;
    let url = "http://192.168.1.10:8899/";

    // First listing: nothing registered yet.
    Mock::given(method("GET"))
        .and(path("/callback/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "callbacks": [] })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    // Every later listing reflects the registration.
    Mock::given(method("GET"))
        .and(path("/callback/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "callbacks": [{ "id": 0, "url": url }]
        })))
        .with_priority(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/callback/add"))
        .and(query_param("token", TOKEN))
        .and(query_param("url", url))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.register_webhook(url).await, CallbackRegistration::Registered);
    assert_eq!(
        client.register_webhook(url).await,
        CallbackRegistration::AlreadyRegistered
    );
}

#[tokio::test]
async fn test_register_webhook_rejected_is_reported() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/callback/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "callbacks": [] })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/callback/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "too many callbacks registered"
        })))
        .mount(&server)
        .await;

    let outcome = client.register_webhook("http://10.0.0.5:8899/").await;
    assert_eq!(
        outcome,
        CallbackRegistration::Rejected {
            message: Some("too many callbacks registered".into())
        }
    );
    assert!(!outcome.is_registered());
}

#[tokio::test]
async fn test_register_webhook_list_failure_is_reported() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/callback/list"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = client.register_webhook("http://10.0.0.5:8899/").await;
    assert!(matches!(outcome, CallbackRegistration::Failed { .. }));
}
