//! End-to-end tests of the HTTP surface over an in-memory remote.

use std::io::Write;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::util::ServiceExt;

use hookslot_api::{create_app, ApiConfig, AppState};
use hookslot_core::{SlotDocument, DEFAULT_SLOT_IDS};
use hookslot_storage::{InMemoryRemote, LocalCache, RemoteBackend, SlotRegistry};

const SECRET: &str = "test-secret";

struct TestHarness {
    app: axum::Router,
    remote: Arc<InMemoryRemote>,
    _cache_dir: tempfile::TempDir,
    _ui_file: tempfile::NamedTempFile,
}

fn harness() -> TestHarness {
    let remote = Arc::new(InMemoryRemote::new());
    let cache_dir = tempfile::TempDir::new().unwrap();
    let cache = LocalCache::new(cache_dir.path());
    let registry = Arc::new(SlotRegistry::new(
        DEFAULT_SLOT_IDS,
        10,
        Arc::clone(&remote) as Arc<dyn RemoteBackend>,
        &cache,
    ));

    let mut ui_file = tempfile::NamedTempFile::new().unwrap();
    write!(ui_file, "<!doctype html><title>hookslot</title>").unwrap();

    let config = ApiConfig {
        app_secret: SECRET.to_string(),
        ui_path: ui_file.path().to_path_buf(),
        ..ApiConfig::default()
    };
    let app = create_app(AppState::new(registry, &config));

    TestHarness {
        app,
        remote,
        _cache_dir: cache_dir,
        _ui_file: ui_file,
    }
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn set_content_request(slot: &str, content_type: &str, content: &str, skey: &str) -> Request<Body> {
    let body = serde_json::json!({
        "type": content_type,
        "content": content,
        "skey": skey,
    });
    Request::builder()
        .method("POST")
        .uri(format!("/slot_content/{}", slot))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn recording_serves_the_stored_content() {
    let harness = harness();

    let response = harness
        .app
        .clone()
        .oneshot(set_content_request("a", "application/json", "{\"up\":true}", SECRET))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/s/a?source=ci")
                .header("x-webhook-event", "deploy")
                .body(Body::from("event-payload"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_bytes(response).await, b"{\"up\":true}");

    // The request landed in the circular log.
    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/slot_logs/a")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc: SlotDocument = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(doc.cur_index, 1);
    let entry = doc.latest().unwrap();
    assert_eq!(entry.request.req_line, "POST /s/a HTTP/1.1");
    assert_eq!(entry.request.query_params["source"], "ci");
    assert_eq!(
        entry.request.headers.get("x-webhook-event").map(String::as_str),
        Some("deploy")
    );
    assert_eq!(entry.request.body_data, "event-payload");
}

#[tokio::test]
async fn every_verb_records_identically() {
    let harness = harness();

    for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        let response = harness
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/s/b")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "verb {}", method);
    }

    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/slot_logs/b")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let doc: SlotDocument = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(doc.cur_index, 5);
    assert_eq!(doc.recorded(), 5);
}

#[tokio::test]
async fn unknown_slot_is_404_everywhere() {
    let harness = harness();

    for request in [
        Request::builder()
            .uri("/slot_logs/zz")
            .body(Body::empty())
            .unwrap(),
        Request::builder()
            .method("POST")
            .uri("/s/zz")
            .body(Body::empty())
            .unwrap(),
        set_content_request("zz", "text/plain", "x", SECRET),
    ] {
        let response = harness.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
    assert_eq!(harness.remote.write_count(), 0);
}

#[tokio::test]
async fn wrong_secret_is_rejected_and_writes_nothing() {
    let harness = harness();

    let response = harness
        .app
        .clone()
        .oneshot(set_content_request("a", "text/plain", "hacked", "wrong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(harness.remote.write_count(), 0);
}

#[tokio::test]
async fn content_update_round_trips() {
    let harness = harness();

    let response = harness
        .app
        .clone()
        .oneshot(set_content_request("a", "text/plain", "hello", SECRET))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let returned: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(returned["type"], "text/plain");
    assert_eq!(returned["data"], "hello");

    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/slot_logs/a")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let doc: SlotDocument = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(doc.content.content_type, "text/plain");
    assert_eq!(doc.content.data, "hello");
}

#[tokio::test]
async fn ui_page_is_served() {
    let harness = harness();

    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/webhook_ui")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    assert!(String::from_utf8_lossy(&body).contains("hookslot"));
}

#[tokio::test]
async fn remote_outage_on_fresh_slot_is_503() {
    let harness = harness();

    harness.remote.set_unreachable(true);
    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/s/a")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
