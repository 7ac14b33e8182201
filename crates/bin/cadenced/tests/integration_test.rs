//! End-to-end smoke tests for the full cadenced stack.
//!
//! Each test wires the complete application (virtual device, real step
//! executor, real scheduler, real axum router) and exercises the HTTP layer
//! via `tower::ServiceExt::oneshot`, so no TCP port is bound. The tokio clock
//! is paused so action intervals elapse instantly.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use cadence_adapter_http_axum::router;
use cadence_adapter_http_axum::state::AppState;
use cadence_adapter_virtual::VirtualDevice;
use cadence_app::{DeviceSteps, Scheduler, TokioTimer};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build a fully-wired router on top of a virtual device.
fn app() -> (Arc<VirtualDevice>, axum::Router) {
    let device = Arc::new(VirtualDevice::new(1080, 1920));
    let steps = DeviceSteps::new(
        Arc::clone(&device),
        Arc::clone(&device),
        Arc::clone(&device),
        Arc::clone(&device),
    );
    let scheduler = Scheduler::spawn(steps, TokioTimer);
    (device, router::build(AppState::new(scheduler)))
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn schedule(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/actions")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let (_, app) = app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_run_ping_screenshots_until_times_reached() {
    let (_, app) = app();
    let (status, body) = send(
        &app,
        schedule(serde_json::json!({
            "name": "ping",
            "steps": [{"name": "shot", "type": "screenshot", "payload": {"subtype": "png"}}],
            "times": 2,
            "intervalMs": 50,
            "maxHistoryItems": 5,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "ping");

    settle(150).await;

    let (status, history) = send(&app, get("/api/actions/ping/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["repeats"], 2);
    let records = history["stepResults"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    for record in records {
        assert_eq!(record.as_array().unwrap().len(), 1);
        let step = &record[0];
        assert_eq!(step["passed"], true);
        assert!(step["result"].as_str().unwrap().starts_with("iVBORw0KGgo"));
    }

    let (_, status) = send(&app, get("/api/actions/ping/status")).await;
    assert_eq!(status["status"], "completed");
}

#[tokio::test(start_paused = true)]
async fn should_click_element_and_dump_source() {
    let (device, app) = app();
    let (status, _) = send(
        &app,
        schedule(serde_json::json!({
            "name": "confirm",
            "steps": [
                {"name": "tap ok", "type": "gesture", "payload": {
                    "subtype": "click",
                    "locator": {"strategy": "id", "selector": "ok_button"},
                }},
                {"name": "dump", "type": "source", "payload": {"subtype": "xml"}},
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    settle(10).await;

    let (_, history) = send(&app, get("/api/actions/confirm/history")).await;
    assert_eq!(history["repeats"], 1);
    assert_eq!(history["passCount"], 1);
    let steps = history["stepResults"][0].as_array().unwrap();
    assert_eq!(steps[0]["result"], serde_json::Value::Null);
    assert!(steps[1]["result"].as_str().unwrap().contains("ok_button"));
    assert_eq!(device.performed().len(), 1);
    assert_eq!(device.refresh_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn should_record_failures_and_stop_at_max_fail() {
    let (_, app) = app();
    send(
        &app,
        schedule(serde_json::json!({
            "name": "broken",
            "steps": [
                {"name": "warp", "type": "teleport", "payload": {"subtype": "now"}},
                {"name": "tap ghost", "type": "gesture", "payload": {
                    "subtype": "click",
                    "origin": {"element-6066-11e4-a52e-4f735466cecf": "ghost"},
                }},
                {"name": "shot", "type": "screenshot", "payload": {"subtype": "png"}},
            ],
            "times": 10,
            "intervalMs": 100,
            "maxFail": 2,
        })),
    )
    .await;
    settle(1000).await;

    let (_, history) = send(&app, get("/api/actions/broken/history")).await;
    assert_eq!(history["repeats"], 2);
    assert_eq!(history["failCount"], 2);
    let steps = history["stepResults"][0].as_array().unwrap();
    assert_eq!(steps[0]["fault"]["kind"], "unknown_step_type");
    assert_eq!(steps[1]["fault"]["kind"], "device");
    assert_eq!(steps[2]["passed"], true);

    let (_, status) = send(&app, get("/api/actions/broken/status")).await;
    assert_eq!(status["status"], "completed");
}

#[tokio::test(start_paused = true)]
async fn should_block_re_add_until_removed() {
    let (_, app) = app();
    let action = serde_json::json!({
        "name": "once",
        "steps": [{"name": "shot", "type": "screenshot", "payload": {"subtype": "png"}}],
    });
    send(&app, schedule(action.clone())).await;
    settle(10).await;

    let (status, body) = send(&app, schedule(action.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("remove it first"));

    let (status, _) = send(&app, delete("/api/actions/once")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, schedule(action)).await;
    assert_eq!(status, StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Validation & lookup errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reject_empty_steps() {
    let (_, app) = app();
    let (status, body) = send(
        &app,
        schedule(serde_json::json!({"name": "empty", "steps": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("steps"));

    let (_, names) = send(&app, get("/api/actions")).await;
    assert_eq!(names, serde_json::json!([]));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_action() {
    let (_, app) = app();
    let (status, body) = send(&app, get("/api/actions/missing/status")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test(start_paused = true)]
async fn should_list_and_clear_actions() {
    let (_, app) = app();
    for name in ["b", "a"] {
        send(
            &app,
            schedule(serde_json::json!({
                "name": name,
                "steps": [{"name": "shot", "type": "screenshot", "payload": {"subtype": "png"}}],
                "times": 100,
                "intervalMs": 1000,
            })),
        )
        .await;
    }

    let (_, names) = send(&app, get("/api/actions")).await;
    assert_eq!(names, serde_json::json!(["a", "b"]));

    let (status, _) = send(&app, delete("/api/actions")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, names) = send(&app, get("/api/actions")).await;
    assert_eq!(names, serde_json::json!([]));
}
