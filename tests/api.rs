use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use countdown_sync::{
    api::{create_router, handlers::ADMIN_KEY_HEADER},
    display::DEFAULT_REFRESH,
    state::FULL_DAY_MS,
    store::RecordKey,
    AdminGate, AppState, MemoryStore,
};

const KEY: &str = "hackathon-admin";

async fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        Arc::clone(&store),
        AdminGate::from_secret(KEY),
        DEFAULT_REFRESH,
        20600,
        "127.0.0.1".to_string(),
    )
    .await
    .expect("state");
    (create_router(Arc::new(state)), store)
}

async fn call(app: &Router, method: &str, uri: &str, key: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    call_raw(app, method, uri, key, body.map(|body| body.to_string())).await
}

async fn call_raw(
    app: &Router,
    method: &str,
    uri: &str,
    key: Option<&str>,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        request = request.header(ADMIN_KEY_HEADER, key);
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body)),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_and_default_timer() {
    let (app, _) = app().await;
    let (status, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&app, "GET", "/timer", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "isRunning": false, "endTime": null, "remainingTime": FULL_DAY_MS }));
}

#[tokio::test]
async fn admin_routes_need_the_key() {
    let (app, store) = app().await;

    let (status, body) = call(&app, "POST", "/admin/start", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Wrong key. Try again.");

    let (status, _) = call(&app, "POST", "/admin/start", Some("guess"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(store.snapshot(RecordKey::Timer), None);

    let (status, body) = call(&app, "POST", "/admin/login", Some(KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn start_stop_cycle() {
    let (app, _) = app().await;

    let (status, body) = call(&app, "POST", "/admin/start", Some(KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"], true);
    assert_eq!(body["state"]["isRunning"], true);
    assert!(body["state"]["endTime"].is_i64());

    let (_, body) = call(&app, "POST", "/admin/start", Some(KEY), None).await;
    assert_eq!(body["applied"], false);
    assert_eq!(body["message"], "Timer already running");

    let (status, body) = call(&app, "POST", "/admin/stop", Some(KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["isRunning"], false);
    assert_eq!(body["state"]["endTime"], Value::Null);
    let remaining = body["state"]["remainingTime"].as_i64().unwrap();
    assert!(remaining <= FULL_DAY_MS && remaining > FULL_DAY_MS - 5_000);

    let (_, body) = call(&app, "POST", "/admin/reset", Some(KEY), None).await;
    assert_eq!(body["state"]["remainingTime"], FULL_DAY_MS);
}

#[tokio::test]
async fn custom_timer_accepts_form_style_values() {
    let (app, _) = app().await;

    let (status, body) = call(
        &app,
        "POST",
        "/admin/custom",
        Some(KEY),
        Some(json!({ "hours": "1", "minutes": 2, "seconds": "3" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Timer set to 1h 2m 3s. Press Start to begin.");

    let (_, timer) = call(&app, "GET", "/timer", None, None).await;
    assert_eq!(timer, json!({ "isRunning": false, "endTime": null, "remainingTime": 3_723_000 }));
}

#[tokio::test]
async fn zero_custom_timer_is_rejected() {
    let (app, store) = app().await;
    let (status, body) = call(
        &app,
        "POST",
        "/admin/custom",
        Some(KEY),
        Some(json!({ "hours": "", "minutes": "abc", "seconds": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please enter a valid time greater than 0.");
    assert_eq!(store.snapshot(RecordKey::Timer), None);
}

#[tokio::test]
async fn push_cycle_reset_advances() {
    let (app, _) = app().await;
    let (_, cycle) = call(&app, "GET", "/push-cycle", None, None).await;
    assert_eq!(cycle["pushCount"], 1);

    let (status, body) = call(&app, "POST", "/admin/push-cycle/reset", Some(KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["pushCount"], 2);
    assert_eq!(body["message"], "Push cycle advanced to push #2");
}

#[tokio::test]
async fn store_outage_is_503_but_status_keeps_last_known() {
    let (app, store) = app().await;
    call(&app, "POST", "/admin/start", Some(KEY), None).await;
    store.set_online(false);

    let (status, body) = call(&app, "POST", "/admin/stop", Some(KEY), None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "error");

    let (status, _) = call(&app, "GET", "/timer", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = call(&app, "GET", "/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn status_reports_live_countdown() {
    let (app, _) = app().await;
    let (status, body) = call(&app, "GET", "/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["status"], "Ready");
    assert_eq!(body["countdown"]["hours"], "24");
    assert_eq!(body["push_reminder"]["label"], "1st GitHub Push");
    assert_eq!(body["last_action"], Value::Null);

    call(&app, "POST", "/admin/reset", Some(KEY), None).await;
    let (_, body) = call(&app, "GET", "/status", None, None).await;
    assert_eq!(body["last_action"], "reset");
}

#[tokio::test]
async fn custom_timer_checks_the_key_before_the_body() {
    let (app, store) = app().await;

    let (status, body) = call_raw(&app, "POST", "/admin/custom", None, Some("not json".to_string())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");

    let (status, body) = call_raw(&app, "POST", "/admin/custom", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Wrong key. Try again.");

    let (status, body) = call_raw(&app, "POST", "/admin/custom", Some(KEY), Some("not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, body) = call_raw(&app, "POST", "/admin/custom", Some(KEY), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(store.snapshot(RecordKey::Timer), None);
}
