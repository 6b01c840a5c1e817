//! HTTP surface tests driven through the router without binding a socket

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use session_clock::{
    create_router,
    persistence::{MemoryStorage, SnapshotStore},
    scheduler::IntervalScheduler,
    state::{AppState, Durations, Phase, SessionClock, Snapshot},
};

fn test_state(durations: Durations, snapshot: Option<Snapshot>) -> Arc<AppState> {
    let (scheduler, _ticks) = IntervalScheduler::channel();
    let clock = SessionClock::restore(durations, snapshot, scheduler);
    Arc::new(AppState::new(20554, "127.0.0.1".to_string(), clock))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_clock_reports_initial_read_model() {
    let app = create_router(test_state(Durations::default(), None));

    let (status, body) = send(&app, Method::GET, "/clock", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");
    assert_eq!(body["clock"]["phase"], "work");
    assert_eq!(body["clock"]["remaining_seconds"], 1500);
    assert_eq!(body["clock"]["running"], false);
    assert_eq!(body["clock"]["label"], "25:00");
    assert_eq!(body["clock"]["read_model"]["display_minutes"], "25");
    assert_eq!(body["clock"]["read_model"]["display_seconds"], "00");
    assert_eq!(body["clock"]["read_model"]["progress_fraction"], 0.0);
    assert_eq!(body["clock"]["durations"]["break"], 300);
    assert_eq!(body["ring"]["radius"], 90.0);
}

#[tokio::test]
async fn test_start_and_pause_toggle_running() {
    let app = create_router(test_state(Durations::default(), None));

    let (status, body) = send(&app, Method::POST, "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["clock"]["running"], true);

    let (_, body) = send(&app, Method::POST, "/start", None).await;
    assert_eq!(body["clock"]["running"], true);

    let (status, body) = send(&app, Method::POST, "/pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");
    assert_eq!(body["clock"]["running"], false);

    let (_, body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(body["last_action"], "pause");
    assert_eq!(body["port"], 20554);
}

#[tokio::test]
async fn test_duration_update_while_paused_applies_now() {
    let app = create_router(test_state(Durations::default(), None));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/duration/work",
        Some(json!({ "minutes": "10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clock"]["remaining_seconds"], 600);
    assert_eq!(body["clock"]["durations"]["work"], 600);
    assert_eq!(body["clock"]["label"], "10:00");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/duration/break",
        Some(json!({ "minutes": 15 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clock"]["remaining_seconds"], 600);
    assert_eq!(body["clock"]["durations"]["break"], 900);
}

#[tokio::test]
async fn test_invalid_duration_returns_bad_request() {
    let app = create_router(test_state(Durations::default(), None));

    for minutes in [json!("0"), json!("-2"), json!("ten"), json!(2.5), json!(-1)] {
        let (status, body) = send(
            &app,
            Method::PUT,
            "/duration/work",
            Some(json!({ "minutes": minutes })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "minutes={minutes}");
        assert_eq!(body["status"], "error");
    }

    let (status, _) = send(
        &app,
        Method::PUT,
        "/duration/lunch",
        Some(json!({ "minutes": "5" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/clock", None).await;
    assert_eq!(body["clock"]["durations"]["work"], 1500);
    assert_eq!(body["clock"]["remaining_seconds"], 1500);
}

#[tokio::test]
async fn test_reset_returns_to_full_work_phase() {
    let snapshot = Snapshot::new(Phase::Break, 42);
    let app = create_router(test_state(Durations::default(), Some(snapshot)));

    let (_, body) = send(&app, Method::GET, "/clock", None).await;
    assert_eq!(body["clock"]["phase"], "break");
    assert_eq!(body["clock"]["remaining_seconds"], 42);
    assert_eq!(body["clock"]["label"], "00:42");

    send(&app, Method::POST, "/start", None).await;
    let (status, body) = send(&app, Method::POST, "/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clock"]["phase"], "work");
    assert_eq!(body["clock"]["remaining_seconds"], 1500);
    assert_eq!(body["clock"]["running"], false);
}

#[tokio::test]
async fn test_health() {
    let app = create_router(test_state(Durations::default(), None));
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_break_phase_survives_restart() {
    let store = SnapshotStore::new(MemoryStorage::new());
    let durations = Durations::new(3, 120);

    let state = test_state(durations, None);
    state.start().unwrap();
    for _ in 0..8 {
        let id = state.active_tick().unwrap().unwrap();
        state.deliver_tick(id).unwrap();
    }
    let before = state.clock_view().unwrap().state;
    assert_eq!(before.phase, Phase::Break);
    assert_eq!(before.remaining_seconds, 115);

    store.save(&state.snapshot().unwrap()).unwrap();

    let restored = test_state(durations, store.load_or_default());
    let after = restored.clock_view().unwrap().state;
    assert_eq!(after.phase, Phase::Break);
    assert_eq!(after.remaining_seconds, 115);
    assert!(!after.running);
}
