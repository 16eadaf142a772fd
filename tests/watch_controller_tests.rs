use axum::{
    http::{header, Request, StatusCode},
    routing::{delete, post},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use roomwatch::{config, controllers::watch_controller, services, AppState};

async fn test_state() -> AppState {
    let mut settings = config::load();
    settings.backend_url = "http://127.0.0.1:9".to_string();
    settings.ticker_ws_url = "ws://127.0.0.1:9".to_string();
    settings.realtime_ws_url = "ws://127.0.0.1:9".to_string();
    settings.scheduled_orders_enabled = false;
    settings.watches = Vec::new();

    let backend = services::backend::BackendClient::new(
        settings.backend_url.clone(),
        settings.backend_token.clone(),
    );
    let (events_tx, _events_rx) = tokio::sync::broadcast::channel::<String>(64);
    let watches =
        services::watch_manager::WatchManager::new(settings.clone(), backend, events_tx.clone());

    AppState {
        settings,
        watches,
        events_tx,
    }
}

fn watch_app(state: AppState) -> Router {
    Router::new()
        .route("/watches", post(watch_controller::post_create_watch))
        .route("/watches/:room_id", delete(watch_controller::delete_watch))
        .route(
            "/watches/:room_id/pause",
            post(watch_controller::post_pause_watch),
        )
        .route(
            "/watches/:room_id/resume",
            post(watch_controller::post_resume_watch),
        )
        .with_state(state)
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

async fn response_body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn post_create_watch_starts_watching() {
    let state = test_state().await;
    let app = watch_app(state.clone());

    let req = json_request(
        "POST",
        "/watches",
        r#"{"roomId":"room-1","symbol":"btcusdt"}"#,
    );
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = response_body_json(res).await;
    assert_eq!(body["roomId"], "room-1");
    assert_eq!(body["symbol"], "BTCUSDT");

    assert!(state.watches.is_watched("room-1").await);
}

#[tokio::test]
async fn post_create_watch_twice_conflicts() {
    let state = test_state().await;
    let app = watch_app(state);

    let req = json_request(
        "POST",
        "/watches",
        r#"{"roomId":"room-1","symbol":"BTCUSDT"}"#,
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = json_request(
        "POST",
        "/watches",
        r#"{"roomId":"room-1","symbol":"ETHUSDT"}"#,
    );
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn post_create_watch_rejects_blank_fields() {
    let state = test_state().await;
    let app = watch_app(state.clone());

    let req = json_request("POST", "/watches", r#"{"roomId":"  ","symbol":"BTCUSDT"}"#);
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert!(!state.watches.is_watched("  ").await);
}

#[tokio::test]
async fn delete_watch_stops_watching() {
    let state = test_state().await;
    let app = watch_app(state.clone());

    let req = json_request(
        "POST",
        "/watches",
        r#"{"roomId":"room-1","symbol":"BTCUSDT"}"#,
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .oneshot(empty_request("DELETE", "/watches/room-1"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    assert!(!state.watches.is_watched("room-1").await);
}

#[tokio::test]
async fn delete_unknown_watch_is_not_found() {
    let state = test_state().await;
    let app = watch_app(state);

    let res = app
        .oneshot(empty_request("DELETE", "/watches/ghost"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pause_and_resume_roundtrip() {
    let state = test_state().await;
    let app = watch_app(state.clone());

    let req = json_request(
        "POST",
        "/watches",
        r#"{"roomId":"room-1","symbol":"BTCUSDT"}"#,
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .clone()
        .oneshot(empty_request("POST", "/watches/room-1/pause"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = response_body_json(res).await;
    assert_eq!(body["paused"], true);

    let status = state.watches.status().await;
    assert_eq!(status[0]["paused"], true);

    let res = app
        .oneshot(empty_request("POST", "/watches/room-1/resume"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let status = state.watches.status().await;
    assert_eq!(status[0]["paused"], false);
}

#[tokio::test]
async fn pause_unknown_watch_is_not_found() {
    let state = test_state().await;
    let app = watch_app(state);

    let res = app
        .oneshot(empty_request("POST", "/watches/ghost/pause"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
