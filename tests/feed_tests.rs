use std::time::Duration;

use axum::{routing::get, Json, Router};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::protocol::Message as TMessage;

use roomwatch::engine::RoomWatch;
use roomwatch::models::Quote;
use roomwatch::services::backend::BackendClient;
use roomwatch::services::realtime::spawn_order_feed;
use roomwatch::services::ticker_feed::spawn_ticker_feed;

/// One-connection WS server: waits for the subscribe frame, pushes the given
/// frames, then holds the socket open so the client never hits its reconnect
/// delay during the test.
async fn spawn_ws_server(frames: Vec<String>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        let sub = ws.next().await.unwrap().unwrap();
        assert!(sub.into_text().unwrap().contains("subscribe"));

        for frame in frames {
            ws.send(TMessage::Text(frame)).await.unwrap();
        }

        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    format!("ws://{}", addr)
}

async fn spawn_http(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn test_watch(base_url: &str) -> RoomWatch {
    let (events_tx, _events_rx) = broadcast::channel::<String>(64);
    let backend = BackendClient::new(base_url.to_string(), String::new());
    RoomWatch::new("room-1", "BTCUSDT", backend, events_tx)
}

async fn wait_for_quote(watch: &RoomWatch) -> Quote {
    for _ in 0..300 {
        if let Some(q) = watch.latest_quote() {
            return q;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("no quote published");
}

#[tokio::test]
async fn ticker_feed_publishes_normalized_quotes() {
    // a frame for another symbol first, then ours
    let url = spawn_ws_server(vec![
        r#"{"symbol":"ETHUSDT","bestAskPrice":3000,"bestBidPrice":2999,"lastPrice":2999.5}"#
            .to_string(),
        r#"{"symbol":"BTCUSDT","ask":"99.5","bid":"99.0","lastPrice":"99.2"}"#.to_string(),
    ])
    .await;

    let watch = test_watch("http://127.0.0.1:9");
    let task = spawn_ticker_feed(watch.clone(), url);

    let quote = wait_for_quote(&watch).await;
    assert_eq!(quote.ask, 99.5);
    assert_eq!(quote.bid, 99.0);
    assert_eq!(quote.last, Some(99.2));

    task.abort();
}

#[tokio::test]
async fn ticker_feed_skips_unusable_frames() {
    let url = spawn_ws_server(vec![
        "not json".to_string(),
        r#"{"symbol":"BTCUSDT"}"#.to_string(),
        r#"{"symbol":"BTCUSDT","lastPrice":"101.25"}"#.to_string(),
    ])
    .await;

    let watch = test_watch("http://127.0.0.1:9");
    let task = spawn_ticker_feed(watch.clone(), url);

    // only the last frame can normalize; last-price backstops both sides
    let quote = wait_for_quote(&watch).await;
    assert_eq!(quote.bid, 101.25);
    assert_eq!(quote.ask, 101.25);

    task.abort();
}

#[tokio::test]
async fn order_feed_seeds_then_applies_changes() {
    let seed_app = Router::new().route(
        "/api/trading-room/:room_id/open-orders",
        get(|| async {
            Json(serde_json::json!({
                "data": [{
                    "id": "1",
                    "symbol": "BTCUSDT",
                    "side": "long",
                    "order_type": "limit",
                    "limit_price": "50000",
                    "quantity": 1,
                    "status": "open"
                }]
            }))
        }),
    );
    let base = spawn_http(seed_app).await;

    let frames = vec![
        serde_json::json!({
            "eventType": "INSERT",
            "new": {
                "id": "2",
                "symbol": "BTCUSDT",
                "side": "short",
                "order_type": "limit",
                "limit_price": "51000",
                "quantity": 1,
                "status": "open"
            }
        })
        .to_string(),
        serde_json::json!({ "eventType": "DELETE", "old": { "id": "1" } }).to_string(),
    ];
    let ws_url = spawn_ws_server(frames).await;

    let watch = test_watch(&base);
    let task = spawn_order_feed(watch.clone(), ws_url);

    // seed {1}, insert {1,2}, delete -> {2}
    let mut settled = false;
    for _ in 0..300 {
        let cache = watch.cache.lock().await;
        if cache.len() == 1 && cache.contains("2") {
            settled = true;
            break;
        }
        drop(cache);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(settled, "cache never reached the post-delete state");
    assert!(watch.stats.cache_seeds.load(std::sync::atomic::Ordering::Relaxed) >= 1);

    task.abort();
}
