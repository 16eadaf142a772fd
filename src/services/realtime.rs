use std::sync::atomic::Ordering;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::task::JoinHandle;
use tokio::time::{self, interval};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as TMessage};
use tracing::{info, warn};

use crate::engine::RoomWatch;
use crate::models::ChangeEvent;

/// Consumes the open-order change feed for one room. Every (re)connect
/// subscribes and then reseeds the cache wholesale from the backend, so the
/// mirror starts fresh after any gap in notifications.
pub fn spawn_order_feed(watch: RoomWatch, ws_url: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if watch.is_cancelled() {
                break;
            }

            let (upstream, _) = match connect_async(ws_url.as_str()).await {
                Ok(x) => x,
                Err(err) => {
                    warn!("[orders] room {} connect failed: {}", watch.room_id, err);
                    time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            };

            info!("[orders] room {} connected", watch.room_id);

            let (mut write, mut read) = upstream.split();

            let sub = serde_json::json!({
                "type": "subscribe",
                "channel": "open-orders",
                "room_id": watch.room_id,
            });
            let _ = write.send(TMessage::Text(sub.to_string())).await;

            seed_cache(&watch).await;

            let mut ping = interval(Duration::from_secs(25));

            loop {
                tokio::select! {
                    _ = ping.tick() => {
                        if watch.is_cancelled() {
                            return;
                        }
                        if write.send(TMessage::Ping(b"ping".to_vec())).await.is_err() {
                            break;
                        }
                    }

                    msg = read.next() => {
                        match msg {
                            Some(Ok(TMessage::Text(txt))) => apply_frame(&watch, &txt).await,
                            Some(Ok(TMessage::Ping(payload))) => {
                                let _ = write.send(TMessage::Pong(payload)).await;
                            }
                            Some(Ok(TMessage::Pong(_))) => {}
                            Some(Ok(TMessage::Close(_))) | None => break,
                            Some(Ok(_)) => {}
                            Some(Err(_)) => break,
                        }
                    }
                }
            }

            if watch.is_cancelled() {
                break;
            }
            warn!("[orders] room {} disconnected, reconnecting", watch.room_id);
            time::sleep(Duration::from_secs(5)).await;
        }
    })
}

/// Wholesale cache replacement from the backend. A failed seed keeps the
/// previous contents; the fill tick carries on against what it has.
pub async fn seed_cache(watch: &RoomWatch) {
    match watch
        .backend
        .fetch_open_orders(&watch.room_id, &watch.symbol)
        .await
    {
        Ok(orders) => {
            let count = orders.len();
            watch.cache.lock().await.seed(orders);
            watch.stats.cache_seeds.fetch_add(1, Ordering::Relaxed);
            watch.emit("cacheSeeded");
            info!("[orders] room {} seeded {} open order(s)", watch.room_id, count);
        }
        Err(e) => warn!("[orders] room {} seed failed: {}", watch.room_id, e),
    }
}

async fn apply_frame(watch: &RoomWatch, txt: &str) {
    let Ok(event) = serde_json::from_str::<ChangeEvent>(txt) else {
        return;
    };
    watch.cache.lock().await.apply(event);
    watch.emit("ordersUpdated");
}
