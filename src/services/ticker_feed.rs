use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::task::JoinHandle;
use tokio::time::{self, interval};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as TMessage};
use tracing::{info, warn};

use crate::engine::RoomWatch;
use crate::models::TickerMessage;

/// Connects to the ticker feed, subscribes to the watched symbol and
/// publishes every normalizable frame as the latest quote snapshot.
/// Reconnects after a short delay until the watch is cancelled.
pub fn spawn_ticker_feed(watch: RoomWatch, ws_url: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if watch.is_cancelled() {
                break;
            }

            let (upstream, _) = match connect_async(ws_url.as_str()).await {
                Ok(x) => x,
                Err(err) => {
                    warn!("[ticker] {} connect failed: {}", watch.symbol, err);
                    time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            };

            info!("[ticker] {} connected", watch.symbol);

            let (mut write, mut read) = upstream.split();

            let sub = serde_json::json!({ "type": "subscribe", "symbol": watch.symbol });
            let _ = write.send(TMessage::Text(sub.to_string())).await;

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
                            Some(Ok(TMessage::Text(txt))) => handle_frame(&watch, &txt),
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
            warn!("[ticker] {} disconnected, reconnecting", watch.symbol);
            time::sleep(Duration::from_secs(5)).await;
        }
    })
}

fn handle_frame(watch: &RoomWatch, txt: &str) {
    let Ok(msg) = serde_json::from_str::<TickerMessage>(txt) else {
        return;
    };

    // frames without a symbol tag belong to our single-symbol subscription
    if !msg.symbol.is_empty() && !msg.symbol.eq_ignore_ascii_case(&watch.symbol) {
        return;
    }

    if let Some(quote) = msg.normalize() {
        watch.publish_quote(quote);
    }
}
