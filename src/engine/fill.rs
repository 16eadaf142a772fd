//! Fill decision engine.
//!
//! Every tick, cached open orders are compared against the latest bid/ask
//! snapshot. A long limit order crosses when its limit price has reached the
//! ask, a short when it has reached the bid; crossed orders get a fill
//! request at the touched side of the market. The request itself is
//! fire-and-forget: a failure just leaves the order in the cache for the
//! next tick.

use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;
use tracing::{info, warn};

use crate::engine::RoomWatch;
use crate::models::OpenOrder;

/// Returns the fill price for an order that crosses the market, `None` when
/// it rests. Orders whose limit price does not parse as a finite number are
/// treated as resting.
pub fn crossing_fill_price(order: &OpenOrder, bid: f64, ask: f64) -> Option<f64> {
    let limit = order.limit_price.trim().parse::<f64>().ok()?;
    if !limit.is_finite() {
        return None;
    }
    match order.side.as_str() {
        "long" if limit >= ask => Some(ask),
        "short" if limit <= bid => Some(bid),
        _ => None,
    }
}

/// Runs one evaluation pass over the cached orders. Returns how many fill
/// requests were issued. The whole tick is skipped when no usable quote has
/// arrived yet.
pub async fn run_fill_tick(watch: &RoomWatch) -> usize {
    watch.stats.ticks.fetch_add(1, Ordering::Relaxed);

    let Some(quote) = watch.latest_quote() else {
        return 0;
    };
    if !quote.bid.is_finite() || !quote.ask.is_finite() {
        return 0;
    }

    let orders = watch.cache.lock().await.snapshot();
    let mut requested = 0;

    for order in orders {
        let Some(fill_price) = crossing_fill_price(&order, quote.bid, quote.ask) else {
            continue;
        };

        {
            let mut filling = watch.filling.lock().await;
            // a request for this order is still on the wire
            if !filling.insert(order.id.clone()) {
                continue;
            }
        }

        requested += 1;
        watch.stats.fills_requested.fetch_add(1, Ordering::Relaxed);
        watch.emit("fillRequested");
        submit_fill(watch.clone(), order.id, fill_price);
    }

    requested
}

/// Sends the fill request on a detached task, so tearing the watch down
/// never aborts a request already on the wire. The in-flight mark is
/// released once the request settles either way; a failed order is simply
/// re-evaluated on the next tick.
fn submit_fill(watch: RoomWatch, order_id: String, fill_price: f64) {
    tokio::spawn(async move {
        match watch
            .backend
            .request_fill(&watch.room_id, &order_id, fill_price)
            .await
        {
            Ok(()) => info!(
                "[fill] room {} order {} fill requested at {}",
                watch.room_id, order_id, fill_price
            ),
            Err(e) => warn!(
                "[fill] room {} order {} fill request failed: {}",
                watch.room_id, order_id, e
            ),
        }
        watch.filling.lock().await.remove(&order_id);
    });
}

/// Drives `run_fill_tick` on a fixed cadence until the watch is cancelled.
/// Ticks are skipped while the watch is paused.
pub fn spawn_fill_loop(watch: RoomWatch, tick_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(tick_secs));
        loop {
            interval.tick().await;
            if watch.is_cancelled() {
                break;
            }
            if watch.is_paused() {
                continue;
            }
            let requested = run_fill_tick(&watch).await;
            if requested > 0 {
                info!(
                    "[fill] room {} tick issued {} fill request(s)",
                    watch.room_id, requested
                );
            }
        }
    })
}
