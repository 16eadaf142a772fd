//! Scheduled order engine.
//!
//! Opt-in evaluator for time- and price-triggered orders. The pending set is
//! refreshed from the backend on an interval; evaluation itself runs once per
//! change in the last trade price. An in-memory executed-id set stops an
//! order from being submitted twice: the id goes in before the request is
//! sent and only comes back out if the request fails.

use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{info, warn};

use crate::engine::RoomWatch;
use crate::models::ScheduledOrder;

/// Whether an order's trigger has fired at `now` / `current_price`.
pub fn trigger_met(order: &ScheduledOrder, now: i64, current_price: f64) -> bool {
    match order.schedule_type.as_str() {
        "time_based" => order.scheduled_at.is_some_and(|at| at <= now),
        "price_based" => {
            let Some(trigger) = order.trigger_price else {
                return false;
            };
            match order.trigger_condition.as_deref() {
                Some("above") => current_price >= trigger,
                Some("below") => current_price <= trigger,
                _ => false,
            }
        }
        _ => false,
    }
}

/// Evaluates every cached pending order against the current trade price.
/// Returns how many execution requests were issued.
pub async fn run_scheduled_pass(watch: &RoomWatch, current_price: f64) -> usize {
    if !current_price.is_finite() {
        return 0;
    }

    let now = Utc::now().timestamp();
    let orders = watch.scheduled.lock().await.clone();
    let mut requested = 0;

    for order in orders {
        if order.status != "pending" {
            continue;
        }

        {
            let mut executed = watch.executed.lock().await;
            if executed.contains(&order.id) {
                continue;
            }
            if !trigger_met(&order, now, current_price) {
                continue;
            }
            // marked before the request goes out, so the next pass cannot
            // re-trigger the same order while this one is on the wire
            executed.insert(order.id.clone());
        }

        requested += 1;
        watch.stats.executions_requested.fetch_add(1, Ordering::Relaxed);
        watch.emit("executionRequested");
        submit_execution(watch.clone(), order.id, current_price);
    }

    requested
}

/// Sends the execution request on a detached task. On failure the optimistic
/// executed mark is rolled back so a later pass may retry.
fn submit_execution(watch: RoomWatch, order_id: String, current_price: f64) {
    tokio::spawn(async move {
        let client_time = Utc::now().timestamp();
        match watch
            .backend
            .execute_scheduled(&watch.room_id, &order_id, client_time, current_price)
            .await
        {
            Ok(()) => info!(
                "[scheduled] room {} order {} execution requested at {}",
                watch.room_id, order_id, current_price
            ),
            Err(e) => {
                warn!(
                    "[scheduled] room {} order {} execution request failed: {}",
                    watch.room_id, order_id, e
                );
                watch.executed.lock().await.remove(&order_id);
            }
        }
    });
}

/// Replaces the cached pending set from the backend.
pub async fn refresh_scheduled(watch: &RoomWatch) -> Result<usize, String> {
    let orders: Vec<ScheduledOrder> = watch.backend.fetch_scheduled_orders(&watch.room_id).await?;
    let count = orders.len();
    *watch.scheduled.lock().await = orders;
    Ok(count)
}

/// Re-fetches the pending set on a fixed interval until the watch is
/// cancelled. The first fetch happens immediately on spawn.
pub fn spawn_scheduled_refresh(watch: RoomWatch, every_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(every_secs));
        loop {
            interval.tick().await;
            if watch.is_cancelled() {
                break;
            }
            match refresh_scheduled(&watch).await {
                Ok(count) => info!(
                    "[scheduled] room {} refreshed {} pending order(s)",
                    watch.room_id, count
                ),
                Err(e) => warn!(
                    "[scheduled] room {} refresh failed: {}",
                    watch.room_id, e
                ),
            }
        }
    })
}

/// Runs one evaluation pass per change in the last trade price, skipping
/// repeats of the same price and doing nothing while paused.
pub fn spawn_scheduled_loop(watch: RoomWatch) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rx = watch.quotes.subscribe();
        let mut seen_last: Option<f64> = None;
        loop {
            if rx.changed().await.is_err() {
                break;
            }
            if watch.is_cancelled() {
                break;
            }
            if watch.is_paused() {
                continue;
            }
            let Some(last) = (*rx.borrow_and_update()).and_then(|q| q.last) else {
                continue;
            };
            if seen_last == Some(last) {
                continue;
            }
            seen_last = Some(last);
            run_scheduled_pass(&watch, last).await;
        }
    })
}
