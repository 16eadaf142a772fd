use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Settings;
use crate::engine::{fill, scheduled, RoomWatch};
use crate::services::backend::BackendClient;
use crate::services::{realtime, ticker_feed};

struct ActiveWatch {
    watch: RoomWatch,
    tasks: Vec<JoinHandle<()>>,
}

/// Registry of active watches keyed by room id. Activation spawns the task
/// set for one room/symbol pair; deactivation cancels the watch and aborts
/// its loops. Fill and execute requests already on the wire are detached
/// tasks, so an abort here never cuts one off mid-flight.
#[derive(Clone)]
pub struct WatchManager {
    settings: Settings,
    backend: BackendClient,
    events_tx: broadcast::Sender<String>,
    inner: Arc<Mutex<HashMap<String, ActiveWatch>>>,
}

impl WatchManager {
    pub fn new(
        settings: Settings,
        backend: BackendClient,
        events_tx: broadcast::Sender<String>,
    ) -> Self {
        Self {
            settings,
            backend,
            events_tx,
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn activate(&self, room_id: &str, symbol: &str) -> Result<(), String> {
        let mut inner = self.inner.lock().await;
        if inner.contains_key(room_id) {
            return Err(format!("room {room_id} is already watched"));
        }

        let watch = RoomWatch::new(room_id, symbol, self.backend.clone(), self.events_tx.clone());

        let mut tasks = vec![
            ticker_feed::spawn_ticker_feed(watch.clone(), self.settings.ticker_ws_url.clone()),
            realtime::spawn_order_feed(watch.clone(), self.settings.realtime_ws_url.clone()),
            fill::spawn_fill_loop(watch.clone(), self.settings.fill_tick_secs),
        ];

        if self.settings.scheduled_orders_enabled {
            tasks.push(scheduled::spawn_scheduled_refresh(
                watch.clone(),
                self.settings.scheduled_refresh_secs,
            ));
            tasks.push(scheduled::spawn_scheduled_loop(watch.clone()));
        }

        watch.emit("watchStarted");
        info!("[watch] room {} watching {}", room_id, watch.symbol);

        inner.insert(room_id.to_string(), ActiveWatch { watch, tasks });
        Ok(())
    }

    pub async fn deactivate(&self, room_id: &str) -> Result<(), String> {
        let mut inner = self.inner.lock().await;
        let Some(active) = inner.remove(room_id) else {
            return Err(format!("room {room_id} is not watched"));
        };

        active.watch.cancel();
        for task in &active.tasks {
            task.abort();
        }

        active.watch.emit("watchStopped");
        info!("[watch] room {} stopped", room_id);
        Ok(())
    }

    pub async fn pause(&self, room_id: &str) -> Result<(), String> {
        let inner = self.inner.lock().await;
        let Some(active) = inner.get(room_id) else {
            return Err(format!("room {room_id} is not watched"));
        };

        active.watch.pause();
        active.watch.emit("watchPaused");
        info!("[watch] room {} paused", room_id);
        Ok(())
    }

    pub async fn resume(&self, room_id: &str) -> Result<(), String> {
        let inner = self.inner.lock().await;
        let Some(active) = inner.get(room_id) else {
            return Err(format!("room {room_id} is not watched"));
        };

        active.watch.resume();
        active.watch.emit("watchResumed");
        info!("[watch] room {} resumed", room_id);
        Ok(())
    }

    pub async fn is_watched(&self, room_id: &str) -> bool {
        self.inner.lock().await.contains_key(room_id)
    }

    /// One JSON blob per active watch, sorted by room id for stable output.
    pub async fn status(&self) -> Vec<serde_json::Value> {
        let inner = self.inner.lock().await;
        let mut out = Vec::with_capacity(inner.len());

        for active in inner.values() {
            let w = &active.watch;
            out.push(json!({
                "roomId": w.room_id,
                "symbol": w.symbol,
                "paused": w.is_paused(),
                "openOrders": w.cache.lock().await.len(),
                "inFlightFills": w.filling.lock().await.len(),
                "pendingScheduled": w.scheduled.lock().await.len(),
                "executedScheduled": w.executed.lock().await.len(),
                "ticks": w.stats.ticks.load(Ordering::Relaxed),
                "fillsRequested": w.stats.fills_requested.load(Ordering::Relaxed),
                "executionsRequested": w.stats.executions_requested.load(Ordering::Relaxed),
                "cacheSeeds": w.stats.cache_seeds.load(Ordering::Relaxed),
                "quote": w.latest_quote(),
            }));
        }

        out.sort_by(|a, b| {
            a["roomId"]
                .as_str()
                .unwrap_or_default()
                .cmp(b["roomId"].as_str().unwrap_or_default())
        });
        out
    }
}
