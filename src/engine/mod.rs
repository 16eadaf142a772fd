//! The order-fill engine: an open-order cache mirrored from the change feed,
//! a fixed-cadence fill-decision loop and the opt-in scheduled-order
//! evaluator, all hanging off one owned `RoomWatch` per activation.

pub mod fill;
pub mod order_cache;
pub mod scheduled;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch, Mutex};

use crate::engine::order_cache::OrderCache;
use crate::models::{Quote, ScheduledOrder};
use crate::services::backend::BackendClient;

/// Counters surfaced on `/status`.
#[derive(Debug, Default)]
pub struct WatchStats {
    pub ticks: AtomicU64,
    pub fills_requested: AtomicU64,
    pub executions_requested: AtomicU64,
    pub cache_seeds: AtomicU64,
}

/// Owned state for one room/symbol activation.
///
/// Everything the engines share lives here instead of at module scope, so a
/// watch carries no state across activations: it is built on activate and
/// dropped on deactivate, executed-id set included.
#[derive(Clone)]
pub struct RoomWatch {
    pub room_id: String,
    pub symbol: String,

    pub backend: BackendClient,

    pub cache: Arc<Mutex<OrderCache>>,

    // order ids with a fill request currently on the wire
    pub filling: Arc<Mutex<HashSet<String>>>,

    // scheduled-order ids already submitted for execution this session
    pub executed: Arc<Mutex<HashSet<String>>>,

    // cached pending scheduled orders, refreshed periodically
    pub scheduled: Arc<Mutex<Vec<ScheduledOrder>>>,

    // latest normalized ticker snapshot
    pub quotes: Arc<watch::Sender<Option<Quote>>>,

    pub paused: Arc<AtomicBool>,
    pub cancelled: Arc<AtomicBool>,

    pub stats: Arc<WatchStats>,
    pub events_tx: broadcast::Sender<String>,
}

impl RoomWatch {
    pub fn new(
        room_id: &str,
        symbol: &str,
        backend: BackendClient,
        events_tx: broadcast::Sender<String>,
    ) -> Self {
        let symbol = symbol.to_uppercase();
        let (quotes, _) = watch::channel(None);

        Self {
            room_id: room_id.to_string(),
            cache: Arc::new(Mutex::new(OrderCache::new(&symbol))),
            symbol,
            backend,
            filling: Arc::new(Mutex::new(HashSet::new())),
            executed: Arc::new(Mutex::new(HashSet::new())),
            scheduled: Arc::new(Mutex::new(Vec::new())),
            quotes: Arc::new(quotes),
            paused: Arc::new(AtomicBool::new(false)),
            cancelled: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(WatchStats::default()),
            events_tx,
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Flags the watch as torn down. The manager also aborts the loop tasks;
    /// fill/execute requests already on the wire run to settlement.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn publish_quote(&self, quote: Quote) {
        self.quotes.send_replace(Some(quote));
    }

    pub fn latest_quote(&self) -> Option<Quote> {
        *self.quotes.borrow()
    }

    pub fn emit(&self, event: &str) {
        let payload = serde_json::json!({
            "event": event,
            "roomId": self.room_id,
            "symbol": self.symbol,
        })
        .to_string();
        // best effort: nobody listening is fine
        let _ = self.events_tx.send(payload);
    }
}
