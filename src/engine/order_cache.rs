//! In-memory mirror of a room's open orders for one symbol.
//!
//! The cache is seeded from the backend on (re)connect and then kept in step
//! by applying INSERT/UPDATE/DELETE change events from the realtime feed. It
//! only ever holds rows that are open and for the watched symbol; everything
//! else is filtered out on the way in. Change-feed rows can be partial, so
//! membership never leans on fields a partial row may omit.

use std::collections::HashMap;

use crate::models::{ChangeEvent, OpenOrder};

#[derive(Debug)]
pub struct OrderCache {
    symbol: String,
    orders: HashMap<String, OpenOrder>,
}

impl OrderCache {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            orders: HashMap::new(),
        }
    }

    fn relevant(&self, order: &OpenOrder) -> bool {
        order.status == "open" && order.symbol.eq_ignore_ascii_case(&self.symbol)
    }

    /// Replaces the whole cache with a fresh seed, dropping whatever the
    /// change feed had accumulated before the reconnect.
    pub fn seed(&mut self, orders: Vec<OpenOrder>) {
        self.orders.clear();
        for order in orders {
            if self.relevant(&order) {
                self.orders.insert(order.id.clone(), order);
            }
        }
    }

    /// Applies one change event. Irrelevant rows fall out of the cache: an
    /// UPDATE that closes an order removes it, an UPDATE that reopens one
    /// inserts it, and unknown event types are ignored.
    pub fn apply(&mut self, event: ChangeEvent) {
        match event.event_type.as_str() {
            "INSERT" | "UPDATE" => {
                let Some(order) = event.new else { return };
                if self.relevant(&order) {
                    self.orders.insert(order.id.clone(), order);
                } else {
                    self.orders.remove(&order.id);
                }
            }
            "DELETE" => {
                if let Some(row) = event.old {
                    self.orders.remove(&row.id);
                }
            }
            _ => {}
        }
    }

    pub fn snapshot(&self) -> Vec<OpenOrder> {
        self.orders.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.orders.contains_key(id)
    }
}
