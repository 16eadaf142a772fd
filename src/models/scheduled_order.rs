use serde::{Deserialize, Serialize};

/// An order queued for execution at a future time or price trigger.
///
/// Consumed read-only: the worker only requests execution, the backend owns
/// the `pending → executed` transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledOrder {
    #[serde(deserialize_with = "crate::models::num::num_string")]
    pub id: String,

    #[serde(default, deserialize_with = "crate::models::num::num_string")]
    pub room_id: String,

    #[serde(default)]
    pub symbol: String,

    // "long" | "short"
    #[serde(default)]
    pub side: String,

    #[serde(default)]
    pub order_type: String,

    #[serde(default, deserialize_with = "crate::models::num::loose_f64")]
    pub quantity: f64,

    #[serde(default, deserialize_with = "crate::models::num::opt_f64")]
    pub price: Option<f64>,

    #[serde(default = "default_leverage", deserialize_with = "crate::models::num::loose_f64")]
    pub leverage: f64,

    // "time_based" | "price_based"
    #[serde(default)]
    pub schedule_type: String,

    // epoch seconds; RFC 3339 text accepted on the wire
    #[serde(default, deserialize_with = "crate::models::num::opt_epoch")]
    pub scheduled_at: Option<i64>,

    // "above" | "below"
    #[serde(default)]
    pub trigger_condition: Option<String>,

    #[serde(default, deserialize_with = "crate::models::num::opt_f64")]
    pub trigger_price: Option<f64>,

    #[serde(default)]
    pub status: String,
}

fn default_leverage() -> f64 {
    1.0
}
