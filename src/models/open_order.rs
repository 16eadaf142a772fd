use serde::{Deserialize, Serialize};

/// An open order row mirrored from the backing store.
///
/// Only rows with `status == "open"` belong in the cache. Everything except
/// `id` tolerates absence because change-feed payloads can be partial rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOrder {
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

    // Kept as raw text; parsed at decision time. An unparseable value makes
    // the fill engine skip the order.
    #[serde(default, deserialize_with = "crate::models::num::num_string")]
    pub limit_price: String,

    #[serde(default, deserialize_with = "crate::models::num::loose_f64")]
    pub quantity: f64,

    #[serde(default)]
    pub status: String,
}
