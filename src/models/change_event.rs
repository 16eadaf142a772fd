use serde::Deserialize;

use crate::models::OpenOrder;

/// One notification from the open-orders change feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeEvent {
    // "INSERT" | "UPDATE" | "DELETE"
    #[serde(rename = "eventType")]
    pub event_type: String,

    // Delete payloads only carry the key.
    #[serde(default)]
    pub old: Option<RowRef>,

    #[serde(default)]
    pub new: Option<OpenOrder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RowRef {
    #[serde(deserialize_with = "crate::models::num::num_string")]
    pub id: String,
}
