use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::models::{OpenOrder, ScheduledOrder};

// every list endpoint wraps its rows the same way
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Vec<T>,
}

/// HTTP client for the trading-room backend API.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    token: String,
}

impl BackendClient {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.token.trim().is_empty() {
            req
        } else {
            req.bearer_auth(&self.token)
        }
    }

    /// Seed query: all open orders for the room and symbol.
    pub async fn fetch_open_orders(
        &self,
        room_id: &str,
        symbol: &str,
    ) -> Result<Vec<OpenOrder>, String> {
        let url = format!("{}/api/trading-room/{}/open-orders", self.base_url, room_id);
        let res = self
            .authed(self.http.get(&url))
            .query(&[("symbol", symbol), ("status", "open")])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("open-orders fetch failed: {status} {body}"));
        }

        let envelope = res
            .json::<DataEnvelope<OpenOrder>>()
            .await
            .map_err(|e| e.to_string())?;
        Ok(envelope.data)
    }

    pub async fn request_fill(
        &self,
        room_id: &str,
        order_id: &str,
        fill_price: f64,
    ) -> Result<(), String> {
        let url = format!("{}/api/trading-room/{}/open-orders", self.base_url, room_id);
        let body = json!({ "action": "fill", "orderId": order_id, "fillPrice": fill_price });

        let res = self
            .authed(self.http.patch(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(format!("fill request failed: {status} {text}"));
        }

        Ok(())
    }

    pub async fn fetch_scheduled_orders(&self, room_id: &str) -> Result<Vec<ScheduledOrder>, String> {
        let url = format!(
            "{}/api/trading-room/{}/scheduled-orders",
            self.base_url, room_id
        );
        let res = self
            .authed(self.http.get(&url))
            .query(&[("status", "pending")])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("scheduled-orders fetch failed: {status} {body}"));
        }

        let envelope = res
            .json::<DataEnvelope<ScheduledOrder>>()
            .await
            .map_err(|e| e.to_string())?;
        Ok(envelope.data)
    }

    pub async fn execute_scheduled(
        &self,
        room_id: &str,
        order_id: &str,
        client_time: i64,
        current_price: f64,
    ) -> Result<(), String> {
        let url = format!(
            "{}/api/trading-room/{}/scheduled-orders/{}/execute",
            self.base_url, room_id, order_id
        );
        let body = json!({ "client_time": client_time, "current_price": current_price });

        let res = self
            .authed(self.http.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(format!("execute request failed: {status} {text}"));
        }

        Ok(())
    }
}
