use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub backend_url: String,
    pub backend_token: String,

    pub ticker_ws_url: String,
    pub realtime_ws_url: String,

    pub fill_tick_secs: u64,

    pub scheduled_orders_enabled: bool,
    pub scheduled_refresh_secs: u64,

    // room_id:SYMBOL pairs activated at startup
    pub watches: Vec<(String, String)>,
}

fn env_bool(name: &str) -> bool {
    env::var(name)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v == "1" || v == "true"
        })
        .unwrap_or(false)
}

fn parse_watches(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let mut it = pair.trim().splitn(2, ':');
            let room = it.next()?.trim();
            let symbol = it.next()?.trim();
            if room.is_empty() || symbol.is_empty() {
                return None;
            }
            Some((room.to_string(), symbol.to_uppercase()))
        })
        .collect()
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let backend_url =
        env::var("BACKEND_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

    let backend_token = env::var("BACKEND_TOKEN").unwrap_or_default();

    let ticker_ws_url =
        env::var("TICKER_WS_URL").unwrap_or_else(|_| "ws://127.0.0.1:8000/ws/ticker".to_string());

    let realtime_ws_url = env::var("REALTIME_WS_URL")
        .unwrap_or_else(|_| "ws://127.0.0.1:8000/ws/realtime".to_string());

    let fill_tick_secs = env::var("FILL_TICK_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(1);

    // Off unless explicitly opted in, so merely running the worker never
    // executes anyone's scheduled orders.
    let scheduled_orders_enabled = env_bool("SCHEDULED_ORDERS_ENABLED");

    let scheduled_refresh_secs = env::var("SCHEDULED_REFRESH_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(30);

    let watches = env::var("WATCHES")
        .map(|raw| parse_watches(&raw))
        .unwrap_or_default();

    Settings {
        host,
        port,
        backend_url,
        backend_token,
        ticker_ws_url,
        realtime_ws_url,
        fill_tick_secs,
        scheduled_orders_enabled,
        scheduled_refresh_secs,
        watches,
    }
}
