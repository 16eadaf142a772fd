use std::net::SocketAddr;

use tokio::sync::broadcast;

use roomwatch::services::backend::BackendClient;
use roomwatch::services::watch_manager::WatchManager;
use roomwatch::{config, routes, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    let (events_tx, _) = broadcast::channel::<String>(256);

    let backend = BackendClient::new(settings.backend_url.clone(), settings.backend_token.clone());
    let watches = WatchManager::new(settings.clone(), backend, events_tx.clone());

    // Watches listed in WATCHES come up with the process.
    for (room_id, symbol) in &settings.watches {
        if let Err(e) = watches.activate(room_id, symbol).await {
            tracing::error!("startup watch {}/{} failed: {}", room_id, symbol, e);
        }
    }

    let state = AppState {
        settings: settings.clone(),
        watches,
        events_tx,
    };

    let app = routes::app(state);

    let addr = SocketAddr::from((settings.host.parse::<std::net::IpAddr>().unwrap(), settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
