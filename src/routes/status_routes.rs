use axum::{routing::get, Router};

use crate::{controllers::status_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/health", get(status_controller::get_health))
        .route("/status", get(status_controller::get_status))
}
