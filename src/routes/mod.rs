use axum::Router;

use crate::{controllers::status_controller, AppState};

pub mod realtime_routes;
pub mod status_routes;
pub mod watch_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = status_routes::add_routes(router);
    let router = watch_routes::add_routes(router);
    let router = realtime_routes::add_routes(router);

    router
        .fallback(status_controller::not_found)
        .with_state(state)
}
