use axum::{
    routing::{delete, post},
    Router,
};

use crate::{controllers::watch_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/watches", post(watch_controller::post_create_watch))
        .route("/watches/:room_id", delete(watch_controller::delete_watch))
        .route("/watches/:room_id/pause", post(watch_controller::post_pause_watch))
        .route("/watches/:room_id/resume", post(watch_controller::post_resume_watch))
}
