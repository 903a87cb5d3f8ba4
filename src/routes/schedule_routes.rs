use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::controllers::schedule_controller::{
    available, dashboard, export, list_kinds, statuses, target, update_whereabouts, upload,
};
use crate::middleware::require_session;
use crate::state::AppState;

pub fn create_schedule_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/:kind/upload", post(upload))
        .route_layer(middleware::from_fn_with_state(state, require_session));

    Router::new()
        .route("/", get(list_kinds))
        .route("/:kind", get(dashboard))
        .route("/:kind/available", get(available))
        .route("/:kind/statuses", get(statuses))
        .route("/:kind/export", get(export))
        .route("/:kind/vehicles/:identifier/target", get(target))
        .route("/:kind/vehicles/:identifier/whereabouts", put(update_whereabouts))
        .merge(protected)
}
