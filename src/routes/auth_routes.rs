use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::controllers::auth_controller::{login, me};
use crate::middleware::require_session;
use crate::state::AppState;

/// Configura las rutas de autenticación
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, require_session))
        .route("/login", post(login))
}
