pub mod auth_routes;
pub mod schedule_routes;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes::create_auth_router(state.clone()))
        .nest("/api/schedules", schedule_routes::create_schedule_router(state.clone()))
        .layer(body_limit)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
