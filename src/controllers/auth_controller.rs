use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::models::Session;
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Endpoint de login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    payload.validate()?;

    let (token, claims) = state.auth().login(payload.username.trim(), &payload.password).await?;

    Ok(Json(ApiResponse::success(LoginResponse::bearer(token, Session::from(claims)))))
}

/// Sesión actual
pub async fn me(Extension(session): Extension<Session>) -> Json<ApiResponse<Session>> {
    Json(ApiResponse::success(session))
}
