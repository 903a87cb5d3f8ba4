//! Middleware de autenticación JWT
//!
//! Extrae el token Bearer, lo valida y deja la `Session` del operador en las
//! extensions de la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{models::Session, state::AppState, utils::errors::AppError};

/// Middleware de autenticación JWT
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let claims = state
        .jwt
        .validate(token)
        .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;

    // Inyectar la sesión en las extensions
    request.extensions_mut().insert(Session::from(claims));

    Ok(next.run(request).await)
}
