//! Modelos de autenticación
//!
//! Operadores del dashboard, claims del JWT y la sesión que se inyecta en las
//! requests autenticadas.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cuenta de operador
#[derive(Debug, Clone, FromRow)]
pub struct Operator {
    pub username: String,
    pub password_hash: String,
    pub can_upload: bool,
}

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub can_upload: bool,
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

/// Sesión autenticada que se inyecta en las extensions de la request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: String,
    pub can_upload: bool,
    pub expires_at: i64,
}

impl From<SessionClaims> for Session {
    fn from(claims: SessionClaims) -> Self {
        Self {
            username: claims.sub,
            can_upload: claims.can_upload,
            expires_at: claims.exp,
        }
    }
}
