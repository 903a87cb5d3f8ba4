use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Session;

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: i64,
    pub session: Session,
}

impl LoginResponse {
    pub fn bearer(token: String, session: Session) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_at: session.expires_at,
            session,
        }
    }
}
