use bcrypt::{hash, verify, DEFAULT_COST};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Operator, SessionClaims};
use crate::repositories::{AccountRepository, StoreError};
use crate::services::jwt_service::JwtService;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Servicio de autenticación de operadores
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountRepository>, jwt: Arc<JwtService>) -> Self {
        Self { accounts, jwt }
    }

    /// Verifica credenciales y emite un token de sesión
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, SessionClaims), AuthError> {
        let operator = match self.accounts.find_by_username(username).await? {
            Some(operator) => operator,
            None => {
                warn!("❌ Login con usuario desconocido '{}'", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify(password, &operator.password_hash)? {
            warn!("❌ Contraseña incorrecta para '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.jwt.issue(&operator).map_err(AuthError::Token)?;
        info!("✅ Sesión iniciada para '{}' (subida: {})", username, operator.can_upload);
        Ok(issued)
    }

    /// Crea o actualiza un operador con la contraseña dada
    pub async fn register(&self, username: &str, password: &str, can_upload: bool) -> Result<Operator, AuthError> {
        self.register_with_cost(username, password, can_upload, DEFAULT_COST).await
    }

    async fn register_with_cost(
        &self,
        username: &str,
        password: &str,
        can_upload: bool,
        cost: u32,
    ) -> Result<Operator, AuthError> {
        let operator = Operator {
            username: username.to_string(),
            password_hash: hash(password, cost)?,
            can_upload,
        };
        self.accounts.upsert(&operator).await?;
        Ok(operator)
    }
}
