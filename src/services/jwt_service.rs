use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::models::{Operator, SessionClaims};

/// Servicio JWT
pub struct JwtService {
    algorithm: Algorithm,
    session_duration: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str, session_seconds: u64) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            session_duration: Duration::seconds(session_seconds as i64),
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    /// Genera un token de sesión para el operador
    pub fn issue(&self, operator: &Operator) -> Result<(String, SessionClaims), String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: operator.username.clone(),
            can_upload: operator.can_upload,
            jti: Uuid::new_v4().to_string(),
            exp: (now + self.session_duration).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| format!("Error generating session token: {}", e))?;

        Ok((token, claims))
    }

    /// Valida y decodifica un token
    pub fn validate(&self, token: &str) -> Result<SessionClaims, String> {
        let validation = Validation::new(self.algorithm);

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| format!("Invalid token: {}", e))
    }
}
