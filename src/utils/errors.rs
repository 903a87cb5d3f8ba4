//! Sistema de manejo de errores
//!
//! Este módulo define los errores de la API del dashboard
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::repositories::StoreError;
use crate::services::{AuthError, ImportError, UpdateError};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Missing columns: {}", .0.join(", "))]
    Schema(Vec<String>),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Store(e) => {
                error!("Store error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new(
                        "Store Unavailable",
                        "The schedule store could not be reached".to_string(),
                        "STORE_UNAVAILABLE",
                    )
                    .with_details(json!({ "store_error": e.to_string() })),
                )
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Validation Error", "The provided data is invalid".to_string(), "VALIDATION_ERROR")
                        .with_details(json!(e)),
                )
            }

            AppError::Schema(missing) => {
                warn!("Upload rejected, missing columns: {:?}", missing);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse::new(
                        "Schema Error",
                        format!("Missing columns: {}", missing.join(", ")),
                        "SCHEMA_ERROR",
                    )
                    .with_details(json!({ "missing_columns": missing })),
                )
            }

            AppError::Parse(msg) => {
                warn!("Parse error: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorResponse::new("Parse Error", msg, "PARSE_ERROR"))
            }

            AppError::Unauthorized(msg) => {
                warn!("Unauthorized access: {}", msg);
                (StatusCode::UNAUTHORIZED, ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED"))
            }

            AppError::Forbidden(msg) => {
                warn!("Forbidden access: {}", msg);
                (StatusCode::FORBIDDEN, ErrorResponse::new("Forbidden", msg, "FORBIDDEN"))
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorResponse::new("Not Found", msg, "NOT_FOUND"))
            }

            AppError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, ErrorResponse::new("Conflict", msg, "CONFLICT"))
            }

            AppError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"))
            }

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal Server Error", "An unexpected error occurred".to_string(), "INTERNAL_ERROR")
                        .with_details(json!({ "internal_error": msg })),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Forbidden(_) => AppError::Forbidden(err.to_string()),
            ImportError::Schema { missing } => AppError::Schema(missing),
            ImportError::Parse(msg) => AppError::Parse(msg),
            ImportError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<UpdateError> for AppError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::NotFound { .. } => AppError::NotFound(err.to_string()),
            UpdateError::Conflict(_) => AppError::Conflict(err.to_string()),
            UpdateError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            AuthError::Hash(e) => AppError::Internal(e.to_string()),
            AuthError::Token(msg) => AppError::Internal(msg),
            AuthError::Store(e) => AppError::Store(e),
        }
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.add_param("field".into(), &field);
    error.add_param("message".into(), &message);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}
