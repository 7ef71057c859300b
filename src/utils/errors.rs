//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, Clone, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: code.to_string(),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl AppError {
    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::InvalidTransition { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Database(e) => {
                tracing::error!("❌ Database error: {}", e);
                let body = ErrorResponse::new(
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    "DB_ERROR",
                );
                return with_internal_details(status, body, json!({ "sql_error": e.to_string() }));
            }

            AppError::Internal(msg) => {
                tracing::error!("❌ Internal error: {}", msg);
                let body = ErrorResponse::new(
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    "INTERNAL_ERROR",
                );
                return with_internal_details(status, body, json!({ "internal_error": msg }));
            }

            AppError::Validation(e) => {
                tracing::debug!("Validation error: {}", e);
                ErrorResponse::new(
                    "Validation Error",
                    "The provided data is invalid".to_string(),
                    "VALIDATION_ERROR",
                )
                .with_details(json!(e))
            }

            AppError::BadRequest(msg) => {
                tracing::debug!("Bad request: {}", msg);
                ErrorResponse::new("Bad Request", msg, "BAD_REQUEST")
            }

            AppError::InvalidTransition { from, to } => {
                tracing::debug!("Rejected transition {} -> {}", from, to);
                ErrorResponse::new(
                    "Invalid Transition",
                    format!("Cannot move reservation from '{}' to '{}'", from, to),
                    "INVALID_TRANSITION",
                )
                .with_details(json!({ "from": from, "to": to }))
            }

            AppError::Unauthorized(msg) => {
                tracing::debug!("Unauthorized access: {}", msg);
                ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED")
            }

            AppError::Forbidden(msg) => {
                tracing::warn!("⛔ Forbidden access: {}", msg);
                ErrorResponse::new("Forbidden", msg, "FORBIDDEN")
            }

            AppError::NotFound(msg) => {
                tracing::debug!("Resource not found: {}", msg);
                ErrorResponse::new("Not Found", msg, "NOT_FOUND")
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Cuerpo de un error 5xx con el detalle interno.
///
/// Viaja como extensión de la respuesta; el cuerpo enviado no lo incluye
/// salvo que la capa `expose_error_details` lo sustituya en desarrollo.
#[derive(Debug, Clone)]
pub struct DetailedErrorBody(ErrorResponse);

impl DetailedErrorBody {
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self.0)).into_response()
    }
}

fn with_internal_details(
    status: StatusCode,
    body: ErrorResponse,
    details: serde_json::Value,
) -> Response {
    let detailed = DetailedErrorBody(body.clone().with_details(details));
    let mut response = (status, Json(body)).into_response();
    response.extensions_mut().insert(detailed);
    response
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}
