//! Detalle de errores internos
//!
//! En desarrollo sustituye el cuerpo genérico de un 5xx por el que incluye
//! `details`. En producción descarta el detalle.

use axum::{extract::State, response::Response};

use crate::state::AppState;
use crate::utils::errors::DetailedErrorBody;

pub async fn expose_error_details(State(state): State<AppState>, mut response: Response) -> Response {
    match response.extensions_mut().remove::<DetailedErrorBody>() {
        Some(detailed) if state.config.is_development() => {
            detailed.into_response_with(response.status())
        }
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use crate::repositories::InMemoryRepository;
    use crate::utils::errors::AppError;
    use axum::response::IntoResponse;
    use std::sync::Arc;

    fn state(environment: &str) -> AppState {
        let mut config = EnvironmentConfig::development("secret");
        config.environment = environment.to_string();
        AppState::new(Arc::new(InMemoryRepository::new()), config)
    }

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_development_exposes_details() {
        let response = AppError::Internal("pool exhausted".to_string()).into_response();
        let response = expose_error_details(State(state("development")), response).await;

        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body["details"]["internal_error"], "pool exhausted");
    }

    #[tokio::test]
    async fn test_production_hides_details() {
        let response = AppError::Internal("pool exhausted".to_string()).into_response();
        let response = expose_error_details(State(state("production")), response).await;

        assert!(response.extensions().get::<DetailedErrorBody>().is_none());
        let body = body_of(response).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(body.get("details").is_none());
    }
}
