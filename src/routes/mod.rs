//! Rutas HTTP
//!
//! `create_router` monta la API completa sobre un `AppState`; main y los
//! tests HTTP usan el mismo router.

pub mod reservation_routes;
pub mod vehicle_routes;

use axum::{middleware::map_response_with_state, response::Json, routing::get, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{cors_layer, expose_error_details};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/reservations", reservation_routes::create_reservation_router())
        .layer(map_response_with_state(state.clone(), expose_error_details))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
