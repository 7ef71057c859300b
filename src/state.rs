//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::Store;
use crate::services::ReservationLifecycle;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: EnvironmentConfig,
    pub lifecycle: ReservationLifecycle,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: EnvironmentConfig) -> Self {
        Self {
            lifecycle: ReservationLifecycle::new(store.clone()),
            store,
            config,
        }
    }
}
