use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, SweepResponse, UpdateVehicleRequest, VehicleFilters, VehicleResponse,
};
use crate::repositories::{Store, VehicleStore};
use crate::services::ReservationLifecycle;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub struct VehicleController {
    store: Arc<dyn Store>,
    lifecycle: ReservationLifecycle,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            lifecycle: state.lifecycle.clone(),
        }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        let vehicle = self.store.create_vehicle(&request).await?;
        info!("🚗 Vehículo {} creado ({} {})", vehicle.id, vehicle.brand, vehicle.model);

        Ok(ApiResponse::success_with_message(
            VehicleResponse::new(vehicle, Utc::now()),
            "Vehículo creado exitosamente",
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .store
            .find_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        Ok(VehicleResponse::new(vehicle, Utc::now()))
    }

    pub async fn list(&self, filters: VehicleFilters) -> Result<Vec<VehicleResponse>, AppError> {
        let now = Utc::now();
        let vehicles = self.store.list_vehicles(&filters).await?;

        Ok(vehicles
            .into_iter()
            .map(|v| VehicleResponse::new(v, now))
            .collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        let vehicle = self
            .store
            .update_vehicle(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        if let Some(status) = request.status {
            info!("🚗 Vehículo {} marcado como '{}'", id, status.as_str());
        }

        Ok(ApiResponse::success_with_message(
            VehicleResponse::new(vehicle, Utc::now()),
            "Vehículo actualizado exitosamente",
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_vehicle(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        info!("🗑️ Vehículo {} eliminado", id);
        Ok(())
    }

    /// Barrido manual de holds vencidos
    pub async fn check_expired_reservations(&self) -> Result<ApiResponse<SweepResponse>, AppError> {
        let checked_at = Utc::now();
        let vehicle_ids = self.lifecycle.sweep(checked_at).await?;

        if !vehicle_ids.is_empty() {
            info!("⏰ Barrido manual: {} vehículo(s) liberados", vehicle_ids.len());
        }

        let message = format!("{} reserva(s) vencida(s) liberada(s)", vehicle_ids.len());
        Ok(ApiResponse::success_with_message(
            SweepResponse {
                released: vehicle_ids.len(),
                vehicle_ids,
                checked_at,
            },
            message,
        ))
    }
}
