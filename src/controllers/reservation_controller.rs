use uuid::Uuid;

use crate::dto::api_response::ApiResponse;
use crate::dto::reservation_dto::{
    CreateReservationRequest, ReservationListItem, ReservationStatusResponse,
    UpdateReservationStatusRequest,
};
use crate::models::auth::AuthenticatedUser;
use crate::models::reservation::Reservation;
use crate::services::ReservationLifecycle;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct ReservationController {
    lifecycle: ReservationLifecycle,
}

impl ReservationController {
    pub fn new(state: &AppState) -> Self {
        Self {
            lifecycle: state.lifecycle.clone(),
        }
    }

    pub async fn create(
        &self,
        request: CreateReservationRequest,
        user: Option<AuthenticatedUser>,
    ) -> Result<ApiResponse<Reservation>, AppError> {
        let reservation = self
            .lifecycle
            .create(&request, user.map(|u| u.user_id))
            .await?;

        Ok(ApiResponse::success_with_message(
            reservation,
            "Reserva registrada exitosamente",
        ))
    }

    pub async fn list(&self) -> Result<Vec<ReservationListItem>, AppError> {
        self.lifecycle.list_with_synthetic().await
    }

    pub async fn list_for_user(&self, user: AuthenticatedUser) -> Result<Vec<ReservationListItem>, AppError> {
        self.lifecycle.list_for_user(user.user_id).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Reservation, AppError> {
        self.lifecycle.get(id).await
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateReservationStatusRequest,
    ) -> Result<ApiResponse<ReservationStatusResponse>, AppError> {
        let change = self.lifecycle.update_status(id, request.status).await?;
        let message = format!("Reserva actualizada a '{}'", change.reservation.status.as_str());

        Ok(ApiResponse::success_with_message(
            ReservationStatusResponse {
                reservation: change.reservation,
                vehicle: change.vehicle,
            },
            message,
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.lifecycle.delete(id).await
    }
}
