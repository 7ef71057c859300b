use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::reservation_controller::ReservationController;
use crate::dto::api_response::ApiResponse;
use crate::dto::reservation_dto::{
    CreateReservationRequest, ReservationListItem, ReservationStatusResponse,
    UpdateReservationStatusRequest,
};
use crate::middleware::{AdminUser, MaybeUser};
use crate::models::auth::AuthenticatedUser;
use crate::models::reservation::Reservation;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::ValidatedJson;

pub fn create_reservation_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route("/mine", get(list_my_reservations))
        .route("/:id", get(get_reservation).delete(delete_reservation))
        .route("/:id/status", put(update_reservation_status))
}

async fn create_reservation(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Reservation>>), AppError> {
    let controller = ReservationController::new(&state);
    let response = controller.create(request, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_reservations(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ReservationListItem>>, AppError> {
    let controller = ReservationController::new(&state);
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn list_my_reservations(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<ReservationListItem>>, AppError> {
    let controller = ReservationController::new(&state);
    let response = controller.list_for_user(user).await?;
    Ok(Json(response))
}

async fn get_reservation(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, AppError> {
    let controller = ReservationController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_reservation_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateReservationStatusRequest>,
) -> Result<Json<ApiResponse<ReservationStatusResponse>>, AppError> {
    let controller = ReservationController::new(&state);
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}

async fn delete_reservation(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ReservationController::new(&state);
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message_only("Reserva eliminada exitosamente")))
}
