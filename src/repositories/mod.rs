//! Repositorios
//!
//! La lógica de negocio solo conoce los traits `VehicleStore` y
//! `ReservationStore`. `PostgresRepository` es la implementación de
//! producción; `InMemoryRepository` vive en memoria del proceso.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::reservation_dto::CreateReservationRequest;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters};
use crate::models::reservation::{Reservation, ReservationStatus, ReservationWithVehicle};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppResult;

pub mod memory_repository;
pub mod reservation_repository;
pub mod vehicle_repository;

pub use memory_repository::InMemoryRepository;

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn create_vehicle(&self, request: &CreateVehicleRequest) -> AppResult<Vehicle>;

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn list_vehicles(&self, filters: &VehicleFilters) -> AppResult<Vec<Vehicle>>;

    /// Actualización parcial. Un estado distinto de `reserved` limpia
    /// `reservation_end_time`.
    async fn update_vehicle(&self, id: Uuid, changes: &UpdateVehicleRequest) -> AppResult<Option<Vehicle>>;

    async fn delete_vehicle(&self, id: Uuid) -> AppResult<bool>;

    /// Escribir estado y fin de hold en una sola sentencia
    async fn set_vehicle_status(
        &self,
        id: Uuid,
        status: VehicleStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Vehicle>>;

    /// Liberar todos los holds vencidos antes de `now`; devuelve los ids liberados
    async fn release_expired_holds(&self, now: DateTime<Utc>) -> AppResult<Vec<Uuid>>;
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn create_reservation(
        &self,
        request: &CreateReservationRequest,
        user_id: Option<Uuid>,
    ) -> AppResult<Reservation>;

    async fn find_reservation(&self, id: Uuid) -> AppResult<Option<Reservation>>;

    async fn list_reservations(&self) -> AppResult<Vec<ReservationWithVehicle>>;

    async fn list_reservations_for_user(&self, user_id: Uuid) -> AppResult<Vec<ReservationWithVehicle>>;

    /// Vehículos `reserved` sin ninguna reserva registrada, sea cual sea su estado
    async fn reserved_vehicles_without_reservation(&self) -> AppResult<Vec<Vehicle>>;

    /// Cambiar estado solo si la reserva sigue en `from`. `None` si no existe
    /// o si su estado ya no es `from`.
    async fn set_reservation_status(
        &self,
        id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Reservation>>;

    async fn delete_reservation(&self, id: Uuid) -> AppResult<bool>;
}

/// Almacenamiento completo que consume la aplicación
pub trait Store: VehicleStore + ReservationStore {}

impl<T: VehicleStore + ReservationStore> Store for T {}

/// Repositorio PostgreSQL
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
