//! Ciclo de vida de reservas
//!
//! Única implementación de las transiciones Reservation ↔ Vehicle:
//!
//! - `pending → confirmed`: calcula el fin del hold y lo escribe en la reserva
//!   y en el vehículo, que pasa a `reserved`.
//! - `* → cancelled`: libera el vehículo (`available`, sin fin de hold),
//!   sea cual sea su estado actual.
//! - `confirmed → completed`: solo cambia la reserva.
//!
//! No hay control de concurrencia optimista: dos acciones de administración
//! sobre el mismo vehículo se resuelven por última escritura.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::reservation_dto::{CreateReservationRequest, ReservationListItem};
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::{ReservationStore, Store, VehicleStore};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Resultado de un cambio de estado
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub reservation: Reservation,
    /// Vehículo tras la cascada, si hubo cascada y el vehículo existe
    pub vehicle: Option<Vehicle>,
}

#[derive(Clone)]
pub struct ReservationLifecycle {
    store: Arc<dyn Store>,
}

impl ReservationLifecycle {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Crear una reserva `pending`. No hay control de capacidad: varias
    /// reservas pendientes pueden apuntar al mismo vehículo.
    pub async fn create(
        &self,
        request: &CreateReservationRequest,
        user_id: Option<Uuid>,
    ) -> AppResult<Reservation> {
        if self.store.find_vehicle(request.vehicle_id).await?.is_none() {
            return Err(not_found_error("Vehicle", &request.vehicle_id.to_string()));
        }

        let reservation = self.store.create_reservation(request, user_id).await?;
        info!(
            "📝 Reserva {} creada para vehículo {}",
            reservation.id, request.vehicle_id
        );
        Ok(reservation)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Reservation> {
        self.store
            .find_reservation(id)
            .await?
            .ok_or_else(|| not_found_error("Reservation", &id.to_string()))
    }

    /// Aplicar un cambio de estado validado contra la tabla de transiciones
    pub async fn update_status(&self, id: Uuid, target: ReservationStatus) -> AppResult<StatusChange> {
        let current = self.get(id).await?;

        if !current.status.can_transition_to(target) {
            return Err(AppError::InvalidTransition {
                from: current.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }

        match target {
            ReservationStatus::Confirmed => self.confirm(current).await,
            ReservationStatus::Cancelled => self.cancel(current).await,
            ReservationStatus::Completed => self.complete(current).await,
            ReservationStatus::Pending => Err(AppError::InvalidTransition {
                from: current.status.as_str().to_string(),
                to: target.as_str().to_string(),
            }),
        }
    }

    async fn confirm(&self, current: Reservation) -> AppResult<StatusChange> {
        let end_time = current.hold_end_time();
        if end_time.is_none() && (current.preferred_date.is_some() || current.preferred_time.is_some()) {
            warn!(
                "⚠️ Reserva {}: fecha/hora preferidas no interpretables ({:?} {:?}), se confirma sin expiración",
                current.id, current.preferred_date, current.preferred_time
            );
        }

        let reservation = self
            .write_reservation(&current, ReservationStatus::Confirmed, end_time)
            .await?;
        let vehicle = self
            .cascade_to_vehicle(&reservation, VehicleStatus::Reserved, end_time)
            .await?;

        info!(
            "✅ Reserva {} confirmada (hold hasta {:?})",
            reservation.id, end_time
        );
        Ok(StatusChange { reservation, vehicle })
    }

    async fn cancel(&self, current: Reservation) -> AppResult<StatusChange> {
        let reservation = self
            .write_reservation(&current, ReservationStatus::Cancelled, None)
            .await?;
        // Incondicional: pisa un `sold` escrito por otra vía (última escritura gana)
        let vehicle = self
            .cascade_to_vehicle(&reservation, VehicleStatus::Available, None)
            .await?;

        info!("🚫 Reserva {} cancelada", reservation.id);
        Ok(StatusChange { reservation, vehicle })
    }

    async fn complete(&self, current: Reservation) -> AppResult<StatusChange> {
        let reservation = self
            .write_reservation(&current, ReservationStatus::Completed, current.reservation_end_time)
            .await?;

        info!("🏁 Reserva {} completada", reservation.id);
        Ok(StatusChange {
            reservation,
            vehicle: None,
        })
    }

    /// Escritura condicionada al estado leído: si otra petición cambió la
    /// reserva entre la lectura y la escritura, la transición se rechaza.
    async fn write_reservation(
        &self,
        current: &Reservation,
        status: ReservationStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<Reservation> {
        if let Some(reservation) = self
            .store
            .set_reservation_status(current.id, current.status, status, end_time)
            .await?
        {
            return Ok(reservation);
        }

        let latest = self.get(current.id).await?;
        warn!(
            "⚠️ Reserva {} cambió a '{}' antes de aplicar '{}'",
            current.id,
            latest.status.as_str(),
            status.as_str()
        );
        Err(AppError::InvalidTransition {
            from: latest.status.as_str().to_string(),
            to: status.as_str().to_string(),
        })
    }

    async fn cascade_to_vehicle(
        &self,
        reservation: &Reservation,
        status: VehicleStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Vehicle>> {
        let Some(vehicle_id) = reservation.vehicle_id else {
            return Ok(None);
        };

        let vehicle = self.store.set_vehicle_status(vehicle_id, status, end_time).await?;
        if vehicle.is_none() {
            warn!(
                "⚠️ Reserva {}: el vehículo {} ya no existe, no se propaga '{}'",
                reservation.id,
                vehicle_id,
                status.as_str()
            );
        }
        Ok(vehicle)
    }

    /// Listado de administración: reservas reales + filas sintéticas para
    /// vehículos `reserved` que no tienen ninguna reserva registrada.
    pub async fn list_with_synthetic(&self) -> AppResult<Vec<ReservationListItem>> {
        let mut items: Vec<ReservationListItem> = self
            .store
            .list_reservations()
            .await?
            .into_iter()
            .map(ReservationListItem::from)
            .collect();

        let orphans = self.store.reserved_vehicles_without_reservation().await?;
        if !orphans.is_empty() {
            warn!(
                "⚠️ {} vehículo(s) reservados sin reserva registrada, se añaden filas sintéticas",
                orphans.len()
            );
        }
        items.extend(orphans.into_iter().map(ReservationListItem::synthetic_from_vehicle));

        Ok(items)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<ReservationListItem>> {
        Ok(self
            .store
            .list_reservations_for_user(user_id)
            .await?
            .into_iter()
            .map(ReservationListItem::from)
            .collect())
    }

    /// Borrado físico, sin efecto sobre el vehículo
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_reservation(id).await? {
            return Err(not_found_error("Reservation", &id.to_string()));
        }
        info!("🗑️ Reserva {} eliminada", id);
        Ok(())
    }

    /// Barrido de holds vencidos. No toca las filas de reservations.
    pub async fn sweep(&self, now: DateTime<Utc>) -> AppResult<Vec<Uuid>> {
        self.store.release_expired_holds(now).await
    }
}
