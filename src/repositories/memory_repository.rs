//! Repositorio en memoria
//!
//! Mismas semánticas que `PostgresRepository` (incluida la limpieza de
//! `reservation_end_time` al salir de `reserved`), sin base de datos.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ReservationStore, VehicleStore};
use crate::dto::reservation_dto::CreateReservationRequest;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters};
use crate::models::reservation::{Reservation, ReservationStatus, ReservationWithVehicle};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppResult;

#[derive(Default)]
pub struct InMemoryRepository {
    vehicles: RwLock<HashMap<Uuid, Vehicle>>,
    reservations: RwLock<HashMap<Uuid, Reservation>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insertar un vehículo tal cual (datos heredados, fixtures)
    pub async fn insert_vehicle(&self, vehicle: Vehicle) {
        self.vehicles.write().await.insert(vehicle.id, vehicle);
    }

    fn join(reservation: &Reservation, vehicles: &HashMap<Uuid, Vehicle>) -> ReservationWithVehicle {
        let vehicle = reservation.vehicle_id.and_then(|id| vehicles.get(&id));
        ReservationWithVehicle {
            reservation: reservation.clone(),
            vehicle_brand: vehicle.map(|v| v.brand.clone()),
            vehicle_model: vehicle.map(|v| v.model.clone()),
            vehicle_year: vehicle.map(|v| v.year),
        }
    }

    async fn joined_where<F>(&self, predicate: F) -> Vec<ReservationWithVehicle>
    where
        F: Fn(&Reservation) -> bool,
    {
        let vehicles = self.vehicles.read().await;
        let reservations = self.reservations.read().await;

        let mut rows: Vec<ReservationWithVehicle> = reservations
            .values()
            .filter(|r| predicate(r))
            .map(|r| Self::join(r, &vehicles))
            .collect();
        rows.sort_by(|a, b| b.reservation.created_at.cmp(&a.reservation.created_at));
        rows
    }
}

#[async_trait]
impl VehicleStore for InMemoryRepository {
    async fn create_vehicle(&self, request: &CreateVehicleRequest) -> AppResult<Vehicle> {
        let now = Utc::now();
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            brand: request.brand.trim().to_string(),
            model: request.model.trim().to_string(),
            year: request.year,
            price: request.price,
            mileage: request.mileage,
            fuel_type: request.fuel_type,
            transmission: request.transmission,
            color: request.color.clone(),
            description: request.description.clone(),
            status: request.status.unwrap_or(VehicleStatus::Available),
            reservation_end_time: None,
            featured: request.featured.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        self.vehicles.write().await.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.vehicles.read().await.get(&id).cloned())
    }

    async fn list_vehicles(&self, filters: &VehicleFilters) -> AppResult<Vec<Vehicle>> {
        let vehicles = self.vehicles.read().await;

        let mut matching: Vec<Vehicle> = vehicles
            .values()
            .filter(|v| filters.status.map_or(true, |s| v.status == s))
            .filter(|v| {
                filters
                    .brand
                    .as_ref()
                    .map_or(true, |b| v.brand.to_lowercase() == b.to_lowercase())
            })
            .filter(|v| filters.fuel_type.map_or(true, |f| v.fuel_type == f))
            .filter(|v| filters.featured.map_or(true, |f| v.featured == f))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            b.featured
                .cmp(&a.featured)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        Ok(matching
            .into_iter()
            .skip(filters.offset() as usize)
            .take(filters.limit() as usize)
            .collect())
    }

    async fn update_vehicle(&self, id: Uuid, changes: &UpdateVehicleRequest) -> AppResult<Option<Vehicle>> {
        let mut vehicles = self.vehicles.write().await;
        let Some(vehicle) = vehicles.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(brand) = &changes.brand {
            vehicle.brand = brand.trim().to_string();
        }
        if let Some(model) = &changes.model {
            vehicle.model = model.trim().to_string();
        }
        if let Some(year) = changes.year {
            vehicle.year = year;
        }
        if let Some(price) = changes.price {
            vehicle.price = price;
        }
        if let Some(mileage) = changes.mileage {
            vehicle.mileage = mileage;
        }
        if let Some(fuel_type) = changes.fuel_type {
            vehicle.fuel_type = fuel_type;
        }
        if let Some(transmission) = changes.transmission {
            vehicle.transmission = transmission;
        }
        if changes.color.is_some() {
            vehicle.color = changes.color.clone();
        }
        if changes.description.is_some() {
            vehicle.description = changes.description.clone();
        }
        if let Some(featured) = changes.featured {
            vehicle.featured = featured;
        }

        let status = changes.status.unwrap_or(vehicle.status);
        let end_time = vehicle.reservation_end_time;
        vehicle.apply_status(status, end_time);
        vehicle.updated_at = Utc::now();

        Ok(Some(vehicle.clone()))
    }

    async fn delete_vehicle(&self, id: Uuid) -> AppResult<bool> {
        let removed = self.vehicles.write().await.remove(&id).is_some();
        if removed {
            // ON DELETE SET NULL
            for reservation in self.reservations.write().await.values_mut() {
                if reservation.vehicle_id == Some(id) {
                    reservation.vehicle_id = None;
                }
            }
        }
        Ok(removed)
    }

    async fn set_vehicle_status(
        &self,
        id: Uuid,
        status: VehicleStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Vehicle>> {
        let mut vehicles = self.vehicles.write().await;
        Ok(vehicles.get_mut(&id).map(|vehicle| {
            vehicle.apply_status(status, end_time);
            vehicle.updated_at = Utc::now();
            vehicle.clone()
        }))
    }

    async fn release_expired_holds(&self, now: DateTime<Utc>) -> AppResult<Vec<Uuid>> {
        let mut vehicles = self.vehicles.write().await;
        let mut released = Vec::new();

        for vehicle in vehicles.values_mut().filter(|v| v.hold_expired(now)) {
            vehicle.apply_status(VehicleStatus::Available, None);
            vehicle.updated_at = Utc::now();
            released.push(vehicle.id);
        }

        Ok(released)
    }
}

#[async_trait]
impl ReservationStore for InMemoryRepository {
    async fn create_reservation(
        &self,
        request: &CreateReservationRequest,
        user_id: Option<Uuid>,
    ) -> AppResult<Reservation> {
        let now = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            vehicle_id: Some(request.vehicle_id),
            user_id,
            customer_name: request.customer_name.trim().to_string(),
            customer_email: request.customer_email.trim().to_string(),
            customer_phone: request.customer_phone.trim().to_string(),
            message: request.message.clone(),
            preferred_date: request.preferred_date,
            preferred_time: request.preferred_time.as_deref().map(|t| t.trim().to_string()),
            status: ReservationStatus::Pending,
            reservation_end_time: None,
            created_at: now,
            updated_at: now,
        };

        self.reservations
            .write()
            .await
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn find_reservation(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        Ok(self.reservations.read().await.get(&id).cloned())
    }

    async fn list_reservations(&self) -> AppResult<Vec<ReservationWithVehicle>> {
        Ok(self.joined_where(|_| true).await)
    }

    async fn list_reservations_for_user(&self, user_id: Uuid) -> AppResult<Vec<ReservationWithVehicle>> {
        Ok(self.joined_where(|r| r.user_id == Some(user_id)).await)
    }

    async fn reserved_vehicles_without_reservation(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = self.vehicles.read().await;
        let reservations = self.reservations.read().await;

        let mut orphans: Vec<Vehicle> = vehicles
            .values()
            .filter(|v| v.status == VehicleStatus::Reserved)
            .filter(|v| !reservations.values().any(|r| r.vehicle_id == Some(v.id)))
            .cloned()
            .collect();
        orphans.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(orphans)
    }

    async fn set_reservation_status(
        &self,
        id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Reservation>> {
        let mut reservations = self.reservations.write().await;
        let current = reservations.get_mut(&id).filter(|r| r.status == from);
        Ok(current.map(|reservation| {
            reservation.status = to;
            reservation.reservation_end_time = end_time;
            reservation.updated_at = Utc::now();
            reservation.clone()
        }))
    }

    async fn delete_reservation(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.reservations.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::tests::sample_vehicle;

    #[tokio::test]
    async fn test_brand_filter_is_exact_and_case_insensitive() {
        let repo = InMemoryRepository::new();
        repo.insert_vehicle(sample_vehicle(VehicleStatus::Available)).await;

        let by_brand = |brand: &str| VehicleFilters {
            brand: Some(brand.to_string()),
            ..Default::default()
        };

        assert_eq!(repo.list_vehicles(&by_brand("SEAT")).await.unwrap().len(), 1);
        assert!(repo.list_vehicles(&by_brand("%")).await.unwrap().is_empty());
        assert!(repo.list_vehicles(&by_brand("Se_t")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_write_requires_expected_current_status() {
        let repo = InMemoryRepository::new();
        let vehicle = sample_vehicle(VehicleStatus::Available);
        let vehicle_id = vehicle.id;
        repo.insert_vehicle(vehicle).await;

        let request: CreateReservationRequest = serde_json::from_value(serde_json::json!({
            "vehicle_id": vehicle_id,
            "customer_name": "Ana Ruiz",
            "customer_email": "ana@example.com",
            "customer_phone": "600111222"
        }))
        .unwrap();
        let reservation = repo.create_reservation(&request, None).await.unwrap();

        let stale = repo
            .set_reservation_status(
                reservation.id,
                ReservationStatus::Confirmed,
                ReservationStatus::Completed,
                None,
            )
            .await
            .unwrap();
        assert!(stale.is_none());

        let confirmed = repo
            .set_reservation_status(
                reservation.id,
                ReservationStatus::Pending,
                ReservationStatus::Confirmed,
                None,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    }
}
