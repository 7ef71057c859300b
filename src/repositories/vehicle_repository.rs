use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{PostgresRepository, VehicleStore};
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppResult;

#[async_trait]
impl VehicleStore for PostgresRepository {
    async fn create_vehicle(&self, request: &CreateVehicleRequest) -> AppResult<Vehicle> {
        let status = request.status.unwrap_or(VehicleStatus::Available);

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, brand, model, year, price, mileage, fuel_type, transmission,
                color, description, status, reservation_end_time, featured, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NULL, $12, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.brand.trim())
        .bind(request.model.trim())
        .bind(request.year)
        .bind(request.price)
        .bind(request.mileage)
        .bind(request.fuel_type)
        .bind(request.transmission)
        .bind(&request.color)
        .bind(&request.description)
        .bind(status)
        .bind(request.featured.unwrap_or(false))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list_vehicles(&self, filters: &VehicleFilters) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE ($1::vehicle_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR LOWER(brand) = LOWER($2))
              AND ($3::fuel_type IS NULL OR fuel_type = $3)
              AND ($4::boolean IS NULL OR featured = $4)
            ORDER BY featured DESC, created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(filters.status)
        .bind(&filters.brand)
        .bind(filters.fuel_type)
        .bind(filters.featured)
        .bind(filters.limit())
        .bind(filters.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn update_vehicle(&self, id: Uuid, changes: &UpdateVehicleRequest) -> AppResult<Option<Vehicle>> {
        // En SET las columnas leen el valor anterior de la fila
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET
                brand = COALESCE($2, brand),
                model = COALESCE($3, model),
                year = COALESCE($4, year),
                price = COALESCE($5, price),
                mileage = COALESCE($6, mileage),
                fuel_type = COALESCE($7, fuel_type),
                transmission = COALESCE($8, transmission),
                color = COALESCE($9, color),
                description = COALESCE($10, description),
                status = COALESCE($11, status),
                reservation_end_time = CASE
                    WHEN COALESCE($11, status) = 'reserved' THEN reservation_end_time
                    ELSE NULL
                END,
                featured = COALESCE($12, featured),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.brand.as_deref().map(str::trim))
        .bind(changes.model.as_deref().map(str::trim))
        .bind(changes.year)
        .bind(changes.price)
        .bind(changes.mileage)
        .bind(changes.fuel_type)
        .bind(changes.transmission)
        .bind(&changes.color)
        .bind(&changes.description)
        .bind(changes.status)
        .bind(changes.featured)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn delete_vehicle(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_vehicle_status(
        &self,
        id: Uuid,
        status: VehicleStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Vehicle>> {
        let end_time = match status {
            VehicleStatus::Reserved => end_time,
            _ => None,
        };

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET status = $2, reservation_end_time = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(end_time)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn release_expired_holds(&self, now: DateTime<Utc>) -> AppResult<Vec<Uuid>> {
        // Una fila liberada deja de cumplir el predicado: repetir es inocuo
        let released = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE vehicles
            SET status = 'available', reservation_end_time = NULL, updated_at = NOW()
            WHERE status = 'reserved'
              AND reservation_end_time IS NOT NULL
              AND reservation_end_time < $1
            RETURNING id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(released)
    }
}
