use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{PostgresRepository, ReservationStore};
use crate::dto::reservation_dto::CreateReservationRequest;
use crate::models::reservation::{Reservation, ReservationStatus, ReservationWithVehicle};
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppResult;

const RESERVATION_WITH_VEHICLE: &str = r#"
    SELECT r.*, v.brand AS vehicle_brand, v.model AS vehicle_model, v.year AS vehicle_year
    FROM reservations r
    LEFT JOIN vehicles v ON v.id = r.vehicle_id
"#;

#[async_trait]
impl ReservationStore for PostgresRepository {
    async fn create_reservation(
        &self,
        request: &CreateReservationRequest,
        user_id: Option<Uuid>,
    ) -> AppResult<Reservation> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                id, vehicle_id, user_id, customer_name, customer_email, customer_phone,
                message, preferred_date, preferred_time, status, reservation_end_time,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', NULL, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.vehicle_id)
        .bind(user_id)
        .bind(request.customer_name.trim())
        .bind(request.customer_email.trim())
        .bind(request.customer_phone.trim())
        .bind(&request.message)
        .bind(request.preferred_date)
        .bind(request.preferred_time.as_deref().map(str::trim))
        .fetch_one(&self.pool)
        .await?;

        Ok(reservation)
    }

    async fn find_reservation(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reservation)
    }

    async fn list_reservations(&self) -> AppResult<Vec<ReservationWithVehicle>> {
        let query = format!("{} ORDER BY r.created_at DESC", RESERVATION_WITH_VEHICLE);
        let rows = sqlx::query_as::<_, ReservationWithVehicle>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn list_reservations_for_user(&self, user_id: Uuid) -> AppResult<Vec<ReservationWithVehicle>> {
        let query = format!(
            "{} WHERE r.user_id = $1 ORDER BY r.created_at DESC",
            RESERVATION_WITH_VEHICLE
        );
        let rows = sqlx::query_as::<_, ReservationWithVehicle>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn reserved_vehicles_without_reservation(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT v.* FROM vehicles v
            WHERE v.status = 'reserved'
              AND NOT EXISTS (
                  SELECT 1 FROM reservations r WHERE r.vehicle_id = v.id
              )
            ORDER BY v.updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn set_reservation_status(
        &self,
        id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET status = $3, reservation_end_time = $4, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(end_time)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    async fn delete_reservation(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
