//! Tests contra PostgreSQL real. Se omiten si `DATABASE_URL` no está definido.
//!
//! Comparten base de datos: cada test crea sus propios vehículos y solo
//! comprueba sus propios ids.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use dealership_backend::config::DatabaseConfig;
use dealership_backend::database::connect_and_migrate;
use dealership_backend::dto::reservation_dto::CreateReservationRequest;
use dealership_backend::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters};
use dealership_backend::models::reservation::ReservationStatus;
use dealership_backend::models::vehicle::{FuelType, Transmission, Vehicle, VehicleStatus};
use dealership_backend::repositories::{PostgresRepository, ReservationStore, VehicleStore};

async fn test_database() -> Option<(PgPool, PostgresRepository)> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL no definido, se omite el test de PostgreSQL");
        return None;
    }

    let config = DatabaseConfig::from_env().unwrap();
    let pool = connect_and_migrate(&config).await.unwrap();
    Some((pool.clone(), PostgresRepository::new(pool)))
}

async fn add_vehicle(repo: &PostgresRepository, brand: &str) -> Vehicle {
    repo.create_vehicle(&CreateVehicleRequest {
        brand: brand.to_string(),
        model: "Ibiza".to_string(),
        year: 2022,
        price: Decimal::new(1650000, 2),
        mileage: 12000,
        fuel_type: FuelType::Petrol,
        transmission: Transmission::Manual,
        color: None,
        description: None,
        status: None,
        featured: None,
    })
    .await
    .unwrap()
}

fn reservation_for(vehicle_id: Uuid) -> CreateReservationRequest {
    CreateReservationRequest {
        vehicle_id,
        customer_name: "Pablo Núñez".to_string(),
        customer_email: "pablo@example.com".to_string(),
        customer_phone: "+34 611 222 333".to_string(),
        message: None,
        preferred_date: None,
        preferred_time: None,
    }
}

#[tokio::test]
async fn test_sweep_releases_expired_holds_once() {
    let Some((_, repo)) = test_database().await else { return };
    let now = Utc::now();

    let expired = add_vehicle(&repo, "Seat").await;
    let future = add_vehicle(&repo, "Seat").await;
    repo.set_vehicle_status(expired.id, VehicleStatus::Reserved, Some(now - Duration::seconds(1)))
        .await
        .unwrap();
    repo.set_vehicle_status(future.id, VehicleStatus::Reserved, Some(now + Duration::hours(1)))
        .await
        .unwrap();

    let released = repo.release_expired_holds(now).await.unwrap();
    assert!(released.contains(&expired.id));
    assert!(!released.contains(&future.id));

    let expired = repo.find_vehicle(expired.id).await.unwrap().unwrap();
    assert_eq!(expired.status, VehicleStatus::Available);
    assert!(expired.reservation_end_time.is_none());

    let future = repo.find_vehicle(future.id).await.unwrap().unwrap();
    assert_eq!(future.status, VehicleStatus::Reserved);
    assert!(future.reservation_end_time.is_some());

    let again = repo.release_expired_holds(now).await.unwrap();
    assert!(!again.contains(&expired.id));
}

#[tokio::test]
async fn test_update_clears_end_time_when_leaving_reserved() {
    let Some((_, repo)) = test_database().await else { return };
    let end = Utc::now() + Duration::hours(2);

    let vehicle = add_vehicle(&repo, "Seat").await;
    repo.set_vehicle_status(vehicle.id, VehicleStatus::Reserved, Some(end))
        .await
        .unwrap();

    // Sin cambio de estado el hold se conserva
    let renamed = repo
        .update_vehicle(
            vehicle.id,
            &UpdateVehicleRequest {
                color: Some("rojo".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.status, VehicleStatus::Reserved);
    assert!(renamed.reservation_end_time.is_some());

    let sold = repo
        .update_vehicle(
            vehicle.id,
            &UpdateVehicleRequest {
                status: Some(VehicleStatus::Sold),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sold.status, VehicleStatus::Sold);
    assert!(sold.reservation_end_time.is_none());
}

#[tokio::test]
async fn test_hold_check_constraint() {
    let Some((pool, repo)) = test_database().await else { return };
    let vehicle = add_vehicle(&repo, "Seat").await;

    let result = sqlx::query("UPDATE vehicles SET reservation_end_time = NOW() WHERE id = $1")
        .bind(vehicle.id)
        .execute(&pool)
        .await;
    assert!(result.is_err());

    let unchanged = repo.find_vehicle(vehicle.id).await.unwrap().unwrap();
    assert!(unchanged.reservation_end_time.is_none());
}

#[tokio::test]
async fn test_orphan_holds_exclude_vehicles_with_any_reservation() {
    let Some((_, repo)) = test_database().await else { return };

    let orphan = add_vehicle(&repo, "Seat").await;
    repo.set_vehicle_status(orphan.id, VehicleStatus::Reserved, None)
        .await
        .unwrap();

    let sold = add_vehicle(&repo, "Seat").await;
    let reservation = repo.create_reservation(&reservation_for(sold.id), None).await.unwrap();
    repo.set_reservation_status(
        reservation.id,
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        None,
    )
    .await
    .unwrap()
    .unwrap();
    repo.set_vehicle_status(sold.id, VehicleStatus::Reserved, None)
        .await
        .unwrap();
    repo.set_reservation_status(
        reservation.id,
        ReservationStatus::Confirmed,
        ReservationStatus::Completed,
        None,
    )
    .await
    .unwrap()
    .unwrap();

    let orphans: Vec<Uuid> = repo
        .reserved_vehicles_without_reservation()
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.id)
        .collect();
    assert!(orphans.contains(&orphan.id));
    assert!(!orphans.contains(&sold.id));
}

#[tokio::test]
async fn test_status_write_is_conditional_on_current_status() {
    let Some((_, repo)) = test_database().await else { return };
    let vehicle = add_vehicle(&repo, "Seat").await;
    let reservation = repo.create_reservation(&reservation_for(vehicle.id), None).await.unwrap();

    repo.set_reservation_status(
        reservation.id,
        ReservationStatus::Pending,
        ReservationStatus::Cancelled,
        None,
    )
    .await
    .unwrap()
    .unwrap();

    let stale = repo
        .set_reservation_status(
            reservation.id,
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            None,
        )
        .await
        .unwrap();
    assert!(stale.is_none());

    let current = repo.find_reservation(reservation.id).await.unwrap().unwrap();
    assert_eq!(current.status, ReservationStatus::Cancelled);
}

#[tokio::test]
async fn test_brand_filter_is_literal() {
    let Some((_, repo)) = test_database().await else { return };
    let brand = format!("Marca-{}", Uuid::new_v4().simple());
    let vehicle = add_vehicle(&repo, &brand).await;

    let by_brand = |brand: String| VehicleFilters {
        brand: Some(brand),
        limit: Some(100),
        ..Default::default()
    };

    let exact = repo.list_vehicles(&by_brand(brand.to_uppercase())).await.unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].id, vehicle.id);

    let wildcard = repo.list_vehicles(&by_brand("%".to_string())).await.unwrap();
    assert!(wildcard.iter().all(|v| v.id != vehicle.id));
}
