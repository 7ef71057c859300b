//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus enums. Mapea exactamente
//! a la tabla `vehicles` y a los tipos ENUM de PostgreSQL.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Available,
    Reserved,
    Sold,
    Pending,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::Reserved => "reserved",
            VehicleStatus::Sold => "sold",
            VehicleStatus::Pending => "pending",
        }
    }
}

/// Combustible - mapea al ENUM fuel_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "fuel_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    Lpg,
}

/// Caja de cambios - mapea al ENUM transmission_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "transmission_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    Manual,
    Automatic,
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    pub mileage: i32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub color: Option<String>,
    pub description: Option<String>,
    pub status: VehicleStatus,
    pub reservation_end_time: Option<DateTime<Utc>>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Cambiar estado manteniendo el invariante: solo un vehículo
    /// `reserved` puede tener `reservation_end_time`.
    pub fn apply_status(&mut self, status: VehicleStatus, end_time: Option<DateTime<Utc>>) {
        self.status = status;
        self.reservation_end_time = match status {
            VehicleStatus::Reserved => end_time,
            _ => None,
        };
    }

    /// El hold venció y nadie actuó
    pub fn hold_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == VehicleStatus::Reserved
            && self.reservation_end_time.map_or(false, |end| end < now)
    }

    pub fn satisfies_hold_invariant(&self) -> bool {
        self.reservation_end_time.is_none() || self.status == VehicleStatus::Reserved
    }
}
