use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::vehicle::{FuelType, Transmission, Vehicle, VehicleStatus};
use crate::utils::validation::validate_not_blank;

/// Mayor valor que cabe en `NUMERIC(12, 2)`
fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("non_negative"));
    }
    if *price > max_price() {
        let mut error = ValidationError::new("max");
        error.add_param("max".into(), &max_price().to_string());
        return Err(error);
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("scale"));
    }
    Ok(())
}

// Request para crear un vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub brand: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: String,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    #[validate(custom = "validate_price")]
    pub price: Decimal,

    #[validate(range(min = 0))]
    pub mileage: i32,

    pub fuel_type: FuelType,
    pub transmission: Transmission,

    #[validate(length(max = 50))]
    pub color: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub status: Option<VehicleStatus>,
    pub featured: Option<bool>,
}

// Request para actualizar un vehículo (parcial)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    #[validate(custom = "validate_price")]
    pub price: Option<Decimal>,

    #[validate(range(min = 0))]
    pub mileage: Option<i32>,

    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,

    #[validate(length(max = 50))]
    pub color: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub status: Option<VehicleStatus>,
    pub featured: Option<bool>,
}

/// Filtros para el listado público
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleFilters {
    pub status: Option<VehicleStatus>,
    pub brand: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub featured: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl VehicleFilters {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    /// Segundos hasta que el hold expire; solo si hay fin programado
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_remaining_secs: Option<i64>,
}

impl VehicleResponse {
    pub fn new(vehicle: Vehicle, now: DateTime<Utc>) -> Self {
        let hold_remaining_secs = match vehicle.status {
            VehicleStatus::Reserved => vehicle
                .reservation_end_time
                .map(|end| (end - now).num_seconds().max(0)),
            _ => None,
        };

        Self {
            vehicle,
            hold_remaining_secs,
        }
    }
}

// Resultado de una pasada del barrido de holds vencidos
#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub released: usize,
    pub vehicle_ids: Vec<Uuid>,
    pub checked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_validation() {
        let request: CreateVehicleRequest = serde_json::from_value(json!({
            "brand": "Toyota",
            "model": "Corolla",
            "year": 2021,
            "price": "18990.00",
            "mileage": 25000,
            "fuel_type": "hybrid",
            "transmission": "automatic"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let mut bad = request.clone();
        bad.year = 1850;
        bad.brand = "  ".to_string();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("year"));
        assert!(fields.contains_key("brand"));
    }

    #[test]
    fn test_negative_price_rejected() {
        let request = UpdateVehicleRequest {
            price: Some(Decimal::new(-100, 0)),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_price_must_fit_numeric_12_2() {
        assert!(validate_price(&Decimal::new(999_999_999_999, 2)).is_ok());
        assert!(validate_price(&Decimal::new(1899000, 2)).is_ok());
        // Ceros a la derecha no cuentan como decimales
        assert!(validate_price(&Decimal::new(1899000, 4)).is_ok());

        let too_big = validate_price(&Decimal::new(100_000_000_000, 0)).unwrap_err();
        assert_eq!(too_big.code, "max");

        let too_precise = validate_price(&Decimal::new(18_999_995, 3)).unwrap_err();
        assert_eq!(too_precise.code, "scale");

        let request = UpdateVehicleRequest {
            price: Some(Decimal::new(100_000_000_000, 0)),
            ..Default::default()
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("price"));
    }

    #[test]
    fn test_unknown_fuel_type_rejected() {
        let parsed = serde_json::from_value::<CreateVehicleRequest>(json!({
            "brand": "Toyota",
            "model": "Corolla",
            "year": 2021,
            "price": "18990.00",
            "mileage": 25000,
            "fuel_type": "steam",
            "transmission": "automatic"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_filters_clamp_limit() {
        let filters = VehicleFilters {
            limit: Some(1000),
            offset: Some(-5),
            ..Default::default()
        };
        assert_eq!(filters.limit(), 100);
        assert_eq!(filters.offset(), 0);
    }
}
