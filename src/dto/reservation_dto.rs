use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::reservation::{Reservation, ReservationStatus, ReservationWithVehicle};
use crate::models::vehicle::Vehicle;
use crate::utils::validation::{validate_not_blank, validate_time_shape, PHONE_REGEX};

// Request público para crear una reserva
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReservationRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub customer_name: String,

    #[validate(email, length(max = 255))]
    pub customer_email: String,

    #[validate(regex = "PHONE_REGEX")]
    pub customer_phone: String,

    #[validate(length(max = 1000))]
    pub message: Option<String>,

    pub preferred_date: Option<NaiveDate>,

    #[validate(custom = "validate_time_shape")]
    pub preferred_time: Option<String>,
}

// Request de administración para cambiar el estado
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReservationStatusRequest {
    pub status: ReservationStatus,
}

// Response de un cambio de estado: reserva y vehículo tras la cascada
#[derive(Debug, Serialize)]
pub struct ReservationStatusResponse {
    pub reservation: Reservation,
    pub vehicle: Option<Vehicle>,
}

/// Fila del listado de administración.
///
/// `synthetic` marca filas fabricadas a partir de un vehículo `reserved`
/// que no tiene ninguna reserva activa asociada.
#[derive(Debug, Serialize)]
pub struct ReservationListItem {
    #[serde(flatten)]
    pub details: ReservationWithVehicle,
    pub synthetic: bool,
}

impl From<ReservationWithVehicle> for ReservationListItem {
    fn from(details: ReservationWithVehicle) -> Self {
        Self {
            details,
            synthetic: false,
        }
    }
}

impl ReservationListItem {
    pub fn synthetic_from_vehicle(vehicle: Vehicle) -> Self {
        let reservation = Reservation {
            id: vehicle.id,
            vehicle_id: Some(vehicle.id),
            user_id: None,
            customer_name: String::new(),
            customer_email: String::new(),
            customer_phone: String::new(),
            message: Some("Vehículo reservado sin registro de reserva".to_string()),
            preferred_date: None,
            preferred_time: None,
            status: ReservationStatus::Confirmed,
            reservation_end_time: vehicle.reservation_end_time,
            created_at: vehicle.updated_at,
            updated_at: vehicle.updated_at,
        };

        Self {
            details: ReservationWithVehicle {
                reservation,
                vehicle_brand: Some(vehicle.brand),
                vehicle_model: Some(vehicle.model),
                vehicle_year: Some(vehicle.year),
            },
            synthetic: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> serde_json::Value {
        json!({
            "vehicle_id": Uuid::new_v4(),
            "customer_name": "Lucía Pérez",
            "customer_email": "lucia@example.com",
            "customer_phone": "+34 600 111 222",
            "preferred_date": "2025-06-01",
            "preferred_time": "14:30"
        })
    }

    #[test]
    fn test_create_request_valid() {
        let request: CreateReservationRequest = serde_json::from_value(valid_body()).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.preferred_date, NaiveDate::from_ymd_opt(2025, 6, 1));
    }

    #[test]
    fn test_create_request_invalid_fields() {
        let mut body = valid_body();
        body["customer_email"] = json!("not-an-email");
        body["customer_phone"] = json!("x");
        body["preferred_time"] = json!("after lunch");

        let request: CreateReservationRequest = serde_json::from_value(body).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("customer_email"));
        assert!(fields.contains_key("customer_phone"));
        assert!(fields.contains_key("preferred_time"));
    }

    #[test]
    fn test_malformed_date_is_a_parse_error() {
        let mut body = valid_body();
        body["preferred_date"] = json!("01/06/2025");
        assert!(serde_json::from_value::<CreateReservationRequest>(body).is_err());
    }

    #[test]
    fn test_status_request_rejects_unknown_value() {
        assert!(serde_json::from_value::<UpdateReservationStatusRequest>(json!({
            "status": "archived"
        }))
        .is_err());
    }
}
