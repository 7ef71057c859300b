//! Modelo de Reservation
//!
//! Contiene el struct Reservation, su máquina de estados y el cálculo del
//! fin del hold a partir de `preferred_date` + `preferred_time`.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la reserva - mapea al ENUM reservation_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
        }
    }

    /// Tabla de transiciones. `cancelled` y `completed` son terminales.
    pub fn allowed_transitions(&self) -> &'static [ReservationStatus] {
        use ReservationStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Cancelled, Completed],
            Cancelled | Completed => &[],
        }
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

/// Reservation principal - mapea exactamente a la tabla reservations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub message: Option<String>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
    pub status: ReservationStatus,
    pub reservation_end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Fin del hold si la reserva trae fecha y hora válidas
    pub fn hold_end_time(&self) -> Option<DateTime<Utc>> {
        compute_hold_end_time(self.preferred_date, self.preferred_time.as_deref())
    }
}

/// Reserva con los datos básicos del vehículo (listado de administración)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReservationWithVehicle {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub reservation: Reservation,
    pub vehicle_brand: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_year: Option<i32>,
}

/// Combinar fecha y hora en un instante UTC.
///
/// Cualquier fallo de parseo devuelve `None`: la confirmación sigue adelante
/// sin fecha de expiración.
pub fn compute_hold_end_time(date: Option<NaiveDate>, time: Option<&str>) -> Option<DateTime<Utc>> {
    let date = date?;
    let time = parse_time(time?.trim())?;
    Utc.from_local_datetime(&date.and_time(time)).single()
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    #[test]
    fn test_transition_table() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));

        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Pending));

        for terminal in [Cancelled, Completed] {
            assert!(terminal.is_terminal());
            for next in [Pending, Confirmed, Cancelled, Completed] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_compute_hold_end_time() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1);
        let end = compute_hold_end_time(date, Some("14:30")).unwrap();
        assert_eq!(end.to_rfc3339(), "2025-06-01T14:30:00+00:00");

        let with_seconds = compute_hold_end_time(date, Some("14:30:15")).unwrap();
        assert_eq!(with_seconds.to_rfc3339(), "2025-06-01T14:30:15+00:00");
    }

    #[test]
    fn test_compute_hold_end_time_degrades_to_none() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1);
        assert!(compute_hold_end_time(date, Some("25:99")).is_none());
        assert!(compute_hold_end_time(date, Some("mañana")).is_none());
        assert!(compute_hold_end_time(date, None).is_none());
        assert!(compute_hold_end_time(None, Some("14:30")).is_none());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&Cancelled).unwrap(), "\"cancelled\"");
        assert_eq!(
            serde_json::from_str::<ReservationStatus>("\"completed\"").unwrap(),
            Completed
        );
        assert!(serde_json::from_str::<ReservationStatus>("\"archived\"").is_err());
    }
}
