//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el ciclo de
//! vida de las reservas y el barrido periódico de holds vencidos.

pub mod expiry_sweeper;
pub mod reservation_lifecycle;

pub use expiry_sweeper::{ExpirySweeper, SweeperHandle};
pub use reservation_lifecycle::{ReservationLifecycle, StatusChange};
