//! Middleware del sistema
//!
//! Este módulo contiene la autenticación JWT (extractores), la
//! configuración de CORS y el detalle de errores internos.

pub mod auth;
pub mod cors;
pub mod error_details;

pub use auth::{AdminUser, MaybeUser};
pub use cors::cors_layer;
pub use error_details::expose_error_details;
