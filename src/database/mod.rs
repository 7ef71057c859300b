//! Módulo de base de datos
//!
//! Maneja la conexión y el schema de PostgreSQL

pub mod connection;

pub use connection::connect_and_migrate;
