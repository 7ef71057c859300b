//! Backend de concesionario: catálogo de vehículos y reservas con
//! bloqueo temporal (hold) y liberación automática.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
