pub mod reservation_controller;
pub mod vehicle_controller;
