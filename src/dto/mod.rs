pub mod api_response;
pub mod reservation_dto;
pub mod vehicle_dto;
