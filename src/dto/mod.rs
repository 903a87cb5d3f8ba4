pub mod api_response;
pub mod auth_dto;
pub mod schedule_dto;
