pub mod auth_controller;
pub mod schedule_controller;
