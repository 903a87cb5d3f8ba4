//! Fleet dashboard
//!
//! Horarios y disponibilidad de las camionetas, volquetes y maquinaria: subida
//! de hojas de cálculo, edición de ubicación/estado y vista del día.

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
