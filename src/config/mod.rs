//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos, variables de entorno
//! y los conjuntos de estados de cada clase de vehículo.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::*;
