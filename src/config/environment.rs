//! Configuración de variables de entorno
//!
//! Este módulo lee la configuración del dashboard desde el entorno. Los valores
//! ausentes toman un valor por defecto salvo `JWT_SECRET`, que es obligatorio.

use chrono::FixedOffset;
use std::collections::HashMap;
use std::env;
use thiserror::Error;

use crate::models::status::{StatusSet, StatusSetError};
use crate::models::VehicleKind;

/// Singapur, UTC+8
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 480;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_JWT_EXPIRATION: u64 = 8 * 3600;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("Invalid status set for {kind}: {source}")]
    Statuses {
        kind: VehicleKind,
        #[source]
        source: StatusSetError,
    },
}

/// Cuenta de operador que se crea al arrancar
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub utc_offset: FixedOffset,
    pub max_upload_bytes: usize,
    pub log_level: String,
    pub statuses: HashMap<VehicleKind, StatusSet>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl EnvironmentConfig {
    /// Lee la configuración del entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Lee la configuración con una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let offset_minutes: i32 = parse_or(var("DASHBOARD_UTC_OFFSET_MINUTES"), "DASHBOARD_UTC_OFFSET_MINUTES", DEFAULT_UTC_OFFSET_MINUTES)?;
        let utc_offset = FixedOffset::east_opt(offset_minutes * 60).ok_or(ConfigError::Invalid {
            name: "DASHBOARD_UTC_OFFSET_MINUTES",
            value: offset_minutes.to_string(),
        })?;

        let mut statuses = HashMap::new();
        for kind in VehicleKind::ALL {
            let prefix = kind.slug().to_uppercase();
            let list = var(&format!("{}_STATUSES", prefix));
            let available = var(&format!("{}_AVAILABLE_STATUS", prefix));
            let set = match list {
                Some(list) => StatusSet::parse(&list, available),
                None => StatusSet::new(StatusSet::default().values().to_vec(), available),
            }
            .map_err(|source| ConfigError::Statuses { kind, source })?;
            statuses.insert(kind, set);
        }

        let bootstrap_admin = match (var("BOOTSTRAP_ADMIN_USERNAME"), var("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (Some(_), None) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD")),
            _ => None,
        };

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parse_or(var("PORT"), "PORT", 3000)?,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            database_url: var("DATABASE_URL"),
            jwt_secret,
            jwt_expiration: parse_or(var("JWT_EXPIRATION"), "JWT_EXPIRATION", DEFAULT_JWT_EXPIRATION)?,
            cors_origins: var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            utc_offset,
            max_upload_bytes: parse_or(var("MAX_UPLOAD_BYTES"), "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            statuses,
            bootstrap_admin,
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Conjunto de estados de una clase
    pub fn statuses(&self, kind: VehicleKind) -> StatusSet {
        self.statuses.get(&kind).cloned().unwrap_or_default()
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
