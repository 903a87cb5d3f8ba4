//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool y aplica las migraciones de las tablas de horarios.

use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Conexión compartida a la base de datos
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear un pool de conexiones a la base de datos
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!("🔌 Conectando a PostgreSQL en {}", mask_database_url(&config.url));
        let pool = config.create_pool().await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    /// Ejecutar migraciones de la base de datos
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("✅ Migraciones aplicadas");
        Ok(())
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if url[..at_pos].contains(':') {
            let protocol = &url[..url.find("://").map(|p| p + 3).unwrap_or(0)];
            let host = &url[at_pos + 1..];
            format!("{}***:***@{}", protocol, host)
        } else {
            url.to_string()
        }
    } else {
        url.to_string()
    }
}
