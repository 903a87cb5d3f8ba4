use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use dotenvy::dotenv;

use fleet_dashboard::config::{DatabaseConfig, EnvironmentConfig};
use fleet_dashboard::database::DatabaseConnection;
use fleet_dashboard::models::VehicleKind;
use fleet_dashboard::repositories::{
    AccountRepository, MemoryAccountRepository, MemoryTableStore, PgAccountRepository, PgTableStore, TableStore,
};
use fleet_dashboard::routes::create_router;
use fleet_dashboard::services::SystemClock;
use fleet_dashboard::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;

    // Configurar logging
    // Sin colores ANSI en producción: los logs van a un colector
    tracing_subscriber::fmt()
        .with_max_level(log_level(&config.log_level))
        .with_ansi(!config.is_production())
        .init();

    info!("🚚 Fleet Dashboard - horarios y disponibilidad ({})", config.environment);
    info!("================================================");

    let (store, accounts): (Arc<dyn TableStore>, Arc<dyn AccountRepository>) = match &config.database_url {
        Some(url) => {
            let db_connection = DatabaseConnection::new(&DatabaseConfig::new(url.clone()))
                .await
                .context("Error conectando a la base de datos")?;
            db_connection
                .run_migrations()
                .await
                .context("Error aplicando migraciones")?;
            let pool = db_connection.pool();
            info!("✅ PostgreSQL conectado");
            let store: Arc<dyn TableStore> = Arc::new(PgTableStore::new(pool.clone()));
            let accounts: Arc<dyn AccountRepository> = Arc::new(PgAccountRepository::new(pool));
            (store, accounts)
        }
        None => {
            warn!("⚠️ DATABASE_URL no definida: los horarios se guardan en memoria");
            let store: Arc<dyn TableStore> = Arc::new(MemoryTableStore::new());
            let accounts: Arc<dyn AccountRepository> = Arc::new(MemoryAccountRepository::new());
            (store, accounts)
        }
    };

    let bootstrap_admin = config.bootstrap_admin.clone();
    let addr: SocketAddr = config.server_url().parse().context("HOST/PORT inválidos")?;
    let clock = Arc::new(SystemClock::new(config.utc_offset));

    for kind in VehicleKind::ALL {
        let statuses = config.statuses(kind);
        info!(
            "📋 {}: estados [{}], disponible = '{}'",
            kind.display_name(),
            statuses.values().join(", "),
            statuses.available()
        );
    }

    let app_state = AppState::new(store, accounts, config, clock);

    if let Some(admin) = bootstrap_admin {
        app_state
            .auth()
            .register(&admin.username, &admin.password, true)
            .await
            .context("Error creando el operador inicial")?;
        info!("👤 Operador inicial '{}' listo", admin.username);
    }

    let app = create_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("   POST /api/auth/login");
    info!("   GET  /api/auth/me");
    info!("   GET  /api/schedules");
    info!("   GET  /api/schedules/:kind[?vehicles=A,B]");
    info!("   GET  /api/schedules/:kind/available");
    info!("   GET  /api/schedules/:kind/statuses");
    info!("   GET  /api/schedules/:kind/export");
    info!("   POST /api/schedules/:kind/upload[?mode=replace|append]");
    info!("   GET  /api/schedules/:kind/vehicles/:identifier/target");
    info!("   PUT  /api/schedules/:kind/vehicles/:identifier/whereabouts");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

fn log_level(level: &str) -> tracing::Level {
    level.parse().unwrap_or(tracing::Level::INFO)
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
