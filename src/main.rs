use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use dealership_backend::config::{DatabaseConfig, EnvironmentConfig};
use dealership_backend::database::connect_and_migrate;
use dealership_backend::repositories::PostgresRepository;
use dealership_backend::routes::create_router;
use dealership_backend::services::ExpirySweeper;
use dealership_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚗 Dealership Backend - Vehículos y reservas");
    info!("============================================");
    info!("🌍 Entorno: {}", config.environment);

    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS_ORIGINS vacío en producción: se aceptan todos los orígenes");
    }

    // Inicializar base de datos
    let db_config = DatabaseConfig::from_env()?;
    let pool = match connect_and_migrate(&db_config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };

    let repository = Arc::new(PostgresRepository::new(pool));
    let app_state = AppState::new(repository.clone(), config.clone());

    // Barrido periódico de holds vencidos
    let sweeper = ExpirySweeper::new(repository, config.sweep_interval).start();
    info!(
        "⏰ Barrido de reservas vencidas cada {}s",
        config.sweep_interval.as_secs()
    );

    let app = create_router(app_state);
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Vehículos:");
    info!("   GET  /api/vehicles - Listar vehículos (filtros)");
    info!("   GET  /api/vehicles/:id - Obtener vehículo");
    info!("   POST /api/vehicles - Crear vehículo (admin)");
    info!("   PUT  /api/vehicles/:id - Actualizar vehículo (admin)");
    info!("   DELETE /api/vehicles/:id - Eliminar vehículo (admin)");
    info!("   POST /api/vehicles/check-expired-reservations - Barrido manual (admin)");
    info!("📅 Reservas:");
    info!("   POST /api/reservations - Crear reserva");
    info!("   GET  /api/reservations - Listar reservas (admin)");
    info!("   GET  /api/reservations/mine - Mis reservas");
    info!("   GET  /api/reservations/:id - Obtener reserva (admin)");
    info!("   PUT  /api/reservations/:id/status - Cambiar estado (admin)");
    info!("   DELETE /api/reservations/:id - Eliminar reserva (admin)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    sweeper.shutdown().await;
    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("⚠️ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("⚠️ No se pudo instalar el handler de SIGTERM: {}", e);
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
