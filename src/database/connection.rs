//! Configuración de conexión a PostgreSQL
//!
//! Crea el pool y aplica las migraciones embebidas de `migrations/`.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Crear el pool y dejar el schema al día
pub async fn connect_and_migrate(config: &DatabaseConfig) -> Result<PgPool> {
    info!("🗄️ Conectando a {}", config.describe());
    let pool = config.create_pool().await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("error applying database migrations")?;
    info!("✅ Migraciones aplicadas");

    Ok(pool)
}
