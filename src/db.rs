// src/db.rs
use crate::{config::AppConfig, error::AppResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub async fn create_db_pool(config: &AppConfig) -> AppResult<SqlitePool> {
    tracing::info!("Conectando a la base de datos: {}", config.database_url);

    // Crear el fichero si no existe; las FK se comprueban en cada conexión
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> AppResult {
    tracing::info!("Ejecutando migraciones de la base de datos...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migraciones completadas.");
    Ok(())
}

/// Pool en memoria con el esquema migrado, para los tests.
///
/// Una sola conexión que nunca se recicla: cada conexión `:memory:` es una
/// base de datos distinta.
#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    run_migrations(&pool).await.unwrap();
    pool
}
