// src/main.rs

// --- Módulos ---
mod config;
mod db;
mod error;
mod models;
mod services;
mod state;
mod web;

#[cfg(test)]
mod test_support;

// --- Imports ---
use crate::{config::AppConfig, state::AppState};
use axum::serve;
use std::{env, net::SocketAddr};
use time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::Key, ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Logging ---
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            env::var("RUST_LOG")
                .unwrap_or_else(|_| {
                    "escuela_api=debug,tower_http=info,sqlx=warn,tower_sessions=info".into()
                })
                .into()
        }))
        .with(fmt::layer())
        .init();

    tracing::info!("🚀 Iniciando servidor Escuela API...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuración inválida: {}", e);
            return Err(anyhow::anyhow!("Configuración inválida: {}", e));
        }
    };

    // --- Base de datos ---
    let db_pool = match db::create_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("❌ Fallo crítico al inicializar la base de datos: {}", e);
            return Err(anyhow::anyhow!("Fallo al conectar/migrar la DB: {}", e));
        }
    };

    // --- Sesiones ---
    let session_store = SqliteStore::new(db_pool.clone())
        .with_table_name("sessions")
        .map_err(|e| anyhow::anyhow!("Fallo al crear el session store: {}", e))?;
    session_store.migrate().await?;

    let session_store_clone = session_store.clone();
    tokio::spawn(async move {
        if let Err(e) = session_store_clone
            .continuously_delete_expired(tokio::time::Duration::from_secs(60 * 60))
            .await
        {
            tracing::error!("Error en la tarea de limpieza de sesiones: {:?}", e);
        }
    });
    tracing::info!("🧹 Tarea de limpieza de sesiones iniciada.");

    let key = Key::try_from(config.session_secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("SESSION_SECRET no sirve como clave: {}", e))?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)))
        .with_signed(key);
    tracing::info!("🔑 Capa de sesión configurada.");

    let app_state = AppState { db_pool };

    // --- Listener ---
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("📡 Servidor escuchando en http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("❌ No se pudo abrir el puerto {}: {}", config.port, e);
            return Err(e.into());
        }
    };

    // --- Router y middlewares ---
    let app = web::routes::create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(session_layer),
    );
    tracing::info!("✅ Router y middlewares configurados.");

    if let Err(e) = serve(listener, app.into_make_service()).await {
        tracing::error!("❌ Error fatal en el servidor: {}", e);
        return Err(e.into());
    }

    Ok(())
}
