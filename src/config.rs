// src/config.rs
use crate::error::{AppError, AppResult};
use std::env;

/// Configuración de la aplicación, leída de variables de entorno (y del `.env`).
///
/// - `DATABASE_URL`: URL SQLite (por defecto: `sqlite://escuela.db`)
/// - `DATABASE_MAX_CONNECTIONS`: tamaño máximo del pool (por defecto: 5)
/// - `APP_PORT`: puerto HTTP (por defecto: 3000)
/// - `SESSION_SECRET`: clave para firmar la cookie de sesión (obligatoria, >= 64 bytes)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub port: u16,
    pub session_secret: String,
}

pub const MIN_SESSION_SECRET_LEN: usize = 64;

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://escuela.db".to_string());

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let session_secret = env::var("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AppError::Config(format!(
                "SESSION_SECRET debe tener al menos {} bytes",
                MIN_SESSION_SECRET_LEN
            )));
        }

        Ok(Self {
            database_url,
            max_connections,
            port,
            session_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const SECRET: &str =
        "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn limpiar() {
        for var in [
            "DATABASE_URL",
            "DATABASE_MAX_CONNECTIONS",
            "APP_PORT",
            "SESSION_SECRET",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn usa_valores_por_defecto() {
        limpiar();
        env::set_var("SESSION_SECRET", SECRET);

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.database_url, "sqlite://escuela.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.port, 3000);

        limpiar();
    }

    #[test]
    #[serial]
    fn lee_valores_personalizados() {
        limpiar();
        env::set_var("SESSION_SECRET", SECRET);
        env::set_var("DATABASE_URL", "sqlite::memory:");
        env::set_var("DATABASE_MAX_CONNECTIONS", "12");
        env::set_var("APP_PORT", "8080");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.port, 8080);

        limpiar();
    }

    #[test]
    #[serial]
    fn rechaza_secreto_ausente_o_corto() {
        limpiar();
        assert!(matches!(
            AppConfig::from_env(),
            Err(AppError::EnvVarError(_))
        ));

        env::set_var("SESSION_SECRET", "corto");
        assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));

        limpiar();
    }
}
