// src/services/auth_service.rs
use crate::{
    error::{AppError, AppResult},
    models::usuario::Usuario,
    services::usuario_service,
};
use sqlx::SqlitePool;

/// Verifica si la contraseña corresponde al hash guardado.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Verificando hash bcrypt...");
        bcrypt::verify(&password, &stored_hash)
    })
    .await
    .map_err(|e| {
        tracing::error!("Error en la tarea spawn_blocking (verify_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Error bcrypt al verificar contraseña: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Genera un hash bcrypt para una contraseña.
pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Generando hash bcrypt...");
        bcrypt::hash(&password, bcrypt::DEFAULT_COST)
    })
    .await
    .map_err(|e| {
        tracing::error!("Error en la tarea spawn_blocking (hash_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Error bcrypt al generar hash: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Valida usuario y contraseña contra las cuentas activas.
///
/// Usuario inexistente y contraseña incorrecta dan el mismo error.
pub async fn authenticate(db_pool: &SqlitePool, usuario: &str, password: &str) -> AppResult<Usuario> {
    let Some(cuenta) = usuario_service::find_active_by_username(db_pool, usuario).await? else {
        tracing::warn!("Usuario no encontrado: {}", usuario);
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &cuenta.password_hash).await? {
        tracing::warn!("Contraseña incorrecta para: {}", usuario);
        return Err(AppError::InvalidCredentials);
    }
    Ok(cuenta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn hash_y_verificacion() {
        let hash = hash_password("clave").await.unwrap();
        assert!(verify_password("clave", &hash).await.unwrap());
        assert!(!verify_password("otra", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn autentica_solo_cuentas_activas() {
        let pool = test_support::pool().await;
        let ana = test_support::crear_ana(&pool).await;
        let cuenta = test_support::crear_cuenta(&pool, ana.id, "ana", "clave").await;

        assert_eq!(authenticate(&pool, "ana", "clave").await.unwrap().id, cuenta.id);
        assert!(matches!(
            authenticate(&pool, "ana", "mala").await,
            Err(AppError::InvalidCredentials)
        ));

        sqlx::query("UPDATE usuarios SET deleted_at = ?1 WHERE id = ?2")
            .bind(chrono::Utc::now())
            .bind(cuenta.id)
            .execute(&pool)
            .await
            .unwrap();
        assert!(matches!(
            authenticate(&pool, "ana", "clave").await,
            Err(AppError::InvalidCredentials)
        ));
    }
}
