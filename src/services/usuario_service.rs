// src/services/usuario_service.rs
use crate::{
    error::{AppError, AppResult},
    models::usuario::{Usuario, UsuarioInput},
    services::{
        auth_service, persona_service,
        uniqueness::{self, EntityKind, UniqueScope},
    },
};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

/// Crea una cuenta para una persona activa. La contraseña se guarda con bcrypt.
pub async fn create(db_pool: &SqlitePool, input: &UsuarioInput) -> AppResult<Usuario> {
    tracing::info!("Creando usuario '{}' para persona {}", input.usuario, input.persona_id);
    // El hash va antes de tomar la conexión: bcrypt tarda
    let password_hash = auth_service::hash_password(&input.password).await?;

    let mut conn = db_pool.acquire().await?;
    create_in(
        &mut conn,
        &input.usuario,
        &password_hash,
        input.persona_id,
        input.tipo_usuario_id,
        Utc::now(),
    )
    .await
}

pub(crate) async fn create_in(
    conn: &mut SqliteConnection,
    usuario: &str,
    password_hash: &str,
    persona_id: i64,
    tipo_usuario_id: i64,
    now: DateTime<Utc>,
) -> AppResult<Usuario> {
    if !persona_service::exists_active(conn, persona_id).await? {
        tracing::warn!("Persona {} no existe o está eliminada", persona_id);
        return Err(AppError::PersonNotFound(persona_id));
    }
    uniqueness::pre_check(conn, UniqueScope::Usuario { usuario }).await?;

    let creado = sqlx::query_as::<_, Usuario>(
        r#"
        INSERT INTO usuarios (usuario, password_hash, persona_id, tipo_usuario_id, verificado, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)
        RETURNING *
        "#,
    )
    .bind(usuario)
    .bind(password_hash)
    .bind(persona_id)
    .bind(tipo_usuario_id)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| uniqueness::classify_write(e, EntityKind::Usuario))?;

    tracing::info!("✅ Usuario '{}' creado con id {}.", creado.usuario, creado.id);
    Ok(creado)
}

pub async fn find_active_by_username(
    db_pool: &SqlitePool,
    usuario: &str,
) -> AppResult<Option<Usuario>> {
    tracing::debug!("Buscando usuario activo '{}'", usuario);
    let encontrado = sqlx::query_as::<_, Usuario>(
        "SELECT * FROM usuarios WHERE usuario = ?1 AND deleted_at IS NULL",
    )
    .bind(usuario)
    .fetch_optional(db_pool)
    .await?;
    Ok(encontrado)
}

pub async fn find_active_by_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Usuario>> {
    let encontrado = sqlx::query_as::<_, Usuario>(
        "SELECT * FROM usuarios WHERE id = ?1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?;
    Ok(encontrado)
}

pub async fn list(db_pool: &SqlitePool) -> AppResult<Vec<Usuario>> {
    let usuarios = sqlx::query_as::<_, Usuario>(
        "SELECT * FROM usuarios WHERE deleted_at IS NULL ORDER BY usuario ASC",
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontrados {} usuarios activos.", usuarios.len());
    Ok(usuarios)
}

/// Cuentas activas de una persona.
pub async fn list_by_persona(db_pool: &SqlitePool, persona_id: i64) -> AppResult<Vec<Usuario>> {
    let usuarios = sqlx::query_as::<_, Usuario>(
        "SELECT * FROM usuarios WHERE persona_id = ?1 AND deleted_at IS NULL ORDER BY id ASC",
    )
    .bind(persona_id)
    .fetch_all(db_pool)
    .await?;
    Ok(usuarios)
}
