// src/services/catalogo_service.rs
use crate::{
    error::AppResult,
    models::catalogo::{Ciudad, CiudadInput, Institucion, InstitucionInput},
};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

// --- Instituciones ---

pub async fn create_institucion(
    db_pool: &SqlitePool,
    input: &InstitucionInput,
) -> AppResult<Institucion> {
    tracing::info!("Creando institución '{}'", input.nombre);
    let institucion = sqlx::query_as::<_, Institucion>(
        r#"
        INSERT INTO instituciones (nombre, autoridad, contacto, correo, direccion, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        RETURNING *
        "#,
    )
    .bind(input.nombre.trim())
    .bind(input.autoridad.as_str())
    .bind(input.contacto.as_str())
    .bind(input.correo.as_str())
    .bind(input.direccion.as_str())
    .bind(Utc::now())
    .fetch_one(db_pool)
    .await?;
    Ok(institucion)
}

pub async fn get_institucion(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Institucion>> {
    let institucion = sqlx::query_as::<_, Institucion>(
        "SELECT * FROM instituciones WHERE id = ?1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?;
    Ok(institucion)
}

pub async fn list_instituciones(db_pool: &SqlitePool) -> AppResult<Vec<Institucion>> {
    let instituciones = sqlx::query_as::<_, Institucion>(
        "SELECT * FROM instituciones WHERE deleted_at IS NULL ORDER BY nombre ASC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(instituciones)
}

pub async fn institucion_exists(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM instituciones WHERE id = ?1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}

// --- Ciudades ---

pub async fn create_ciudad(db_pool: &SqlitePool, input: &CiudadInput) -> AppResult<Ciudad> {
    tracing::info!("Creando ciudad '{}'", input.nombre);
    let ciudad = sqlx::query_as::<_, Ciudad>(
        r#"
        INSERT INTO ciudades (nombre, provincia, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?3)
        RETURNING *
        "#,
    )
    .bind(input.nombre.trim())
    .bind(input.provincia.as_str())
    .bind(Utc::now())
    .fetch_one(db_pool)
    .await?;
    Ok(ciudad)
}

pub async fn get_ciudad(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Ciudad>> {
    let ciudad = sqlx::query_as::<_, Ciudad>(
        "SELECT * FROM ciudades WHERE id = ?1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?;
    Ok(ciudad)
}

pub async fn list_ciudades(db_pool: &SqlitePool) -> AppResult<Vec<Ciudad>> {
    let ciudades = sqlx::query_as::<_, Ciudad>(
        "SELECT * FROM ciudades WHERE deleted_at IS NULL ORDER BY nombre ASC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(ciudades)
}

pub async fn ciudad_exists(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM ciudades WHERE id = ?1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}
