// src/web/catalogo_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::catalogo::{Ciudad, CiudadInput, Institucion, InstitucionInput},
    services::catalogo_service,
    state::AppState,
    web::respuesta::{self, Respuesta},
};
use axum::extract::{Json, Path, State};

// --- Instituciones ---

pub async fn create_institucion(
    State(state): State<AppState>,
    Json(input): Json<InstitucionInput>,
) -> AppResult<Respuesta<Institucion>> {
    if input.nombre.trim().is_empty() {
        return Err(AppError::validation("nombre", "El nombre es obligatorio"));
    }
    let institucion = catalogo_service::create_institucion(&state.db_pool, &input).await?;
    Ok(respuesta::creado(institucion))
}

pub async fn list_instituciones(
    State(state): State<AppState>,
) -> AppResult<Respuesta<Vec<Institucion>>> {
    Ok(respuesta::ok(
        catalogo_service::list_instituciones(&state.db_pool).await?,
    ))
}

pub async fn get_institucion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Respuesta<Institucion>> {
    let institucion = catalogo_service::get_institucion(&state.db_pool, id)
        .await?
        .ok_or(AppError::NotFound("institución"))?;
    Ok(respuesta::ok(institucion))
}

// --- Ciudades ---

pub async fn create_ciudad(
    State(state): State<AppState>,
    Json(input): Json<CiudadInput>,
) -> AppResult<Respuesta<Ciudad>> {
    if input.nombre.trim().is_empty() {
        return Err(AppError::validation("nombre", "El nombre es obligatorio"));
    }
    let ciudad = catalogo_service::create_ciudad(&state.db_pool, &input).await?;
    Ok(respuesta::creado(ciudad))
}

pub async fn list_ciudades(State(state): State<AppState>) -> AppResult<Respuesta<Vec<Ciudad>>> {
    Ok(respuesta::ok(catalogo_service::list_ciudades(&state.db_pool).await?))
}

pub async fn get_ciudad(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Respuesta<Ciudad>> {
    let ciudad = catalogo_service::get_ciudad(&state.db_pool, id)
        .await?
        .ok_or(AppError::NotFound("ciudad"))?;
    Ok(respuesta::ok(ciudad))
}
