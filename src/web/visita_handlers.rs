// src/web/visita_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::visita::{AsignacionAutoridad, AsignacionInput, ProgramaVisita, ProgramaVisitaInput},
    services::visita_service,
    state::AppState,
    web::respuesta::{self, Respuesta},
};
use axum::extract::{Json, Path, State};

// POST /programas-visita
pub async fn create_programa(
    State(state): State<AppState>,
    Json(input): Json<ProgramaVisitaInput>,
) -> AppResult<Respuesta<ProgramaVisita>> {
    let programa = visita_service::create_programa(&state.db_pool, &input).await?;
    Ok(respuesta::creado(programa).con_mensaje("Programa de visita creado"))
}

// GET /programas-visita
pub async fn list_programas(
    State(state): State<AppState>,
) -> AppResult<Respuesta<Vec<ProgramaVisita>>> {
    Ok(respuesta::ok(visita_service::list_programas(&state.db_pool).await?))
}

// GET /programas-visita/{id}
pub async fn get_programa(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Respuesta<ProgramaVisita>> {
    let programa = visita_service::get_programa(&state.db_pool, id)
        .await?
        .ok_or(AppError::NotFound("programa de visita"))?;
    Ok(respuesta::ok(programa))
}

// POST /programas-visita/asignaciones
pub async fn asignar_autoridad(
    State(state): State<AppState>,
    Json(input): Json<AsignacionInput>,
) -> AppResult<Respuesta<AsignacionAutoridad>> {
    let asignacion = visita_service::asignar_autoridad(&state.db_pool, &input).await?;
    Ok(respuesta::creado(asignacion).con_mensaje("Autoridad asignada al programa"))
}

// DELETE /programas-visita/asignaciones/{id}
pub async fn quitar_asignacion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Respuesta<()>> {
    visita_service::quitar_asignacion(&state.db_pool, id).await?;
    Ok(respuesta::mensaje("Asignación eliminada"))
}

// GET /programas-visita/{id}/autoridades
pub async fn list_by_programa(
    State(state): State<AppState>,
    Path(programa_id): Path<i64>,
) -> AppResult<Respuesta<Vec<AsignacionAutoridad>>> {
    let asignaciones = visita_service::list_by_programa(&state.db_pool, programa_id).await?;
    Ok(respuesta::ok(asignaciones))
}

// GET /programas-visita/autoridad/{id}
pub async fn list_by_autoridad(
    State(state): State<AppState>,
    Path(autoridad_id): Path<i64>,
) -> AppResult<Respuesta<Vec<AsignacionAutoridad>>> {
    let asignaciones = visita_service::list_by_autoridad(&state.db_pool, autoridad_id).await?;
    Ok(respuesta::ok(asignaciones))
}
