// src/web/duda_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::duda::{Duda, DudaInput, RespuestaInput},
    services::duda_service,
    state::AppState,
    web::respuesta::{self, Respuesta},
};
use axum::extract::{Json, Path, State};

// POST /dudas
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<DudaInput>,
) -> AppResult<Respuesta<Duda>> {
    if input.pregunta.trim().is_empty() {
        return Err(AppError::validation("pregunta", "La pregunta es obligatoria"));
    }
    let duda = duda_service::create(&state.db_pool, &input).await?;
    Ok(respuesta::creado(duda).con_mensaje("Duda registrada"))
}

// GET /dudas/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Respuesta<Duda>> {
    let duda = duda_service::get(&state.db_pool, id)
        .await?
        .ok_or(AppError::NotFound("duda"))?;
    Ok(respuesta::ok(duda))
}

// PUT /dudas/{id}/responder
pub async fn answer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<RespuestaInput>,
) -> AppResult<Respuesta<Duda>> {
    if input.respuesta.trim().is_empty() {
        return Err(AppError::validation("respuesta", "La respuesta es obligatoria"));
    }
    let duda = duda_service::answer(&state.db_pool, id, &input).await?;
    Ok(respuesta::ok(duda).con_mensaje("Duda respondida"))
}

// DELETE /dudas/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Respuesta<()>> {
    duda_service::delete(&state.db_pool, id).await?;
    Ok(respuesta::mensaje("Duda eliminada"))
}

// GET /dudas/estudiante/{id}
pub async fn list_by_estudiante(
    State(state): State<AppState>,
    Path(estudiante_id): Path<i64>,
) -> AppResult<Respuesta<Vec<Duda>>> {
    let dudas = duda_service::list_by_estudiante(&state.db_pool, estudiante_id).await?;
    Ok(respuesta::ok(dudas))
}

// GET /dudas/autoridad/{id}
pub async fn list_by_autoridad(
    State(state): State<AppState>,
    Path(autoridad_id): Path<i64>,
) -> AppResult<Respuesta<Vec<Duda>>> {
    let dudas = duda_service::list_by_autoridad(&state.db_pool, autoridad_id).await?;
    Ok(respuesta::ok(dudas))
}

// GET /dudas/sin-responder
pub async fn list_unanswered(State(state): State<AppState>) -> AppResult<Respuesta<Vec<Duda>>> {
    Ok(respuesta::ok(duda_service::list_unanswered(&state.db_pool).await?))
}
