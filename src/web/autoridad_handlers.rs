// src/web/autoridad_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::autoridad::{AutoridadInput, AutoridadUteq},
    services::{autoridad_service, lifecycle},
    state::AppState,
    web::respuesta::{self, Respuesta},
};
use axum::extract::{Json, Path, State};

fn validar(input: &AutoridadInput) -> AppResult {
    if input.datos.cargo.trim().is_empty() {
        return Err(AppError::validation("cargo", "El cargo es obligatorio"));
    }
    Ok(())
}

// POST /autoridades-uteq
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<AutoridadInput>,
) -> AppResult<Respuesta<AutoridadUteq>> {
    validar(&input)?;
    let autoridad =
        lifecycle::create::<AutoridadUteq>(&state.db_pool, input.persona_id, &input.datos).await?;
    Ok(respuesta::creado(autoridad).con_mensaje("Autoridad creada"))
}

// PUT /autoridades-uteq/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<AutoridadInput>,
) -> AppResult<Respuesta<AutoridadUteq>> {
    validar(&input)?;
    let autoridad =
        lifecycle::update::<AutoridadUteq>(&state.db_pool, id, input.persona_id, &input.datos)
            .await?;
    Ok(respuesta::ok(autoridad).con_mensaje("Autoridad actualizada"))
}

// GET /autoridades-uteq/cargo/{texto}
pub async fn search_by_cargo(
    State(state): State<AppState>,
    Path(texto): Path<String>,
) -> AppResult<Respuesta<Vec<AutoridadUteq>>> {
    let autoridades = autoridad_service::search_by_cargo(&state.db_pool, &texto).await?;
    Ok(respuesta::ok(autoridades))
}

// GET /autoridades-uteq/persona/{persona_id}
pub async fn get_by_persona(
    State(state): State<AppState>,
    Path(persona_id): Path<i64>,
) -> AppResult<Respuesta<AutoridadUteq>> {
    let autoridad = autoridad_service::get_by_persona(&state.db_pool, persona_id)
        .await?
        .ok_or(AppError::NotFound("autoridad"))?;
    Ok(respuesta::ok(autoridad))
}
