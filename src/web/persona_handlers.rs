// src/web/persona_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::persona::{Persona, PersonaInput},
    services::persona_service,
    state::AppState,
    web::respuesta::{self, Respuesta},
};
use axum::extract::{Json, Path, State};

fn validar(input: &PersonaInput) -> AppResult {
    let errores = input.validar();
    if errores.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errores))
    }
}

// POST /personas
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<PersonaInput>,
) -> AppResult<Respuesta<Persona>> {
    validar(&input)?;
    let persona = persona_service::create(&state.db_pool, &input).await?;
    Ok(respuesta::creado(persona).con_mensaje("Persona creada"))
}

// GET /personas
pub async fn list(State(state): State<AppState>) -> AppResult<Respuesta<Vec<Persona>>> {
    Ok(respuesta::ok(persona_service::list(&state.db_pool).await?))
}

// GET /personas/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Respuesta<Persona>> {
    let persona = persona_service::get(&state.db_pool, id)
        .await?
        .ok_or(AppError::NotFound("persona"))?;
    Ok(respuesta::ok(persona))
}

// GET /personas/cedula/{cedula}
pub async fn get_by_cedula(
    State(state): State<AppState>,
    Path(cedula): Path<String>,
) -> AppResult<Respuesta<Persona>> {
    let persona = persona_service::get_by_cedula(&state.db_pool, &cedula)
        .await?
        .ok_or(AppError::NotFound("persona"))?;
    Ok(respuesta::ok(persona))
}

// PUT /personas/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<PersonaInput>,
) -> AppResult<Respuesta<Persona>> {
    validar(&input)?;
    let persona = persona_service::update(&state.db_pool, id, &input).await?;
    Ok(respuesta::ok(persona).con_mensaje("Persona actualizada"))
}

// PUT /personas/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Respuesta<Persona>> {
    let persona = persona_service::find_including_deleted(&state.db_pool, id)
        .await?
        .ok_or(AppError::NotFound("persona"))?;
    if persona.deleted_at.is_none() {
        return Err(AppError::Conflict {
            code: "no_eliminado",
            message: "La persona no está eliminada".to_string(),
        });
    }

    let persona = persona_service::restore(&state.db_pool, id).await?;
    Ok(respuesta::ok(persona).con_mensaje("Persona restaurada"))
}
