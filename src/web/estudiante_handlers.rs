// src/web/estudiante_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::estudiante::{CargaMasivaRequest, Estudiante, EstudianteInput, ResultadoCargaMasiva},
    services::estudiante_service,
    state::AppState,
    web::respuesta::{self, Respuesta},
};
use axum::extract::{Json, Path, State};

// POST /estudiantes
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<EstudianteInput>,
) -> AppResult<Respuesta<Estudiante>> {
    let estudiante = estudiante_service::create(&state.db_pool, &input).await?;
    Ok(respuesta::creado(estudiante).con_mensaje("Estudiante creado"))
}

// PUT /estudiantes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<EstudianteInput>,
) -> AppResult<Respuesta<Estudiante>> {
    let estudiante = estudiante_service::update(&state.db_pool, id, &input).await?;
    Ok(respuesta::ok(estudiante).con_mensaje("Estudiante actualizado"))
}

// POST /estudiantes/bulk
pub async fn bulk_create(
    State(state): State<AppState>,
    Json(request): Json<CargaMasivaRequest>,
) -> AppResult<Respuesta<ResultadoCargaMasiva>> {
    if request.estudiantes.is_empty() {
        return Err(AppError::validation(
            "estudiantes",
            "La lista de estudiantes está vacía",
        ));
    }

    let resultado = estudiante_service::bulk_create(&state.db_pool, &request.estudiantes).await?;
    let message = format!(
        "Carga masiva: {} creados, {} fallidos",
        resultado.total_exitosos, resultado.total_fallidos
    );
    Ok(respuesta::ok(resultado).con_mensaje(message))
}

// GET /estudiantes/ciudad/{id}
pub async fn list_by_ciudad(
    State(state): State<AppState>,
    Path(ciudad_id): Path<i64>,
) -> AppResult<Respuesta<Vec<Estudiante>>> {
    let estudiantes = estudiante_service::list_by_ciudad(&state.db_pool, ciudad_id).await?;
    Ok(respuesta::ok(estudiantes))
}

// GET /estudiantes/institucion/{id}
pub async fn list_by_institucion(
    State(state): State<AppState>,
    Path(institucion_id): Path<i64>,
) -> AppResult<Respuesta<Vec<Estudiante>>> {
    let estudiantes =
        estudiante_service::list_by_institucion(&state.db_pool, institucion_id).await?;
    Ok(respuesta::ok(estudiantes))
}

// GET /estudiantes/especialidad/{texto}
pub async fn search_by_especialidad(
    State(state): State<AppState>,
    Path(texto): Path<String>,
) -> AppResult<Respuesta<Vec<Estudiante>>> {
    let estudiantes = estudiante_service::search_by_especialidad(&state.db_pool, &texto).await?;
    Ok(respuesta::ok(estudiantes))
}
