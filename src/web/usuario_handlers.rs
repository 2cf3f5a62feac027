// src/web/usuario_handlers.rs
use crate::{
    error::{AppError, AppResult, FieldError},
    models::usuario::{Usuario, UsuarioInput},
    services::usuario_service,
    state::AppState,
    web::respuesta::{self, Respuesta},
};
use axum::extract::{Json, Path, State};

const MIN_PASSWORD_LEN: usize = 6;

// POST /usuarios
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<UsuarioInput>,
) -> AppResult<Respuesta<Usuario>> {
    let mut errores = Vec::new();
    if input.usuario.trim().is_empty() {
        errores.push(FieldError::new("usuario", "El nombre de usuario es obligatorio"));
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        errores.push(FieldError::new(
            "password",
            format!("La contraseña debe tener al menos {} caracteres", MIN_PASSWORD_LEN),
        ));
    }
    if !errores.is_empty() {
        return Err(AppError::Validation(errores));
    }

    let usuario = usuario_service::create(&state.db_pool, &input).await?;
    Ok(respuesta::creado(usuario).con_mensaje("Usuario creado"))
}

// GET /usuarios
pub async fn list(State(state): State<AppState>) -> AppResult<Respuesta<Vec<Usuario>>> {
    Ok(respuesta::ok(usuario_service::list(&state.db_pool).await?))
}

// GET /usuarios/persona/{persona_id}
pub async fn list_by_persona(
    State(state): State<AppState>,
    Path(persona_id): Path<i64>,
) -> AppResult<Respuesta<Vec<Usuario>>> {
    let usuarios = usuario_service::list_by_persona(&state.db_pool, persona_id).await?;
    Ok(respuesta::ok(usuarios))
}
