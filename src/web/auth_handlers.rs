// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::usuario::LoginRequest,
    services::{auth_service, persona_service, usuario_service},
    state::AppState,
    web::{
        mw_auth::{UsuarioId, SESSION_USUARIO_ID},
        respuesta::{self, Respuesta},
    },
};
use axum::{
    extract::{Extension, Json, State},
    response::IntoResponse,
};
use serde_json::json;
use tower_sessions::Session;

// POST /auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Json(login): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("Intento de login para: {}", login.usuario);

    let cuenta = auth_service::authenticate(&state.db_pool, &login.usuario, &login.password).await?;

    // Nuevo id de sesión al autenticar
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Fallo al rotar el id: {}", e)))?;
    session
        .insert(SESSION_USUARIO_ID, cuenta.id)
        .await
        .map_err(|e| AppError::SessionError(format!("Fallo al escribir la sesión: {}", e)))?;

    tracing::info!("✅ Login correcto para: {}", cuenta.usuario);
    Ok(respuesta::ok(cuenta).con_mensaje("Sesión iniciada"))
}

// POST /auth/logout
pub async fn handle_logout(
    session: Session,
    Extension(UsuarioId(usuario_id)): Extension<UsuarioId>,
) -> AppResult<Respuesta<()>> {
    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Fallo al borrar la sesión: {}", e)))?;

    tracing::info!("🚪 Usuario {} desconectado.", usuario_id);
    Ok(respuesta::mensaje("Sesión cerrada"))
}

// GET /auth/profile
pub async fn handle_profile(
    State(state): State<AppState>,
    session: Session,
    Extension(UsuarioId(usuario_id)): Extension<UsuarioId>,
) -> AppResult<impl IntoResponse> {
    let Some(cuenta) = usuario_service::find_active_by_id(&state.db_pool, usuario_id).await? else {
        // La cuenta se eliminó mientras la sesión seguía viva
        tracing::warn!("Sesión con usuario {} ya inactivo; se cierra.", usuario_id);
        session
            .flush()
            .await
            .map_err(|e| AppError::SessionError(format!("Fallo al vaciar la sesión: {}", e)))?;
        return Err(AppError::Unauthorized);
    };

    let persona = persona_service::get(&state.db_pool, cuenta.persona_id).await?;
    Ok(respuesta::ok(json!({ "usuario": cuenta, "persona": persona })))
}
