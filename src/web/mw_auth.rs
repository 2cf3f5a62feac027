// src/web/mw_auth.rs
use crate::error::AppError;
use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

/// Clave de sesión con el id del usuario autenticado.
pub const SESSION_USUARIO_ID: &str = "usuario_id";

// Middleware que exige una sesión con usuario
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match session.get::<i64>(SESSION_USUARIO_ID).await {
        Ok(Some(usuario_id)) => {
            tracing::debug!("Auth MW: usuario {} autenticado.", usuario_id);
            // Los handlers lo leen con Extension<UsuarioId>
            request.extensions_mut().insert(UsuarioId(usuario_id));
            Ok(next.run(request).await)
        }
        Ok(None) => {
            tracing::debug!("Auth MW: petición sin sesión a {}", request.uri().path());
            Err(AppError::Unauthorized)
        }
        Err(e) => {
            tracing::error!("Auth MW: error al leer la sesión: {:?}", e);
            Err(AppError::SessionError(format!("Error al verificar la sesión: {}", e)))
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct UsuarioId(pub i64);
