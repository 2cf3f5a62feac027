// src/error.rs
use crate::services::uniqueness::DuplicateKind;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Error de validación de un campo concreto de la petición.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Cualquier fallo de persistencia no clasificado (conexión, FK, etc.).
    #[error("Error en la base de datos: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Error de migración de la base de datos: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Error de variable de entorno: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Configuración inválida: {0}")]
    Config(String),

    /// El registro solicitado no existe (o no está en el estado requerido).
    #[error("{0} no encontrado")]
    NotFound(&'static str),

    /// La persona referenciada no existe o está eliminada.
    #[error("Persona {0} no encontrada")]
    PersonNotFound(i64),

    /// Violación de unicidad, ya clasificada.
    #[error("Registro duplicado: {0:?}")]
    Duplicate(DuplicateKind),

    /// Regla de negocio de la capa HTTP (p. ej. borrar con dudas activas).
    #[error("Conflicto ({code}): {message}")]
    Conflict { code: &'static str, message: String },

    #[error("Datos inválidos")]
    Validation(Vec<FieldError>),

    #[error("Error al procesar la contraseña")]
    PasswordHashingError,

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Error en la sesión: {0}")]
    SessionError(String),

    #[error("Error interno inesperado")]
    InternalServerError,

    #[error("No autorizado")]
    Unauthorized,
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    /// Código HTTP, código de error corto y mensaje seguro para el cliente.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "no_encontrado",
                format!("No se encontró el registro de {} solicitado", what),
            ),
            AppError::PersonNotFound(_) => (
                StatusCode::NOT_FOUND,
                "persona_no_existe",
                "No se encontró la persona con el ID especificado".to_string(),
            ),
            AppError::Duplicate(kind) => {
                (StatusCode::CONFLICT, kind.code(), kind.message().to_string())
            }
            AppError::Conflict { code, message } => (StatusCode::CONFLICT, *code, message.clone()),
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Los datos proporcionados no son válidos".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "credenciales_invalidas",
                "Usuario o contraseña inválidos".to_string(),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "no_autorizado",
                "Debe iniciar sesión para acceder a este recurso".to_string(),
            ),
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "error_base_datos",
                "Error interno del servidor".to_string(),
            ),
            AppError::EnvVarError(_) | AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "error_configuracion",
                "Error de configuración".to_string(),
            ),
            AppError::PasswordHashingError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "error_credenciales",
                "Error al procesar credenciales".to_string(),
            ),
            AppError::SessionError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "error_sesion",
                "Error en la gestión de su sesión".to_string(),
            ),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "error_interno",
                "Ocurrió un error inesperado".to_string(),
            ),
        }
    }
}

// Cómo convertir AppError en una respuesta HTTP
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        // El detalle completo sólo va al log del servidor
        if status.is_server_error() {
            tracing::error!("Error procesado: {:?}", self);
        } else {
            tracing::warn!("Petición rechazada ({}): {}", status.as_u16(), self);
        }

        let mut body = json!({
            "success": false,
            "error": code,
            "message": message,
            "status_code": status.as_u16(),
        });
        match &self {
            AppError::Validation(errors) => body["validation"] = json!(errors),
            AppError::Duplicate(kind) => {
                if let Some(field) = kind.field() {
                    body["field"] = json!(field);
                }
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

// Tipo Result estándar de la aplicación
pub type AppResult<T = ()> = Result<T, AppError>;
