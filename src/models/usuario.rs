// src/models/usuario.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Fila sembrada en tipos_usuario por la migración inicial
pub const TIPO_ESTUDIANTE: i64 = 2;

/// Cuenta de acceso de una persona.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct Usuario {
    pub id: i64,
    pub usuario: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub persona_id: i64,
    pub tipo_usuario_id: i64,
    pub verificado: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsuarioInput {
    pub usuario: String,
    pub password: String,
    pub persona_id: i64,
    pub tipo_usuario_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub usuario: String,
    pub password: String,
}
