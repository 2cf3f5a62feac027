// src/models/duda.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Privacidad {
    Privado,
    #[default]
    Publico,
}

/// Pregunta de un estudiante, opcionalmente respondida por una autoridad.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct Duda {
    pub id: i64,
    pub pregunta: String,
    pub fecha_pregunta: DateTime<Utc>,
    pub respuesta: Option<String>,
    pub fecha_respuesta: Option<DateTime<Utc>>,
    pub privacidad: Privacidad,
    pub estudiante_id: i64,
    pub autoridad_uteq_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DudaInput {
    pub estudiante_id: i64,
    pub pregunta: String,
    #[serde(default)]
    pub privacidad: Privacidad,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RespuestaInput {
    pub autoridad_uteq_id: i64,
    pub respuesta: String,
}
