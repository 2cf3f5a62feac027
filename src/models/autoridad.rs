// src/models/autoridad.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Autoridad universitaria (UTEQ) que responde dudas.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct AutoridadUteq {
    pub id: i64,
    pub persona_id: i64,
    pub cargo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatosAutoridad {
    #[serde(default)]
    pub cargo: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutoridadInput {
    pub persona_id: i64,
    #[serde(flatten)]
    pub datos: DatosAutoridad,
}
