// src/models/visita.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Visita programada a una institución.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct ProgramaVisita {
    pub id: i64,
    pub fecha: DateTime<Utc>,
    pub fecha_fin: Option<DateTime<Utc>>,
    pub institucion_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramaVisitaInput {
    pub fecha: DateTime<Utc>,
    pub fecha_fin: Option<DateTime<Utc>>,
    pub institucion_id: i64,
}

// Autoridad asignada a un programa de visita
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct AsignacionAutoridad {
    pub id: i64,
    pub programa_visita_id: i64,
    pub autoridad_uteq_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AsignacionInput {
    pub programa_visita_id: i64,
    pub autoridad_uteq_id: i64,
}
