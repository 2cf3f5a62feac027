// src/models/estudiante.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct Estudiante {
    pub id: i64,
    pub persona_id: i64,
    pub institucion_id: i64,
    pub ciudad_id: i64,
    pub especialidad: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Atributos propios del rol estudiante (todo menos la persona).
#[derive(Debug, Clone, Deserialize)]
pub struct DatosEstudiante {
    pub institucion_id: i64,
    pub ciudad_id: i64,
    #[serde(default)]
    pub especialidad: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EstudianteInput {
    pub persona_id: i64,
    #[serde(flatten)]
    pub datos: DatosEstudiante,
}

// --- Carga masiva ---

/// Una fila de la carga masiva; fecha_nacimiento llega como texto para
/// poder reportar el formato inválido por fila.
#[derive(Debug, Clone, Deserialize)]
pub struct FilaEstudiante {
    pub cedula: String,
    pub nombre: String,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub institucion_id: i64,
    pub ciudad_id: i64,
    pub especialidad: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CargaMasivaRequest {
    pub estudiantes: Vec<FilaEstudiante>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FilaExitosa {
    pub fila: usize,
    pub cedula: String,
    pub usuario: String,
    pub estudiante_id: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FilaFallida {
    pub fila: usize,
    pub cedula: String,
    pub motivo: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ResultadoCargaMasiva {
    pub total: usize,
    pub total_exitosos: usize,
    pub total_fallidos: usize,
    pub exitosos: Vec<FilaExitosa>,
    pub fallidos: Vec<FilaFallida>,
}
