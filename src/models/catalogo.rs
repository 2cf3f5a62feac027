// src/models/catalogo.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct Institucion {
    pub id: i64,
    pub nombre: String,
    pub autoridad: String,
    pub contacto: String,
    pub correo: String,
    pub direccion: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstitucionInput {
    pub nombre: String,
    #[serde(default)]
    pub autoridad: String,
    #[serde(default)]
    pub contacto: String,
    #[serde(default)]
    pub correo: String,
    #[serde(default)]
    pub direccion: String,
}

#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct Ciudad {
    pub id: i64,
    pub nombre: String,
    pub provincia: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CiudadInput {
    pub nombre: String,
    #[serde(default)]
    pub provincia: String,
}
