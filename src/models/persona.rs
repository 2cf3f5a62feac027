// src/models/persona.rs
use crate::error::FieldError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Identidad canónica: todas las cuentas y roles cuelgan de una persona.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct Persona {
    pub id: i64,
    pub nombre: String,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub cedula: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// Cuerpo JSON para crear o actualizar una persona
#[derive(Debug, Clone, Deserialize)]
pub struct PersonaInput {
    pub nombre: String,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub cedula: String,
}

impl PersonaInput {
    pub fn validar(&self) -> Vec<FieldError> {
        let mut errores = Vec::new();
        if self.nombre.trim().is_empty() {
            errores.push(FieldError::new("nombre", "El nombre es obligatorio"));
        }
        if !es_cedula_valida(&self.cedula) {
            errores.push(FieldError::new(
                "cedula",
                "La cédula debe tener exactamente 10 dígitos",
            ));
        }
        if let Some(correo) = self.correo_normalizado() {
            if !correo.contains('@') {
                errores.push(FieldError::new("correo", "El correo no tiene un formato válido"));
            }
        }
        errores
    }

    /// Correo vacío se guarda como NULL para no chocar con el índice único.
    pub fn correo_normalizado(&self) -> Option<&str> {
        self.correo
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

pub fn es_cedula_valida(cedula: &str) -> bool {
    cedula.len() == 10 && cedula.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(cedula: &str, correo: Option<&str>) -> PersonaInput {
        PersonaInput {
            nombre: "Ana".into(),
            fecha_nacimiento: None,
            correo: correo.map(String::from),
            telefono: None,
            cedula: cedula.into(),
        }
    }

    #[test]
    fn cedula_requiere_diez_digitos() {
        assert!(es_cedula_valida("0102030405"));
        assert!(!es_cedula_valida("010203040"));
        assert!(!es_cedula_valida("01020304a5"));
    }

    #[test]
    fn validar_reporta_cada_campo() {
        let errores = input("123", Some("sin-arroba")).validar();
        let campos: Vec<_> = errores.iter().map(|e| e.field).collect();
        assert_eq!(campos, vec!["cedula", "correo"]);
    }

    #[test]
    fn correo_en_blanco_se_trata_como_ausente() {
        assert_eq!(input("0102030405", Some("  ")).correo_normalizado(), None);
        assert!(input("0102030405", Some("")).validar().is_empty());
        assert!(input("0102030405", Some("  ")).validar().is_empty());
        assert_eq!(
            input("0102030405", Some("ana@uteq.edu.ec")).correo_normalizado(),
            Some("ana@uteq.edu.ec")
        );
    }
}
