// src/services/uniqueness.rs
//! Detección y clasificación de violaciones de unicidad.
//!
//! Dos caminos: un conteo previo sobre filas activas (`pre_check`) y la
//! reclasificación del error de la escritura cuando el conteo pierde la
//! carrera contra otra petición (`classify`).

use crate::error::{AppError, AppResult};
use serde::Serialize;
use sqlx::SqliteConnection;

/// Tipo de conflicto que ve el cliente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DuplicateKind {
    NationalId,
    Email,
    Username,
    RoleAssignment,
    Generic,
}

impl DuplicateKind {
    pub fn code(self) -> &'static str {
        match self {
            DuplicateKind::NationalId => "cedula_duplicada",
            DuplicateKind::Email => "correo_duplicado",
            DuplicateKind::Username => "usuario_duplicado",
            DuplicateKind::RoleAssignment => "rol_duplicado",
            DuplicateKind::Generic => "registro_duplicado",
        }
    }

    pub fn field(self) -> Option<&'static str> {
        match self {
            DuplicateKind::NationalId => Some("cedula"),
            DuplicateKind::Email => Some("correo"),
            DuplicateKind::Username => Some("usuario"),
            DuplicateKind::RoleAssignment => Some("persona_id"),
            DuplicateKind::Generic => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DuplicateKind::NationalId => "Ya existe una persona con esta cédula",
            DuplicateKind::Email => "Ya existe una persona con este correo",
            DuplicateKind::Username => "El nombre de usuario ya está en uso",
            DuplicateKind::RoleAssignment => "Esta persona ya tiene asignado este rol",
            DuplicateKind::Generic => "Ya existe un registro con estos datos",
        }
    }
}

/// Entidad cuya escritura falló; acota qué columnas se buscan en el error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Persona,
    Usuario,
    Estudiante,
    Autoridad,
}

impl EntityKind {
    fn hints(self) -> &'static [(&'static str, DuplicateKind)] {
        match self {
            EntityKind::Persona => &[
                ("cedula", DuplicateKind::NationalId),
                ("correo", DuplicateKind::Email),
            ],
            EntityKind::Usuario => &[("usuario", DuplicateKind::Username)],
            EntityKind::Estudiante | EntityKind::Autoridad => {
                &[("persona_id", DuplicateKind::RoleAssignment)]
            }
        }
    }
}

// SQLITE_CONSTRAINT_UNIQUE y SQLITE_CONSTRAINT_PRIMARYKEY.
// El código base 19 no sirve: también lo usan FK y NOT NULL.
const UNIQUE_CODES: &[&str] = &["2067", "1555"];
const UNIQUE_MARKERS: &[&str] = &["unique constraint", "duplicate key value"];

/// Clasifica un error de escritura. `None` si no es una violación de unicidad.
///
/// Función pura: sólo inspecciona el error.
pub fn classify(err: &sqlx::Error, entity: EntityKind) -> Option<DuplicateKind> {
    let db_err = err.as_database_error()?;

    let message = db_err.message().to_lowercase();
    let is_unique = db_err.is_unique_violation()
        || db_err
            .code()
            .is_some_and(|code| UNIQUE_CODES.contains(&&*code))
        || UNIQUE_MARKERS.iter().any(|m| message.contains(m));
    if !is_unique {
        return None;
    }

    // El nombre de la restricción, si el driver lo da, manda sobre el texto
    let source = match db_err.constraint() {
        Some(constraint) => constraint.to_lowercase(),
        None => message,
    };

    let kind = entity
        .hints()
        .iter()
        .find(|(hint, _)| source.contains(hint))
        .map(|(_, kind)| *kind)
        .unwrap_or(DuplicateKind::Generic);
    Some(kind)
}

/// Convierte un error de escritura en `AppError`, clasificando duplicados.
pub fn classify_write(err: sqlx::Error, entity: EntityKind) -> AppError {
    match classify(&err, entity) {
        Some(kind) => {
            tracing::warn!("Escritura de {:?} rechazada por duplicado: {:?}", entity, kind);
            AppError::Duplicate(kind)
        }
        None => AppError::SqlxError(err),
    }
}

/// Predicado de unicidad a comprobar antes de escribir.
///
/// `excluir` deja fuera la propia fila en las actualizaciones.
#[derive(Debug, Clone, Copy)]
pub enum UniqueScope<'a> {
    Cedula {
        cedula: &'a str,
        excluir: Option<i64>,
    },
    Correo {
        correo: &'a str,
        excluir: Option<i64>,
    },
    Usuario {
        usuario: &'a str,
    },
    Rol {
        tabla: &'static str,
        columna: &'static str,
        persona_id: i64,
        excluir: Option<i64>,
    },
}

/// Cuenta filas activas que ya ocupan la clave. Un fallo del conteo se
/// propaga tal cual; nunca se interpreta como duplicado.
pub async fn pre_check(conn: &mut SqliteConnection, scope: UniqueScope<'_>) -> AppResult {
    let (count, kind): (i64, DuplicateKind) = match scope {
        UniqueScope::Cedula { cedula, excluir } => (
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM personas \
                 WHERE cedula = ?1 AND deleted_at IS NULL AND (?2 IS NULL OR id <> ?2)",
            )
            .bind(cedula)
            .bind(excluir)
            .fetch_one(&mut *conn)
            .await?,
            DuplicateKind::NationalId,
        ),
        UniqueScope::Correo { correo, excluir } => (
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM personas \
                 WHERE correo = ?1 AND deleted_at IS NULL AND (?2 IS NULL OR id <> ?2)",
            )
            .bind(correo)
            .bind(excluir)
            .fetch_one(&mut *conn)
            .await?,
            DuplicateKind::Email,
        ),
        UniqueScope::Usuario { usuario } => (
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM usuarios WHERE usuario = ?1 AND deleted_at IS NULL",
            )
            .bind(usuario)
            .fetch_one(&mut *conn)
            .await?,
            DuplicateKind::Username,
        ),
        UniqueScope::Rol {
            tabla,
            columna,
            persona_id,
            excluir,
        } => {
            let sql = format!(
                "SELECT COUNT(*) FROM {tabla} \
                 WHERE {columna} = ?1 AND deleted_at IS NULL AND (?2 IS NULL OR id <> ?2)"
            );
            (
                sqlx::query_scalar(&sql)
                    .bind(persona_id)
                    .bind(excluir)
                    .fetch_one(&mut *conn)
                    .await?,
                DuplicateKind::RoleAssignment,
            )
        }
    };

    if count > 0 {
        tracing::warn!("Comprobación previa de unicidad falló: {:?} ({:?})", scope, kind);
        return Err(AppError::Duplicate(kind));
    }
    Ok(())
}
