// src/services/autoridad_service.rs
use crate::{
    error::AppResult,
    models::autoridad::{AutoridadUteq, DatosAutoridad},
    services::{
        lifecycle::{Dependiente, RoleEntity, SqliteQuery},
        uniqueness::EntityKind,
    },
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

impl RoleEntity for AutoridadUteq {
    type Datos = DatosAutoridad;

    const TABLA: &'static str = "autoridades_uteq";
    const ETIQUETA: &'static str = "autoridad";
    const ENTIDAD: EntityKind = EntityKind::Autoridad;
    const COLUMNAS: &'static [&'static str] = &["cargo"];
    const DEPENDIENTES: &'static [Dependiente] = &[
        Dependiente {
            tabla: "dudas",
            columna: "autoridad_uteq_id",
        },
        Dependiente {
            tabla: "detalle_autoridad_detalles_visita",
            columna: "autoridad_uteq_id",
        },
    ];

    fn bind_datos<'q>(query: SqliteQuery<'q>, datos: &'q DatosAutoridad) -> SqliteQuery<'q> {
        query.bind(datos.cargo.trim())
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn persona_id(&self) -> i64 {
        self.persona_id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

pub async fn search_by_cargo(db_pool: &SqlitePool, texto: &str) -> AppResult<Vec<AutoridadUteq>> {
    tracing::debug!("Buscando autoridades con cargo '{}'", texto);
    let autoridades = sqlx::query_as::<_, AutoridadUteq>(
        r#"
        SELECT * FROM autoridades_uteq
        WHERE LOWER(cargo) LIKE '%' || LOWER(?1) || '%' AND deleted_at IS NULL
        ORDER BY id ASC
        "#,
    )
    .bind(texto)
    .fetch_all(db_pool)
    .await?;
    Ok(autoridades)
}

pub async fn get_by_persona(
    db_pool: &SqlitePool,
    persona_id: i64,
) -> AppResult<Option<AutoridadUteq>> {
    let autoridad = sqlx::query_as::<_, AutoridadUteq>(
        "SELECT * FROM autoridades_uteq WHERE persona_id = ?1 AND deleted_at IS NULL",
    )
    .bind(persona_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(autoridad)
}
