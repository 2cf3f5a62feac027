// src/services/visita_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        autoridad::AutoridadUteq,
        visita::{AsignacionAutoridad, AsignacionInput, ProgramaVisita, ProgramaVisitaInput},
    },
    services::{catalogo_service, lifecycle},
};
use chrono::Utc;
use sqlx::SqlitePool;

const ASIGNACION_EXISTENTE: &str = "asignacion_existente";

fn asignacion_existente() -> AppError {
    AppError::Conflict {
        code: ASIGNACION_EXISTENTE,
        message: "La autoridad ya está asignada a este programa de visita".into(),
    }
}

// --- Programas de visita ---

pub async fn create_programa(
    db_pool: &SqlitePool,
    input: &ProgramaVisitaInput,
) -> AppResult<ProgramaVisita> {
    tracing::info!("Creando programa de visita para la institución {}", input.institucion_id);
    if matches!(input.fecha_fin, Some(fin) if fin < input.fecha) {
        return Err(AppError::validation(
            "fecha_fin",
            "La fecha de fin no puede ser anterior a la de inicio",
        ));
    }

    let mut conn = db_pool.acquire().await?;
    if !catalogo_service::institucion_exists(&mut conn, input.institucion_id).await? {
        return Err(AppError::NotFound("institución"));
    }

    let programa = sqlx::query_as::<_, ProgramaVisita>(
        r#"
        INSERT INTO programas_visita (fecha, fecha_fin, institucion_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        RETURNING *
        "#,
    )
    .bind(input.fecha)
    .bind(input.fecha_fin)
    .bind(input.institucion_id)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    tracing::info!("✅ Programa de visita {} creado.", programa.id);
    Ok(programa)
}

pub async fn get_programa(db_pool: &SqlitePool, id: i64) -> AppResult<Option<ProgramaVisita>> {
    let programa = sqlx::query_as::<_, ProgramaVisita>(
        "SELECT * FROM programas_visita WHERE id = ?1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?;
    Ok(programa)
}

pub async fn list_programas(db_pool: &SqlitePool) -> AppResult<Vec<ProgramaVisita>> {
    let programas = sqlx::query_as::<_, ProgramaVisita>(
        "SELECT * FROM programas_visita WHERE deleted_at IS NULL ORDER BY fecha ASC",
    )
    .fetch_all(db_pool)
    .await?;
    Ok(programas)
}

// --- Autoridades asignadas ---

/// Asigna una autoridad activa a un programa activo, una sola vez por par.
pub async fn asignar_autoridad(
    db_pool: &SqlitePool,
    input: &AsignacionInput,
) -> AppResult<AsignacionAutoridad> {
    tracing::info!(
        "Asignando autoridad {} al programa {}",
        input.autoridad_uteq_id,
        input.programa_visita_id
    );
    if get_programa(db_pool, input.programa_visita_id).await?.is_none() {
        return Err(AppError::NotFound("programa de visita"));
    }
    if lifecycle::find_active::<AutoridadUteq>(db_pool, input.autoridad_uteq_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("autoridad"));
    }

    let existentes: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM detalle_autoridad_detalles_visita
        WHERE programa_visita_id = ?1 AND autoridad_uteq_id = ?2 AND deleted_at IS NULL
        "#,
    )
    .bind(input.programa_visita_id)
    .bind(input.autoridad_uteq_id)
    .fetch_one(db_pool)
    .await?;
    if existentes > 0 {
        return Err(asignacion_existente());
    }

    sqlx::query_as::<_, AsignacionAutoridad>(
        r#"
        INSERT INTO detalle_autoridad_detalles_visita
            (programa_visita_id, autoridad_uteq_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?3)
        RETURNING *
        "#,
    )
    .bind(input.programa_visita_id)
    .bind(input.autoridad_uteq_id)
    .bind(Utc::now())
    .fetch_one(db_pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => asignacion_existente(),
        _ => AppError::from(e),
    })
}

pub async fn list_by_programa(
    db_pool: &SqlitePool,
    programa_visita_id: i64,
) -> AppResult<Vec<AsignacionAutoridad>> {
    let asignaciones = sqlx::query_as::<_, AsignacionAutoridad>(
        "SELECT * FROM detalle_autoridad_detalles_visita \
         WHERE programa_visita_id = ?1 AND deleted_at IS NULL ORDER BY id ASC",
    )
    .bind(programa_visita_id)
    .fetch_all(db_pool)
    .await?;
    Ok(asignaciones)
}

pub async fn list_by_autoridad(
    db_pool: &SqlitePool,
    autoridad_id: i64,
) -> AppResult<Vec<AsignacionAutoridad>> {
    let asignaciones = sqlx::query_as::<_, AsignacionAutoridad>(
        "SELECT * FROM detalle_autoridad_detalles_visita \
         WHERE autoridad_uteq_id = ?1 AND deleted_at IS NULL ORDER BY id ASC",
    )
    .bind(autoridad_id)
    .fetch_all(db_pool)
    .await?;
    Ok(asignaciones)
}

pub async fn quitar_asignacion(db_pool: &SqlitePool, id: i64) -> AppResult {
    tracing::info!("Quitando asignación {}", id);
    let afectadas = sqlx::query(
        "UPDATE detalle_autoridad_detalles_visita SET deleted_at = ?1 \
         WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(Utc::now())
    .bind(id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if afectadas == 0 {
        return Err(AppError::NotFound("asignación"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::autoridad::DatosAutoridad;
    use crate::test_support;
    use chrono::Duration;

    #[tokio::test]
    async fn asignar_una_vez_por_programa() {
        let pool = test_support::pool().await;
        let ana = test_support::crear_ana(&pool).await;
        let autoridad = lifecycle::create::<AutoridadUteq>(
            &pool,
            ana.id,
            &DatosAutoridad {
                cargo: "Decana".into(),
            },
        )
        .await
        .unwrap();
        let programa = test_support::crear_programa(&pool).await;

        let input = AsignacionInput {
            programa_visita_id: programa.id,
            autoridad_uteq_id: autoridad.id,
        };
        let asignacion = asignar_autoridad(&pool, &input).await.unwrap();
        assert!(matches!(
            asignar_autoridad(&pool, &input).await,
            Err(AppError::Conflict {
                code: "asignacion_existente",
                ..
            })
        ));
        assert_eq!(list_by_programa(&pool, programa.id).await.unwrap().len(), 1);
        assert_eq!(list_by_autoridad(&pool, autoridad.id).await.unwrap(), vec![asignacion.clone()]);

        // Una vez quitada se puede volver a asignar
        quitar_asignacion(&pool, asignacion.id).await.unwrap();
        assert!(list_by_autoridad(&pool, autoridad.id).await.unwrap().is_empty());
        asignar_autoridad(&pool, &input).await.unwrap();
    }

    #[tokio::test]
    async fn referencias_inexistentes_y_fechas_invertidas() {
        let pool = test_support::pool().await;
        let programa = test_support::crear_programa(&pool).await;

        assert!(matches!(
            asignar_autoridad(
                &pool,
                &AsignacionInput {
                    programa_visita_id: programa.id,
                    autoridad_uteq_id: 99,
                },
            )
            .await,
            Err(AppError::NotFound("autoridad"))
        ));
        assert!(matches!(
            quitar_asignacion(&pool, 99).await,
            Err(AppError::NotFound("asignación"))
        ));

        let fecha = Utc::now();
        let invertido = ProgramaVisitaInput {
            fecha,
            fecha_fin: Some(fecha - Duration::days(1)),
            institucion_id: 1,
        };
        assert!(matches!(
            create_programa(&pool, &invertido).await,
            Err(AppError::Validation(_))
        ));

        let sin_institucion = ProgramaVisitaInput {
            fecha,
            fecha_fin: None,
            institucion_id: 99,
        };
        assert!(matches!(
            create_programa(&pool, &sin_institucion).await,
            Err(AppError::NotFound("institución"))
        ));
    }
}
