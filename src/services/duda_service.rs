// src/services/duda_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        autoridad::AutoridadUteq,
        duda::{Duda, DudaInput, RespuestaInput},
        estudiante::Estudiante,
    },
    services::lifecycle,
};
use chrono::Utc;
use sqlx::SqlitePool;

/// Registra una duda de un estudiante activo.
pub async fn create(db_pool: &SqlitePool, input: &DudaInput) -> AppResult<Duda> {
    tracing::info!("Registrando duda del estudiante {}", input.estudiante_id);
    if lifecycle::find_active::<Estudiante>(db_pool, input.estudiante_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("estudiante"));
    }

    let now = Utc::now();
    let duda = sqlx::query_as::<_, Duda>(
        r#"
        INSERT INTO dudas (pregunta, fecha_pregunta, privacidad, estudiante_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?2, ?2)
        RETURNING *
        "#,
    )
    .bind(input.pregunta.trim())
    .bind(now)
    .bind(input.privacidad)
    .bind(input.estudiante_id)
    .fetch_one(db_pool)
    .await?;

    tracing::info!("✅ Duda {} registrada.", duda.id);
    Ok(duda)
}

/// Responde una duda activa en nombre de una autoridad activa.
pub async fn answer(db_pool: &SqlitePool, id: i64, input: &RespuestaInput) -> AppResult<Duda> {
    tracing::info!("Autoridad {} responde la duda {}", input.autoridad_uteq_id, id);
    if lifecycle::find_active::<AutoridadUteq>(db_pool, input.autoridad_uteq_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("autoridad"));
    }

    let now = Utc::now();
    sqlx::query_as::<_, Duda>(
        r#"
        UPDATE dudas
        SET respuesta = ?1, fecha_respuesta = ?2, autoridad_uteq_id = ?3, updated_at = ?2
        WHERE id = ?4 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(input.respuesta.trim())
    .bind(now)
    .bind(input.autoridad_uteq_id)
    .bind(id)
    .fetch_optional(db_pool)
    .await?
    .ok_or(AppError::NotFound("duda"))
}

pub async fn get(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Duda>> {
    let duda = sqlx::query_as::<_, Duda>("SELECT * FROM dudas WHERE id = ?1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(db_pool)
        .await?;
    Ok(duda)
}

pub async fn list_by_estudiante(db_pool: &SqlitePool, estudiante_id: i64) -> AppResult<Vec<Duda>> {
    let dudas = sqlx::query_as::<_, Duda>(
        "SELECT * FROM dudas WHERE estudiante_id = ?1 AND deleted_at IS NULL \
         ORDER BY fecha_pregunta DESC",
    )
    .bind(estudiante_id)
    .fetch_all(db_pool)
    .await?;
    Ok(dudas)
}

pub async fn list_by_autoridad(db_pool: &SqlitePool, autoridad_id: i64) -> AppResult<Vec<Duda>> {
    let dudas = sqlx::query_as::<_, Duda>(
        "SELECT * FROM dudas WHERE autoridad_uteq_id = ?1 AND deleted_at IS NULL \
         ORDER BY fecha_respuesta DESC",
    )
    .bind(autoridad_id)
    .fetch_all(db_pool)
    .await?;
    Ok(dudas)
}

pub async fn list_unanswered(db_pool: &SqlitePool) -> AppResult<Vec<Duda>> {
    let dudas = sqlx::query_as::<_, Duda>(
        "SELECT * FROM dudas WHERE respuesta IS NULL AND deleted_at IS NULL \
         ORDER BY fecha_pregunta ASC",
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("{} dudas sin responder.", dudas.len());
    Ok(dudas)
}

pub async fn delete(db_pool: &SqlitePool, id: i64) -> AppResult {
    tracing::info!("Eliminando duda {}", id);
    let afectadas = sqlx::query(
        "UPDATE dudas SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(Utc::now())
    .bind(id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if afectadas == 0 {
        return Err(AppError::NotFound("duda"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{autoridad::DatosAutoridad, duda::Privacidad};
    use crate::services::persona_service;
    use crate::test_support;

    #[tokio::test]
    async fn preguntar_y_responder() {
        let pool = test_support::pool().await;
        let ana = test_support::crear_ana(&pool).await;
        let estudiante =
            lifecycle::create::<Estudiante>(&pool, ana.id, &test_support::datos_estudiante())
                .await
                .unwrap();
        let luis = persona_service::create(
            &pool,
            &test_support::persona_input("Luis", "0911111111", None),
        )
        .await
        .unwrap();
        let autoridad = lifecycle::create::<AutoridadUteq>(
            &pool,
            luis.id,
            &DatosAutoridad {
                cargo: "Rector".into(),
            },
        )
        .await
        .unwrap();

        let duda = create(&pool, &test_support::duda_input(estudiante.id))
            .await
            .unwrap();
        assert_eq!(duda.privacidad, Privacidad::Publico);
        assert_eq!(list_unanswered(&pool).await.unwrap().len(), 1);

        let respondida = answer(
            &pool,
            duda.id,
            &RespuestaInput {
                autoridad_uteq_id: autoridad.id,
                respuesta: "En la secretaría".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(respondida.autoridad_uteq_id, Some(autoridad.id));
        assert!(respondida.fecha_respuesta.is_some());
        assert!(list_unanswered(&pool).await.unwrap().is_empty());
        assert_eq!(list_by_autoridad(&pool, autoridad.id).await.unwrap().len(), 1);
        assert_eq!(
            lifecycle::count_dependents::<AutoridadUteq>(&pool, autoridad.id)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn estudiante_inexistente_y_borrado_doble() {
        let pool = test_support::pool().await;
        assert!(matches!(
            create(&pool, &test_support::duda_input(5)).await,
            Err(AppError::NotFound("estudiante"))
        ));
        assert!(matches!(delete(&pool, 5).await, Err(AppError::NotFound("duda"))));
    }
}
