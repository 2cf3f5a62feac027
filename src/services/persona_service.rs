// src/services/persona_service.rs
use crate::{
    error::{AppError, AppResult},
    models::persona::{Persona, PersonaInput},
    services::uniqueness::{self, EntityKind, UniqueScope},
};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

pub async fn create(db_pool: &SqlitePool, input: &PersonaInput) -> AppResult<Persona> {
    let mut conn = db_pool.acquire().await?;
    create_in(&mut conn, input, Utc::now()).await
}

/// Crea la persona sobre una conexión dada (la carga masiva pasa su transacción).
pub(crate) async fn create_in(
    conn: &mut SqliteConnection,
    input: &PersonaInput,
    now: DateTime<Utc>,
) -> AppResult<Persona> {
    tracing::info!("Creando persona con cédula {}", input.cedula);
    let correo = input.correo_normalizado();

    uniqueness::pre_check(
        conn,
        UniqueScope::Cedula {
            cedula: &input.cedula,
            excluir: None,
        },
    )
    .await?;
    if let Some(correo) = correo {
        uniqueness::pre_check(conn, UniqueScope::Correo { correo, excluir: None }).await?;
    }

    let persona = sqlx::query_as::<_, Persona>(
        r#"
        INSERT INTO personas (nombre, fecha_nacimiento, correo, telefono, cedula, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        RETURNING *
        "#,
    )
    .bind(input.nombre.trim())
    .bind(input.fecha_nacimiento)
    .bind(correo)
    .bind(input.telefono.as_deref())
    .bind(input.cedula.as_str())
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| uniqueness::classify_write(e, EntityKind::Persona))?;

    tracing::info!("✅ Persona {} creada.", persona.id);
    Ok(persona)
}

pub async fn update(db_pool: &SqlitePool, id: i64, input: &PersonaInput) -> AppResult<Persona> {
    tracing::info!("Actualizando persona {}", id);
    let mut conn = db_pool.acquire().await?;
    let correo = input.correo_normalizado();

    uniqueness::pre_check(
        &mut conn,
        UniqueScope::Cedula {
            cedula: &input.cedula,
            excluir: Some(id),
        },
    )
    .await?;
    if let Some(correo) = correo {
        uniqueness::pre_check(
            &mut conn,
            UniqueScope::Correo {
                correo,
                excluir: Some(id),
            },
        )
        .await?;
    }

    sqlx::query_as::<_, Persona>(
        r#"
        UPDATE personas
        SET nombre = ?1, fecha_nacimiento = ?2, correo = ?3, telefono = ?4, cedula = ?5, updated_at = ?6
        WHERE id = ?7 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(input.nombre.trim())
    .bind(input.fecha_nacimiento)
    .bind(correo)
    .bind(input.telefono.as_deref())
    .bind(input.cedula.as_str())
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| uniqueness::classify_write(e, EntityKind::Persona))?
    .ok_or(AppError::NotFound("persona"))
}

pub async fn get(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Persona>> {
    tracing::debug!("Buscando persona {}", id);
    let persona = sqlx::query_as::<_, Persona>(
        "SELECT * FROM personas WHERE id = ?1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?;
    Ok(persona)
}

pub async fn find_including_deleted(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Persona>> {
    let persona = sqlx::query_as::<_, Persona>("SELECT * FROM personas WHERE id = ?1")
        .bind(id)
        .fetch_optional(db_pool)
        .await?;
    Ok(persona)
}

pub async fn get_by_cedula(db_pool: &SqlitePool, cedula: &str) -> AppResult<Option<Persona>> {
    tracing::debug!("Buscando persona por cédula {}", cedula);
    let persona = sqlx::query_as::<_, Persona>(
        "SELECT * FROM personas WHERE cedula = ?1 AND deleted_at IS NULL",
    )
    .bind(cedula)
    .fetch_optional(db_pool)
    .await?;
    Ok(persona)
}

pub async fn list(db_pool: &SqlitePool) -> AppResult<Vec<Persona>> {
    let personas = sqlx::query_as::<_, Persona>(
        "SELECT * FROM personas WHERE deleted_at IS NULL ORDER BY nombre ASC, id ASC",
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontradas {} personas activas.", personas.len());
    Ok(personas)
}

/// Reactiva sólo la persona; sus cuentas y roles siguen como estén.
pub async fn restore(db_pool: &SqlitePool, id: i64) -> AppResult<Persona> {
    tracing::info!("Restaurando persona {}", id);
    sqlx::query_as::<_, Persona>(
        "UPDATE personas SET deleted_at = NULL WHERE id = ?1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await
    .map_err(|e| uniqueness::classify_write(e, EntityKind::Persona))?
    .ok_or(AppError::NotFound("persona"))
}

pub(crate) async fn exists_active(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM personas WHERE id = ?1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::uniqueness::DuplicateKind;
    use crate::test_support;

    #[tokio::test]
    async fn cedula_y_correo_son_unicos_entre_activas() {
        let pool = test_support::pool().await;
        test_support::crear_ana(&pool).await;

        let misma_cedula = test_support::persona_input("Otra", "0102030405", None);
        assert!(matches!(
            create(&pool, &misma_cedula).await,
            Err(AppError::Duplicate(DuplicateKind::NationalId))
        ));

        let mismo_correo =
            test_support::persona_input("Otra", "0999999999", Some("ana@uteq.edu.ec"));
        assert!(matches!(
            create(&pool, &mismo_correo).await,
            Err(AppError::Duplicate(DuplicateKind::Email))
        ));
    }

    #[tokio::test]
    async fn correo_en_blanco_se_guarda_como_null() {
        let pool = test_support::pool().await;
        let ana = create(
            &pool,
            &test_support::persona_input("Ana", "0102030405", Some("")),
        )
        .await
        .unwrap();
        assert_eq!(ana.correo, None);

        // Dos correos en blanco no chocan en el índice único
        let luis = create(
            &pool,
            &test_support::persona_input("Luis", "0911111111", Some("   ")),
        )
        .await
        .unwrap();
        assert_eq!(luis.correo, None);

        let input = test_support::persona_input("Ana", "0102030405", Some(" "));
        assert!(input.validar().is_empty());
        assert_eq!(update(&pool, ana.id, &input).await.unwrap().correo, None);
    }

    #[tokio::test]
    async fn actualizar_conserva_su_propia_cedula() {
        let pool = test_support::pool().await;
        let ana = test_support::crear_ana(&pool).await;

        let mut input = test_support::persona_input("Ana María", "0102030405", None);
        input.telefono = Some("0991234567".into());
        let actualizada = update(&pool, ana.id, &input).await.unwrap();

        assert_eq!(actualizada.nombre, "Ana María");
        assert_eq!(actualizada.cedula, ana.cedula);
        assert_eq!(actualizada.created_at, ana.created_at);
    }

    #[tokio::test]
    async fn actualizar_inexistente_es_no_encontrado() {
        let pool = test_support::pool().await;
        let input = test_support::persona_input("Nadie", "0102030405", None);
        assert!(matches!(
            update(&pool, 42, &input).await,
            Err(AppError::NotFound("persona"))
        ));
    }

    #[tokio::test]
    async fn busca_por_cedula_solo_activas() {
        let pool = test_support::pool().await;
        let ana = test_support::crear_ana(&pool).await;
        assert_eq!(
            get_by_cedula(&pool, "0102030405").await.unwrap().map(|p| p.id),
            Some(ana.id)
        );

        sqlx::query("UPDATE personas SET deleted_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(ana.id)
            .execute(&pool)
            .await
            .unwrap();
        assert!(get_by_cedula(&pool, "0102030405").await.unwrap().is_none());
        assert!(find_including_deleted(&pool, ana.id).await.unwrap().is_some());

        let restaurada = restore(&pool, ana.id).await.unwrap();
        assert_eq!(restaurada.deleted_at, None);
    }
}
