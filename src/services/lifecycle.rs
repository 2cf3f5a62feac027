// src/services/lifecycle.rs
//! Ciclo de vida de los roles (estudiante, autoridad) junto con su persona
//! y sus cuentas.
//!
//! Eliminar un rol marca, en una sola transacción, el rol, todas las cuentas
//! activas de su persona y la persona. Restaurar deshace los tres pasos en
//! orden inverso: persona, cuentas, rol.

use crate::{
    error::{AppError, AppResult},
    services::{
        persona_service,
        uniqueness::{self, EntityKind, UniqueScope},
    },
};
use chrono::{DateTime, Utc};
use sqlx::{
    query::Query,
    sqlite::{SqliteArguments, SqliteRow},
    FromRow, Sqlite, SqliteConnection, SqlitePool,
};

pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Tabla cuyas filas activas impiden eliminar el rol.
#[derive(Debug, Clone, Copy)]
pub struct Dependiente {
    pub tabla: &'static str,
    pub columna: &'static str,
}

/// Un rol asociado a una persona, con su propia tabla.
pub trait RoleEntity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static {
    /// Atributos propios del rol, sin la persona.
    type Datos: Sync;

    const TABLA: &'static str;
    /// Nombre legible para logs y errores.
    const ETIQUETA: &'static str;
    const ENTIDAD: EntityKind;
    const PERSONA_FK: &'static str = "persona_id";
    /// Columnas de `Datos`, en el orden en que `bind_datos` las enlaza.
    const COLUMNAS: &'static [&'static str];
    const DEPENDIENTES: &'static [Dependiente];

    fn bind_datos<'q>(query: SqliteQuery<'q>, datos: &'q Self::Datos) -> SqliteQuery<'q>;

    fn id(&self) -> i64;
    fn persona_id(&self) -> i64;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}

fn rol_scope<R: RoleEntity>(persona_id: i64, excluir: Option<i64>) -> UniqueScope<'static> {
    UniqueScope::Rol {
        tabla: R::TABLA,
        columna: R::PERSONA_FK,
        persona_id,
        excluir,
    }
}

/// Crea el rol para una persona activa que aún no lo tenga.
pub async fn create<R: RoleEntity>(
    db_pool: &SqlitePool,
    persona_id: i64,
    datos: &R::Datos,
) -> AppResult<R> {
    tracing::info!("Creando {} para persona {}", R::ETIQUETA, persona_id);
    let mut conn = db_pool.acquire().await?;

    if !persona_service::exists_active(&mut conn, persona_id).await? {
        tracing::warn!("Persona {} no existe o está eliminada", persona_id);
        return Err(AppError::PersonNotFound(persona_id));
    }
    uniqueness::pre_check(&mut conn, rol_scope::<R>(persona_id, None)).await?;

    let creado = insert_role::<R>(&mut conn, persona_id, datos, Utc::now()).await?;
    tracing::info!(
        "✅ {} {} creado para persona {}.",
        R::ETIQUETA,
        creado.id(),
        persona_id
    );
    Ok(creado)
}

/// INSERT sin comprobación previa. Si otra petición ganó la carrera, el
/// índice único lo rechaza y el error sale clasificado.
pub(crate) async fn insert_role<R: RoleEntity>(
    conn: &mut SqliteConnection,
    persona_id: i64,
    datos: &R::Datos,
    now: DateTime<Utc>,
) -> AppResult<R> {
    let sql = format!(
        "INSERT INTO {tabla} ({fk}, {columnas}, created_at, updated_at) \
         VALUES (?, {marcadores}, ?, ?) RETURNING *",
        tabla = R::TABLA,
        fk = R::PERSONA_FK,
        columnas = R::COLUMNAS.join(", "),
        marcadores = vec!["?"; R::COLUMNAS.len()].join(", "),
    );

    let query = R::bind_datos(sqlx::query(&sql).bind(persona_id), datos)
        .bind(now)
        .bind(now);
    let row = query
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| uniqueness::classify_write(e, R::ENTIDAD))?;
    Ok(R::from_row(&row)?)
}

/// Actualiza un rol activo. Reasignarlo a otra persona repite la
/// comprobación de unicidad excluyendo la propia fila.
pub async fn update<R: RoleEntity>(
    db_pool: &SqlitePool,
    id: i64,
    persona_id: i64,
    datos: &R::Datos,
) -> AppResult<R> {
    tracing::info!("Actualizando {} {}", R::ETIQUETA, id);
    let mut conn = db_pool.acquire().await?;

    if fetch_by_id::<R>(&mut conn, id, false).await?.is_none() {
        return Err(AppError::NotFound(R::ETIQUETA));
    }
    if !persona_service::exists_active(&mut conn, persona_id).await? {
        return Err(AppError::PersonNotFound(persona_id));
    }
    uniqueness::pre_check(&mut conn, rol_scope::<R>(persona_id, Some(id))).await?;

    let asignaciones: Vec<String> = R::COLUMNAS.iter().map(|c| format!("{c} = ?")).collect();
    let sql = format!(
        "UPDATE {} SET {} = ?, {}, updated_at = ? \
         WHERE id = ? AND deleted_at IS NULL RETURNING *",
        R::TABLA,
        R::PERSONA_FK,
        asignaciones.join(", "),
    );

    let query = R::bind_datos(sqlx::query(&sql).bind(persona_id), datos)
        .bind(Utc::now())
        .bind(id);
    let row = query
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| uniqueness::classify_write(e, R::ENTIDAD))?
        .ok_or(AppError::NotFound(R::ETIQUETA))?;
    Ok(R::from_row(&row)?)
}

/// Elimina (lógicamente) el rol, las cuentas de su persona y la persona.
///
/// No mira dependientes: eso lo decide quien llama (`count_dependents`).
/// Tampoco toca los otros roles de la misma persona, que siguen activos.
pub async fn delete<R: RoleEntity>(db_pool: &SqlitePool, id: i64) -> AppResult {
    tracing::info!("Eliminando {} {} en cascada", R::ETIQUETA, id);
    let mut tx = db_pool.begin().await?;

    // Al salir con error la transacción se descarta y hace rollback
    let Some(entidad) = fetch_by_id::<R>(&mut tx, id, false).await? else {
        tracing::warn!("{} {} no encontrado para eliminar", R::ETIQUETA, id);
        return Err(AppError::NotFound(R::ETIQUETA));
    };
    let persona_id = entidad.persona_id();
    let now = Utc::now();

    sqlx::query(&format!(
        "UPDATE {} SET deleted_at = ?1 WHERE id = ?2",
        R::TABLA
    ))
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let cuentas = sqlx::query(
        "UPDATE usuarios SET deleted_at = ?1 WHERE persona_id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(persona_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query("UPDATE personas SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL")
        .bind(now)
        .bind(persona_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(
        "✅ {} {} eliminado junto con {} cuenta(s) y la persona {}.",
        R::ETIQUETA,
        id,
        cuentas,
        persona_id
    );
    Ok(())
}

/// Restaura persona, cuentas y rol, en ese orden.
///
/// No comprueba que el rol estuviera eliminado. Si otra fila activa ocupa
/// ya la cédula, el correo, el usuario o el rol, el paso falla con el
/// duplicado clasificado y no se restaura nada.
pub async fn restore<R: RoleEntity>(db_pool: &SqlitePool, id: i64) -> AppResult {
    tracing::info!("Restaurando {} {} en cascada", R::ETIQUETA, id);
    let mut tx = db_pool.begin().await?;

    let Some(entidad) = fetch_by_id::<R>(&mut tx, id, true).await? else {
        tracing::warn!("{} {} no existe", R::ETIQUETA, id);
        return Err(AppError::NotFound(R::ETIQUETA));
    };
    let persona_id = entidad.persona_id();

    sqlx::query("UPDATE personas SET deleted_at = NULL WHERE id = ?1")
        .bind(persona_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| uniqueness::classify_write(e, EntityKind::Persona))?;

    let cuentas = sqlx::query("UPDATE usuarios SET deleted_at = NULL WHERE persona_id = ?1")
        .bind(persona_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| uniqueness::classify_write(e, EntityKind::Usuario))?
        .rows_affected();

    sqlx::query(&format!(
        "UPDATE {} SET deleted_at = NULL WHERE id = ?1",
        R::TABLA
    ))
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| uniqueness::classify_write(e, R::ENTIDAD))?;

    tx.commit().await?;
    tracing::info!(
        "✅ {} {} restaurado con la persona {} y {} cuenta(s).",
        R::ETIQUETA,
        id,
        persona_id,
        cuentas
    );
    Ok(())
}

// --- Lecturas ---

async fn fetch_by_id<R: RoleEntity>(
    conn: &mut SqliteConnection,
    id: i64,
    incluir_eliminados: bool,
) -> AppResult<Option<R>> {
    let filtro = if incluir_eliminados {
        ""
    } else {
        " AND deleted_at IS NULL"
    };
    let sql = format!("SELECT * FROM {} WHERE id = ?1{}", R::TABLA, filtro);
    let fila = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(fila.map(|row| R::from_row(&row)).transpose()?)
}

pub async fn find_active<R: RoleEntity>(db_pool: &SqlitePool, id: i64) -> AppResult<Option<R>> {
    tracing::debug!("Buscando {} {}", R::ETIQUETA, id);
    let mut conn = db_pool.acquire().await?;
    fetch_by_id::<R>(&mut conn, id, false).await
}

pub async fn find_including_deleted<R: RoleEntity>(
    db_pool: &SqlitePool,
    id: i64,
) -> AppResult<Option<R>> {
    let mut conn = db_pool.acquire().await?;
    fetch_by_id::<R>(&mut conn, id, true).await
}

async fn list_where<R: RoleEntity>(db_pool: &SqlitePool, filtro: &str) -> AppResult<Vec<R>> {
    let sql = format!("SELECT * FROM {} WHERE {} ORDER BY id ASC", R::TABLA, filtro);
    let filas = sqlx::query(&sql)
        .fetch_all(db_pool)
        .await?
        .iter()
        .map(|row| R::from_row(row))
        .collect::<Result<Vec<R>, _>>()?;
    tracing::debug!("Encontrados {} registros de {}.", filas.len(), R::ETIQUETA);
    Ok(filas)
}

pub async fn list_active<R: RoleEntity>(db_pool: &SqlitePool) -> AppResult<Vec<R>> {
    list_where::<R>(db_pool, "deleted_at IS NULL").await
}

pub async fn list_all<R: RoleEntity>(db_pool: &SqlitePool) -> AppResult<Vec<R>> {
    list_where::<R>(db_pool, "1 = 1").await
}

pub async fn list_deleted<R: RoleEntity>(db_pool: &SqlitePool) -> AppResult<Vec<R>> {
    list_where::<R>(db_pool, "deleted_at IS NOT NULL").await
}

/// Filas activas que dependen del rol (dudas, por ahora).
pub async fn count_dependents<R: RoleEntity>(db_pool: &SqlitePool, id: i64) -> AppResult<i64> {
    let mut total = 0;
    for dep in R::DEPENDIENTES {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ?1 AND deleted_at IS NULL",
            dep.tabla, dep.columna
        );
        let n: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(db_pool).await?;
        total += n;
    }
    Ok(total)
}
