// src/web/role_handlers.rs
//! Handlers comunes a estudiantes y autoridades.
use crate::{
    error::{AppError, AppResult},
    services::{lifecycle, lifecycle::RoleEntity, uniqueness::EntityKind},
    state::AppState,
    web::respuesta::{self, Respuesta},
};
use axum::extract::{Path, State};
use serde::Serialize;

fn codigo_en_uso<R: RoleEntity>() -> &'static str {
    match R::ENTIDAD {
        EntityKind::Estudiante => "estudiante_en_uso",
        EntityKind::Autoridad => "autoridad_en_uso",
        _ => "registro_en_uso",
    }
}

// GET /{rol}
pub async fn list<R: RoleEntity + Serialize>(
    State(state): State<AppState>,
) -> AppResult<Respuesta<Vec<R>>> {
    Ok(respuesta::ok(lifecycle::list_active::<R>(&state.db_pool).await?))
}

// GET /{rol}/all-including-deleted
pub async fn list_all<R: RoleEntity + Serialize>(
    State(state): State<AppState>,
) -> AppResult<Respuesta<Vec<R>>> {
    Ok(respuesta::ok(lifecycle::list_all::<R>(&state.db_pool).await?))
}

// GET /{rol}/deleted
pub async fn list_deleted<R: RoleEntity + Serialize>(
    State(state): State<AppState>,
) -> AppResult<Respuesta<Vec<R>>> {
    Ok(respuesta::ok(lifecycle::list_deleted::<R>(&state.db_pool).await?))
}

// GET /{rol}/{id}
pub async fn get<R: RoleEntity + Serialize>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Respuesta<R>> {
    let entidad = lifecycle::find_active::<R>(&state.db_pool, id)
        .await?
        .ok_or(AppError::NotFound(R::ETIQUETA))?;
    Ok(respuesta::ok(entidad))
}

// DELETE /{rol}/{id}
pub async fn delete<R: RoleEntity>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Respuesta<()>> {
    let dependientes = lifecycle::count_dependents::<R>(&state.db_pool, id).await?;
    if dependientes > 0 {
        tracing::warn!(
            "{} {} tiene {} registros dependientes activos; no se elimina.",
            R::ETIQUETA,
            id,
            dependientes
        );
        return Err(AppError::Conflict {
            code: codigo_en_uso::<R>(),
            message: format!(
                "No se puede eliminar: el {} tiene {} registro(s) activo(s) asociado(s)",
                R::ETIQUETA,
                dependientes
            ),
        });
    }

    lifecycle::delete::<R>(&state.db_pool, id).await?;
    Ok(respuesta::mensaje(format!(
        "El {} fue eliminado junto con su persona y sus cuentas",
        R::ETIQUETA
    )))
}

// PUT /{rol}/{id}/restore
pub async fn restore<R: RoleEntity + Serialize>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Respuesta<R>> {
    let entidad = lifecycle::find_including_deleted::<R>(&state.db_pool, id)
        .await?
        .ok_or(AppError::NotFound(R::ETIQUETA))?;
    if !entidad.is_deleted() {
        return Err(AppError::Conflict {
            code: "no_eliminado",
            message: format!("El {} no está eliminado", R::ETIQUETA),
        });
    }

    lifecycle::restore::<R>(&state.db_pool, id).await?;
    let restaurado = lifecycle::find_active::<R>(&state.db_pool, id)
        .await?
        .ok_or(AppError::InternalServerError)?;
    Ok(respuesta::ok(restaurado).con_mensaje(format!("El {} fue restaurado", R::ETIQUETA)))
}
