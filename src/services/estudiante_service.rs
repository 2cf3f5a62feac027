// src/services/estudiante_service.rs
use crate::{
    error::{AppError, AppResult, FieldError},
    models::{
        estudiante::{
            DatosEstudiante, Estudiante, EstudianteInput, FilaEstudiante, FilaExitosa,
            FilaFallida, ResultadoCargaMasiva,
        },
        persona::{es_cedula_valida, PersonaInput},
        usuario::{Usuario, TIPO_ESTUDIANTE},
    },
    services::{
        auth_service, catalogo_service,
        lifecycle::{self, Dependiente, RoleEntity, SqliteQuery},
        persona_service,
        uniqueness::EntityKind,
        usuario_service,
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};

impl RoleEntity for Estudiante {
    type Datos = DatosEstudiante;

    const TABLA: &'static str = "estudiantes";
    const ETIQUETA: &'static str = "estudiante";
    const ENTIDAD: EntityKind = EntityKind::Estudiante;
    const COLUMNAS: &'static [&'static str] = &["institucion_id", "ciudad_id", "especialidad"];
    const DEPENDIENTES: &'static [Dependiente] = &[Dependiente {
        tabla: "dudas",
        columna: "estudiante_id",
    }];

    fn bind_datos<'q>(query: SqliteQuery<'q>, datos: &'q DatosEstudiante) -> SqliteQuery<'q> {
        query
            .bind(datos.institucion_id)
            .bind(datos.ciudad_id)
            .bind(datos.especialidad.trim())
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

async fn validar_catalogo(conn: &mut SqliteConnection, datos: &DatosEstudiante) -> AppResult {
    let mut errores = Vec::new();
    if !catalogo_service::institucion_exists(conn, datos.institucion_id).await? {
        errores.push(FieldError::new("institucion_id", "La institución no existe"));
    }
    if !catalogo_service::ciudad_exists(conn, datos.ciudad_id).await? {
        errores.push(FieldError::new("ciudad_id", "La ciudad no existe"));
    }
    if errores.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errores))
    }
}

pub async fn create(db_pool: &SqlitePool, input: &EstudianteInput) -> AppResult<Estudiante> {
    {
        let mut conn = db_pool.acquire().await?;
        validar_catalogo(&mut conn, &input.datos).await?;
    }
    lifecycle::create::<Estudiante>(db_pool, input.persona_id, &input.datos).await
}

pub async fn update(db_pool: &SqlitePool, id: i64, input: &EstudianteInput) -> AppResult<Estudiante> {
    {
        let mut conn = db_pool.acquire().await?;
        validar_catalogo(&mut conn, &input.datos).await?;
    }
    lifecycle::update::<Estudiante>(db_pool, id, input.persona_id, &input.datos).await
}

pub async fn list_by_ciudad(db_pool: &SqlitePool, ciudad_id: i64) -> AppResult<Vec<Estudiante>> {
    let estudiantes = sqlx::query_as::<_, Estudiante>(
        "SELECT * FROM estudiantes WHERE ciudad_id = ?1 AND deleted_at IS NULL ORDER BY id ASC",
    )
    .bind(ciudad_id)
    .fetch_all(db_pool)
    .await?;
    Ok(estudiantes)
}

pub async fn list_by_institucion(
    db_pool: &SqlitePool,
    institucion_id: i64,
) -> AppResult<Vec<Estudiante>> {
    let estudiantes = sqlx::query_as::<_, Estudiante>(
        "SELECT * FROM estudiantes WHERE institucion_id = ?1 AND deleted_at IS NULL ORDER BY id ASC",
    )
    .bind(institucion_id)
    .fetch_all(db_pool)
    .await?;
    Ok(estudiantes)
}

/// Búsqueda por subcadena, sin distinguir mayúsculas.
pub async fn search_by_especialidad(
    db_pool: &SqlitePool,
    texto: &str,
) -> AppResult<Vec<Estudiante>> {
    tracing::debug!("Buscando estudiantes con especialidad '{}'", texto);
    let estudiantes = sqlx::query_as::<_, Estudiante>(
        r#"
        SELECT * FROM estudiantes
        WHERE LOWER(especialidad) LIKE '%' || LOWER(?1) || '%' AND deleted_at IS NULL
        ORDER BY id ASC
        "#,
    )
    .bind(texto)
    .fetch_all(db_pool)
    .await?;
    Ok(estudiantes)
}

// --- Carga masiva ---

/// Crea persona, cuenta y estudiante por cada fila, una transacción por fila.
/// Una fila fallida no afecta a las demás.
pub async fn bulk_create(
    db_pool: &SqlitePool,
    filas: &[FilaEstudiante],
) -> AppResult<ResultadoCargaMasiva> {
    tracing::info!("Carga masiva de {} estudiantes", filas.len());
    let mut resultado = ResultadoCargaMasiva {
        total: filas.len(),
        ..Default::default()
    };

    for (indice, fila) in filas.iter().enumerate() {
        let numero = indice + 1;
        match crear_fila(db_pool, fila).await {
            Ok((usuario, estudiante)) => resultado.exitosos.push(FilaExitosa {
                fila: numero,
                cedula: fila.cedula.clone(),
                usuario: usuario.usuario,
                estudiante_id: estudiante.id,
            }),
            Err(e) => {
                tracing::warn!("Fila {} rechazada: {}", numero, e);
                resultado.fallidos.push(FilaFallida {
                    fila: numero,
                    cedula: fila.cedula.clone(),
                    motivo: motivo(&e),
                });
            }
        }
    }

    resultado.total_exitosos = resultado.exitosos.len();
    resultado.total_fallidos = resultado.fallidos.len();
    tracing::info!(
        "✅ Carga masiva terminada: {} creados, {} fallidos.",
        resultado.total_exitosos,
        resultado.total_fallidos
    );
    Ok(resultado)
}

async fn crear_fila(
    db_pool: &SqlitePool,
    fila: &FilaEstudiante,
) -> AppResult<(Usuario, Estudiante)> {
    let persona = validar_fila(fila)?;
    let datos = DatosEstudiante {
        institucion_id: fila.institucion_id,
        ciudad_id: fila.ciudad_id,
        especialidad: fila.especialidad.clone().unwrap_or_default(),
    };
    // Usuario y contraseña inicial: la cédula
    let password_hash = auth_service::hash_password(&fila.cedula).await?;

    let mut tx = db_pool.begin().await?;
    validar_catalogo(&mut tx, &datos).await?;

    let now = Utc::now();
    let persona = persona_service::create_in(&mut tx, &persona, now).await?;
    let usuario = usuario_service::create_in(
        &mut tx,
        &fila.cedula,
        &password_hash,
        persona.id,
        TIPO_ESTUDIANTE,
        now,
    )
    .await?;
    let estudiante = lifecycle::insert_role::<Estudiante>(&mut tx, persona.id, &datos, now).await?;

    tx.commit().await?;
    Ok((usuario, estudiante))
}

fn validar_fila(fila: &FilaEstudiante) -> AppResult<PersonaInput> {
    let mut errores = Vec::new();
    if !es_cedula_valida(&fila.cedula) {
        errores.push(FieldError::new("cedula", "La cédula debe tener exactamente 10 dígitos"));
    }
    if fila.nombre.trim().is_empty() {
        errores.push(FieldError::new("nombre", "El nombre es obligatorio"));
    }

    let fecha_nacimiento = match fila.fecha_nacimiento.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(texto) => match NaiveDate::parse_from_str(texto, "%Y-%m-%d") {
            Ok(fecha) => Some(fecha),
            Err(_) => {
                errores.push(FieldError::new(
                    "fecha_nacimiento",
                    "Formato de fecha inválido (use AAAA-MM-DD)",
                ));
                None
            }
        },
    };

    let persona = PersonaInput {
        nombre: fila.nombre.clone(),
        fecha_nacimiento,
        correo: fila.correo.clone(),
        telefono: fila.telefono.clone(),
        cedula: fila.cedula.clone(),
    };
    if persona.correo_normalizado().is_some_and(|c| !c.contains('@')) {
        errores.push(FieldError::new("correo", "El correo no tiene un formato válido"));
    }

    if errores.is_empty() {
        Ok(persona)
    } else {
        Err(AppError::Validation(errores))
    }
}

/// Texto para el reporte de la fila; nunca el detalle interno del error.
fn motivo(error: &AppError) -> String {
    match error {
        AppError::Validation(errores) => errores
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        AppError::Duplicate(kind) => kind.message().to_string(),
        otro => otro.parts().2,
    }
}
