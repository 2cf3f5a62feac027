// src/test_support.rs
//! Fixtures compartidos por los tests.

use crate::{
    db,
    models::{
        catalogo::{CiudadInput, InstitucionInput},
        duda::{DudaInput, Privacidad},
        estudiante::DatosEstudiante,
        persona::{Persona, PersonaInput},
        usuario::{Usuario, UsuarioInput, TIPO_ESTUDIANTE},
        visita::{ProgramaVisita, ProgramaVisitaInput},
    },
    services::{catalogo_service, persona_service, usuario_service, visita_service},
};
use chrono::Utc;
use sqlx::SqlitePool;

/// Pool en memoria con la institución 1 y la ciudad 1 ya creadas.
pub async fn pool() -> SqlitePool {
    let pool = db::memory_pool().await;

    catalogo_service::create_institucion(
        &pool,
        &InstitucionInput {
            nombre: "Unidad Educativa Quevedo".into(),
            autoridad: "Rectora".into(),
            contacto: "052750000".into(),
            correo: "info@ueq.edu.ec".into(),
            direccion: "Av. Walter Andrade".into(),
        },
    )
    .await
    .unwrap();
    catalogo_service::create_ciudad(
        &pool,
        &CiudadInput {
            nombre: "Quevedo".into(),
            provincia: "Los Ríos".into(),
        },
    )
    .await
    .unwrap();

    pool
}

pub fn persona_input(nombre: &str, cedula: &str, correo: Option<&str>) -> PersonaInput {
    PersonaInput {
        nombre: nombre.into(),
        fecha_nacimiento: None,
        correo: correo.map(String::from),
        telefono: None,
        cedula: cedula.into(),
    }
}

pub async fn crear_ana(pool: &SqlitePool) -> Persona {
    persona_service::create(
        pool,
        &persona_input("Ana", "0102030405", Some("ana@uteq.edu.ec")),
    )
    .await
    .unwrap()
}

pub async fn crear_cuenta(
    pool: &SqlitePool,
    persona_id: i64,
    usuario: &str,
    password: &str,
) -> Usuario {
    usuario_service::create(
        pool,
        &UsuarioInput {
            usuario: usuario.into(),
            password: password.into(),
            persona_id,
            tipo_usuario_id: TIPO_ESTUDIANTE,
        },
    )
    .await
    .unwrap()
}

pub fn datos_estudiante() -> DatosEstudiante {
    DatosEstudiante {
        institucion_id: 1,
        ciudad_id: 1,
        especialidad: "Informática".into(),
    }
}

pub fn duda_input(estudiante_id: i64) -> DudaInput {
    DudaInput {
        estudiante_id,
        pregunta: "¿Cuándo abren las inscripciones?".into(),
        privacidad: Privacidad::default(),
    }
}

/// Programa de visita a la institución 1.
pub async fn crear_programa(pool: &SqlitePool) -> ProgramaVisita {
    visita_service::create_programa(
        pool,
        &ProgramaVisitaInput {
            fecha: Utc::now(),
            fecha_fin: None,
            institucion_id: 1,
        },
    )
    .await
    .unwrap()
}
