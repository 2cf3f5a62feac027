// src/web/routes.rs
use crate::{
    models::{autoridad::AutoridadUteq, estudiante::Estudiante},
    state::AppState,
    web::{
        auth_handlers, autoridad_handlers, catalogo_handlers, duda_handlers, estudiante_handlers,
        mw_auth, persona_handlers, role_handlers, usuario_handlers, visita_handlers,
    },
};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rutas públicas ---
    let public_routes = Router::new().route("/auth/login", post(auth_handlers::handle_login));

    let persona_routes = Router::new()
        .route("/", post(persona_handlers::create).get(persona_handlers::list))
        .route("/{id}", get(persona_handlers::get).put(persona_handlers::update))
        .route("/{id}/restore", put(persona_handlers::restore))
        .route("/cedula/{cedula}", get(persona_handlers::get_by_cedula));

    let usuario_routes = Router::new()
        .route("/", post(usuario_handlers::create).get(usuario_handlers::list))
        .route("/persona/{persona_id}", get(usuario_handlers::list_by_persona));

    let estudiante_routes = Router::new()
        .route(
            "/",
            post(estudiante_handlers::create).get(role_handlers::list::<Estudiante>),
        )
        .route(
            "/all-including-deleted",
            get(role_handlers::list_all::<Estudiante>),
        )
        .route("/deleted", get(role_handlers::list_deleted::<Estudiante>))
        .route("/bulk", post(estudiante_handlers::bulk_create))
        .route(
            "/{id}",
            get(role_handlers::get::<Estudiante>)
                .put(estudiante_handlers::update)
                .delete(role_handlers::delete::<Estudiante>),
        )
        .route("/{id}/restore", put(role_handlers::restore::<Estudiante>))
        .route("/ciudad/{id}", get(estudiante_handlers::list_by_ciudad))
        .route("/institucion/{id}", get(estudiante_handlers::list_by_institucion))
        .route(
            "/especialidad/{texto}",
            get(estudiante_handlers::search_by_especialidad),
        );

    let autoridad_routes = Router::new()
        .route(
            "/",
            post(autoridad_handlers::create).get(role_handlers::list::<AutoridadUteq>),
        )
        .route(
            "/all-including-deleted",
            get(role_handlers::list_all::<AutoridadUteq>),
        )
        .route("/deleted", get(role_handlers::list_deleted::<AutoridadUteq>))
        .route(
            "/{id}",
            get(role_handlers::get::<AutoridadUteq>)
                .put(autoridad_handlers::update)
                .delete(role_handlers::delete::<AutoridadUteq>),
        )
        .route("/{id}/restore", put(role_handlers::restore::<AutoridadUteq>))
        .route("/cargo/{texto}", get(autoridad_handlers::search_by_cargo))
        .route("/persona/{persona_id}", get(autoridad_handlers::get_by_persona));

    let duda_routes = Router::new()
        .route("/", post(duda_handlers::create))
        .route("/sin-responder", get(duda_handlers::list_unanswered))
        .route("/{id}", get(duda_handlers::get).delete(duda_handlers::delete))
        .route("/{id}/responder", put(duda_handlers::answer))
        .route("/estudiante/{id}", get(duda_handlers::list_by_estudiante))
        .route("/autoridad/{id}", get(duda_handlers::list_by_autoridad));

    let visita_routes = Router::new()
        .route(
            "/",
            post(visita_handlers::create_programa).get(visita_handlers::list_programas),
        )
        .route("/asignaciones", post(visita_handlers::asignar_autoridad))
        .route(
            "/asignaciones/{id}",
            delete(visita_handlers::quitar_asignacion),
        )
        .route("/autoridad/{id}", get(visita_handlers::list_by_autoridad))
        .route("/{id}", get(visita_handlers::get_programa))
        .route("/{id}/autoridades", get(visita_handlers::list_by_programa));

    let catalogo_routes = Router::new()
        .route(
            "/instituciones",
            post(catalogo_handlers::create_institucion).get(catalogo_handlers::list_instituciones),
        )
        .route("/instituciones/{id}", get(catalogo_handlers::get_institucion))
        .route(
            "/ciudades",
            post(catalogo_handlers::create_ciudad).get(catalogo_handlers::list_ciudades),
        )
        .route("/ciudades/{id}", get(catalogo_handlers::get_ciudad));

    // --- Rutas autenticadas ---
    let authenticated_routes = Router::new()
        .route("/auth/logout", post(auth_handlers::handle_logout))
        .route("/auth/profile", get(auth_handlers::handle_profile))
        .nest("/personas", persona_routes)
        .nest("/usuarios", usuario_routes)
        .nest("/estudiantes", estudiante_routes)
        .nest("/autoridades-uteq", autoridad_routes)
        .nest("/dudas", duda_routes)
        .nest("/programas-visita", visita_routes)
        .merge(catalogo_routes)
        // require_auth se aplica a todo lo definido arriba
        .route_layer(middleware::from_fn(mw_auth::require_auth));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
