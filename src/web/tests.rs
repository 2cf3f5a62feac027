// src/web/tests.rs
use crate::{
    models::persona::Persona,
    services::persona_service,
    state::AppState,
    test_support,
    web::routes::create_router,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

fn app(pool: SqlitePool) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
    create_router(AppState { db_pool: pool }).layer(session_layer)
}

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Inicia sesión y devuelve la cookie `nombre=valor`.
async fn login(app: &Router, usuario: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "usuario": usuario, "password": password })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Cuenta de operador, separada de las personas que se eliminan en los tests.
async fn sesion_operador(pool: &SqlitePool, app: &Router) -> String {
    let operador: Persona = persona_service::create(
        pool,
        &test_support::persona_input("Operador", "0999999999", None),
    )
    .await
    .unwrap();
    test_support::crear_cuenta(pool, operador.id, "operador", "clave123").await;
    login(app, "operador", "clave123").await
}

#[tokio::test]
async fn sin_sesion_responde_401() {
    let app = app(test_support::pool().await);

    let (status, body) = send(&app, request(Method::GET, "/estudiantes", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "no_autorizado");
}

#[tokio::test]
async fn login_perfil_y_credenciales_invalidas() {
    let pool = test_support::pool().await;
    let app = app(pool.clone());
    let cookie = sesion_operador(&pool, &app).await;

    let (status, body) = send(
        &app,
        request(Method::GET, "/auth/profile", Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["usuario"]["usuario"], "operador");
    assert!(body["data"]["usuario"].get("password_hash").is_none());
    assert_eq!(body["data"]["persona"]["cedula"], "0999999999");

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "usuario": "operador", "password": "otra" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "credenciales_invalidas");
}

#[tokio::test]
async fn ciclo_de_vida_de_estudiante_por_http() {
    let pool = test_support::pool().await;
    let app = app(pool.clone());
    let cookie = sesion_operador(&pool, &app).await;
    let ana = test_support::crear_ana(&pool).await;
    let cookie = Some(cookie.as_str());

    let nuevo = json!({ "persona_id": ana.id, "institucion_id": 1, "ciudad_id": 1, "especialidad": "Informática" });
    let (status, body) = send(
        &app,
        request(Method::POST, "/estudiantes", cookie, Some(nuevo.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        request(Method::POST, "/estudiantes", cookie, Some(nuevo)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "rol_duplicado");
    assert_eq!(body["field"], "persona_id");

    // Con una duda activa no se puede eliminar
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/dudas",
            cookie,
            Some(json!({ "estudiante_id": id, "pregunta": "¿Hay becas?" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let duda_id = body["data"]["id"].as_i64().unwrap();

    let uri = format!("/estudiantes/{id}");
    let (status, body) = send(&app, request(Method::DELETE, &uri, cookie, None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "estudiante_en_uso");

    let (status, _) = send(
        &app,
        request(Method::DELETE, &format!("/dudas/{duda_id}"), cookie, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, request(Method::DELETE, &uri, cookie, None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, request(Method::GET, &uri, cookie, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        request(Method::GET, "/estudiantes/deleted", cookie, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let restore_uri = format!("/estudiantes/{id}/restore");
    let (status, body) = send(&app, request(Method::PUT, &restore_uri, cookie, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted_at"], Value::Null);
    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/personas/{}", ana.id), cookie, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nombre"], "Ana");

    let (status, body) = send(&app, request(Method::PUT, &restore_uri, cookie, None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "no_eliminado");

    let (status, _) = send(
        &app,
        request(Method::PUT, "/estudiantes/999/restore", cookie, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn persona_invalida_responde_400_con_campos() {
    let pool = test_support::pool().await;
    let app = app(pool.clone());
    let cookie = sesion_operador(&pool, &app).await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/personas",
            Some(&cookie),
            Some(json!({ "nombre": "", "cedula": "123" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    let campos: Vec<&str> = body["validation"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(campos, vec!["nombre", "cedula"]);
}

#[tokio::test]
async fn persona_con_correo_vacio_se_crea_sin_correo() {
    let pool = test_support::pool().await;
    let app = app(pool.clone());
    let cookie = sesion_operador(&pool, &app).await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/personas",
            Some(&cookie),
            Some(json!({ "nombre": "Ana", "cedula": "0102030405", "correo": "" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["correo"], Value::Null);
}

#[tokio::test]
async fn autoridad_asignada_a_visita_no_se_elimina() {
    let pool = test_support::pool().await;
    let app = app(pool.clone());
    let cookie = sesion_operador(&pool, &app).await;
    let ana = test_support::crear_ana(&pool).await;
    let programa = test_support::crear_programa(&pool).await;
    let cookie = Some(cookie.as_str());

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/autoridades-uteq",
            cookie,
            Some(json!({ "persona_id": ana.id, "cargo": "Decana" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/programas-visita/asignaciones",
            cookie,
            Some(json!({ "programa_visita_id": programa.id, "autoridad_uteq_id": id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let asignacion_id = body["data"]["id"].as_i64().unwrap();

    let uri = format!("/autoridades-uteq/{id}");
    let (status, body) = send(&app, request(Method::DELETE, &uri, cookie, None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "autoridad_en_uso");
    let (status, _) = send(&app, request(Method::GET, &uri, cookie, None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            Method::DELETE,
            &format!("/programas-visita/asignaciones/{asignacion_id}"),
            cookie,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, request(Method::DELETE, &uri, cookie, None)).await;
    assert_eq!(status, StatusCode::OK);
}
