// src/web/respuesta.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Sobre de éxito: `{"success": true, "message"?: ..., "data": ...}`.
pub struct Respuesta<T> {
    status: StatusCode,
    message: Option<String>,
    data: T,
}

pub fn ok<T: Serialize>(data: T) -> Respuesta<T> {
    Respuesta {
        status: StatusCode::OK,
        message: None,
        data,
    }
}

pub fn creado<T: Serialize>(data: T) -> Respuesta<T> {
    Respuesta {
        status: StatusCode::CREATED,
        message: None,
        data,
    }
}

/// Respuesta sin datos, sólo con mensaje.
pub fn mensaje(message: impl Into<String>) -> Respuesta<()> {
    ok(()).con_mensaje(message)
}

impl<T: Serialize> Respuesta<T> {
    pub fn con_mensaje(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Respuesta<T> {
    fn into_response(self) -> Response {
        let mut body = json!({ "success": true, "data": self.data });
        if let Some(message) = self.message {
            body["message"] = json!(message);
        }
        (self.status, Json(body)).into_response()
    }
}
