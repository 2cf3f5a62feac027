// src/web/mod.rs
pub mod auth_handlers;
pub mod autoridad_handlers;
pub mod catalogo_handlers;
pub mod duda_handlers;
pub mod estudiante_handlers;
pub mod mw_auth;
pub mod persona_handlers;
pub mod respuesta;
pub mod role_handlers;
pub mod routes;
pub mod usuario_handlers;
pub mod visita_handlers;

#[cfg(test)]
mod tests;
