// src/services/mod.rs
pub mod auth_service;
pub mod autoridad_service;
pub mod catalogo_service;
pub mod duda_service;
pub mod estudiante_service;
pub mod lifecycle;
pub mod persona_service;
pub mod uniqueness;
pub mod usuario_service;
pub mod visita_service;
