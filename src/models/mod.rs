// src/models/mod.rs
pub mod autoridad;
pub mod catalogo;
pub mod duda;
pub mod estudiante;
pub mod persona;
pub mod usuario;
pub mod visita;
