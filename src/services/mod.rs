//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod email_service;
pub mod guard_service;
pub mod send_log_service;
