//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod account_model;
pub mod email_model;
pub mod send_log_model;
