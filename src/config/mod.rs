//! config/mod.rs
//! Configuración: cuentas remitentes y límites del guard.

pub mod account_config;
pub mod guard_config;
