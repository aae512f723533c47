//! handlers/mod.rs
pub mod send_handler;
