//! config/guard_config.rs
//! Límites del guard anti-abuso (ventanas de tiempo).

use chrono::Duration;

/// Límites fijos; no se leen del archivo de configuración.
#[derive(Debug, Clone, Copy)]
pub struct GuardConfig {
    /// Tiempo mínimo entre dos envíos cualesquiera
    pub min_interval: Duration,
    /// Ventana en la que un destinatario puede recibir un solo email
    pub recipient_window: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            min_interval: Duration::seconds(30),
            recipient_window: Duration::hours(24),
        }
    }
}
