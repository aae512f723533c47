//! models/send_log_model.rs
//! Registros persistidos: historial de envíos y bandera de bloqueo.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Un email enviado con éxito. No se modifica una vez agregado al log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRecord {
    pub timestamp: DateTime<Utc>,
    pub account: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<Vec<String>>,
    pub subject: String,
    pub message_id: String,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Orden de inserción = orden cronológico.
pub type SendLog = Vec<SendRecord>;

/// Solicitud candidata (o previa) tal como la ve el guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardRequest {
    pub to: String,
    pub subject: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&SendRecord> for GuardRequest {
    fn from(record: &SendRecord) -> Self {
        GuardRequest {
            to: record.to.clone(),
            subject: record.subject.clone(),
            timestamp: record.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockReason {
    RateLimitExceeded,
    DailyRecipientLimitExceeded,
    DuplicateDetected,
    /// El archivo de bloqueo existe pero no se pudo leer.
    LockoutUnreadable,
}

impl BlockReason {
    pub fn code(&self) -> &'static str {
        match self {
            BlockReason::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            BlockReason::DailyRecipientLimitExceeded => "DAILY_RECIPIENT_LIMIT_EXCEEDED",
            BlockReason::DuplicateDetected => "DUPLICATE_DETECTED",
            BlockReason::LockoutUnreadable => "LOCKOUT_UNREADABLE",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Su sola existencia bloquea todos los envíos.
/// Solo un operador puede borrarla, fuera del programa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutFlag {
    pub reason: BlockReason,
    pub timestamp: DateTime<Utc>,
    pub details: String,
    pub attempted_request: Option<GuardRequest>,
    pub previous_request: Option<GuardRequest>,
}
