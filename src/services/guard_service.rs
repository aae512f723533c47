//! services/guard_service.rs
//! Reglas anti-abuso: bloqueo persistente, límite de frecuencia,
//! límite diario por destinatario y detección de duplicados.

use chrono::{DateTime, Utc};

use crate::config::guard_config::GuardConfig;
use crate::error::MailError;
use crate::models::send_log_model::{
    BlockReason, GuardRequest, LockoutFlag, SendLog, SendRecord,
};
use crate::services::send_log_service::SendLogStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Block(GuardBlock),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardBlock {
    pub reason: BlockReason,
    pub details: String,
    pub previous: Option<GuardRequest>,
    /// true si el bloqueo viene de una bandera ya existente
    pub from_existing_lockout: bool,
}

/// Función pura: no lee el reloj ni toca disco.
/// Orden: bloqueo existente, frecuencia, diario por destinatario, duplicado.
pub fn evaluate(
    request: &GuardRequest,
    log: &[SendRecord],
    lockout: Option<&LockoutFlag>,
    now: DateTime<Utc>,
    config: &GuardConfig,
) -> GuardDecision {
    if let Some(flag) = lockout {
        return GuardDecision::Block(GuardBlock {
            reason: flag.reason,
            details: flag.details.clone(),
            previous: flag.previous_request.clone(),
            from_existing_lockout: true,
        });
    }

    let Some(last) = log.last() else {
        return GuardDecision::Allow;
    };

    // 1) Frecuencia. Un timestamp futuro da elapsed negativo y también bloquea.
    let elapsed = now - last.timestamp;
    if elapsed < config.min_interval {
        return block(
            BlockReason::RateLimitExceeded,
            format!(
                "Only {}s elapsed since the last email (minimum {}s). Previous email: to={} subject=\"{}\" at {}",
                elapsed.num_seconds(),
                config.min_interval.num_seconds(),
                last.to,
                last.subject,
                last.timestamp.to_rfc3339()
            ),
            last,
        );
    }

    // 2) Un solo email por destinatario dentro de la ventana (límite exclusivo)
    let window_start = now - config.recipient_window;
    if let Some(recent) = log
        .iter()
        .filter(|r| r.to == request.to && r.timestamp > window_start)
        .max_by_key(|r| r.timestamp)
    {
        let hours = (now - recent.timestamp).num_minutes() as f64 / 60.0;
        return block(
            BlockReason::DailyRecipientLimitExceeded,
            format!(
                "{} already received an email {:.1}h ago (limit: one per {}h). Previous subject: \"{}\" at {}",
                recent.to,
                hours,
                config.recipient_window.num_hours(),
                recent.subject,
                recent.timestamp.to_rfc3339()
            ),
            recent,
        );
    }

    // 3) Duplicado: solo contra el último registro
    if last.to == request.to && last.subject == request.subject {
        return block(
            BlockReason::DuplicateDetected,
            format!(
                "Same recipient and subject as the last email: to={} subject=\"{}\" at {}",
                last.to,
                last.subject,
                last.timestamp.to_rfc3339()
            ),
            last,
        );
    }

    GuardDecision::Allow
}

fn block(reason: BlockReason, details: String, previous: &SendRecord) -> GuardDecision {
    GuardDecision::Block(GuardBlock {
        reason,
        details,
        previous: Some(GuardRequest::from(previous)),
        from_existing_lockout: false,
    })
}

/// Une el guard con el almacén: cualquier bloqueo nuevo queda persistido
/// antes de devolver el error.
pub struct GuardService<S: SendLogStore> {
    store: S,
    config: GuardConfig,
}

impl<S: SendLogStore> GuardService<S> {
    pub fn new(store: S, config: GuardConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn check(&mut self, request: &GuardRequest, now: DateTime<Utc>) -> Result<(), MailError> {
        let lockout = self.store.lockout();
        let log: SendLog = if lockout.is_some() {
            Vec::new()
        } else {
            self.store.load()
        };

        let decision = evaluate(request, &log, lockout.as_ref(), now, &self.config);
        let blocked = match decision {
            GuardDecision::Allow => {
                log::debug!("Guard: envío permitido a {}", request.to);
                return Ok(());
            }
            GuardDecision::Block(blocked) => blocked,
        };

        if blocked.from_existing_lockout {
            log::warn!("Guard: bloqueo vigente ({})", blocked.reason);
        } else {
            log::warn!("Guard: envío bloqueado ({}): {}", blocked.reason, blocked.details);
            let flag = LockoutFlag {
                reason: blocked.reason,
                timestamp: now,
                details: blocked.details.clone(),
                attempted_request: Some(request.clone()),
                previous_request: blocked.previous.clone(),
            };
            // Sin bandera persistida no se reporta bloqueo: se propaga StateIo
            if let Err(e) = self.store.set_lockout(&flag) {
                log::error!("No se pudo persistir el bloqueo ({}): {e}", blocked.reason);
                return Err(e);
            }
        }

        Err(MailError::LockedOut {
            reason: blocked.reason,
            details: blocked.details,
        })
    }

    pub fn record_sent(&mut self, record: SendRecord) -> Result<(), MailError> {
        self.store.append(record)
    }
}
