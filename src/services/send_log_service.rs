//! services/send_log_service.rs
//! Persistencia del historial de envíos y de la bandera de bloqueo.
//!
//! No existe ninguna operación para borrar el bloqueo: eso lo hace un operador
//! a mano, fuera del programa.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::MailError;
use crate::models::send_log_model::{BlockReason, LockoutFlag, SendLog, SendRecord};

pub const SEND_LOG_FILE: &str = "sent_emails.json";
pub const LOCKOUT_FILE: &str = "LOCKOUT.json";

pub trait SendLogStore {
    /// Historial completo. Ausente o corrupto => vacío (nunca falla).
    fn load(&self) -> SendLog;

    /// Agrega al final y reescribe el log completo.
    fn append(&mut self, record: SendRecord) -> Result<(), MailError>;

    fn lockout(&self) -> Option<LockoutFlag>;

    fn set_lockout(&mut self, flag: &LockoutFlag) -> Result<(), MailError>;

    /// Ubicación del bloqueo, para indicarle al operador qué borrar.
    fn lockout_location(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct FileSendLogStore {
    state_dir: PathBuf,
}

impl FileSendLogStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join(SEND_LOG_FILE)
    }

    pub fn lockout_path(&self) -> PathBuf {
        self.state_dir.join(LOCKOUT_FILE)
    }

    // Escritura atómica: archivo temporal en el mismo directorio + rename
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<(), MailError> {
        let io_err = |e: std::io::Error| MailError::StateIo {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.state_dir).map_err(io_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.state_dir).map_err(io_err)?;
        tmp.write_all(contents).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl SendLogStore for FileSendLogStore {
    fn load(&self) -> SendLog {
        let path = self.log_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn_corrupt(&path, e.to_string());
                return Vec::new();
            }
        };

        match serde_json::from_str::<SendLog>(&raw) {
            Ok(log) => log,
            Err(e) => {
                warn_corrupt(&path, e.to_string());
                Vec::new()
            }
        }
    }

    fn append(&mut self, record: SendRecord) -> Result<(), MailError> {
        let path = self.log_path();
        let mut log = self.load();
        log.push(record);

        let json = serde_json::to_vec_pretty(&log).map_err(|e| MailError::StateIo {
            path: path.clone(),
            message: e.to_string(),
        })?;
        self.write_atomic(&path, &json)?;

        log::debug!("Log de envíos actualizado ({} registros)", log.len());
        Ok(())
    }

    fn lockout(&self) -> Option<LockoutFlag> {
        let path = self.lockout_path();
        if !path.exists() {
            return None;
        }

        // La presencia del archivo es lo que bloquea, aunque no se pueda leer
        let parsed = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<LockoutFlag>(&raw).map_err(|e| e.to_string()));

        match parsed {
            Ok(flag) => Some(flag),
            Err(message) => {
                log::warn!(
                    "Archivo de bloqueo {} ilegible: {}",
                    path.display(),
                    message
                );
                Some(LockoutFlag {
                    reason: BlockReason::LockoutUnreadable,
                    timestamp: Utc::now(),
                    details: format!("Lockout file exists but could not be read: {message}"),
                    attempted_request: None,
                    previous_request: None,
                })
            }
        }
    }

    fn set_lockout(&mut self, flag: &LockoutFlag) -> Result<(), MailError> {
        let path = self.lockout_path();
        let json = serde_json::to_vec_pretty(flag).map_err(|e| MailError::StateIo {
            path: path.clone(),
            message: e.to_string(),
        })?;
        self.write_atomic(&path, &json)?;

        log::warn!("Bloqueo activado ({}): {}", flag.reason, path.display());

        // Best-effort: el bloqueo ya está vigente aunque esto falle
        protect_read_only(&path);
        Ok(())
    }

    fn lockout_location(&self) -> String {
        self.lockout_path().display().to_string()
    }
}

/// Marca el archivo como solo lectura. Un fallo se registra y no se propaga.
pub fn protect_read_only(path: &Path) -> bool {
    let result = fs::metadata(path).and_then(|meta| {
        let mut perms = meta.permissions();
        perms.set_readonly(true);
        fs::set_permissions(path, perms)
    });

    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!(
                "No se pudo marcar {} como solo lectura: {}",
                path.display(),
                e
            );
            false
        }
    }
}

fn warn_corrupt(path: &Path, message: String) {
    let err = MailError::LogCorrupt {
        path: path.to_path_buf(),
        message,
    };
    log::warn!("{err}; se continúa con historial vacío");
}

/// Almacén en memoria para pruebas.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemorySendLogStore {
    pub log: SendLog,
    pub lockout: Option<LockoutFlag>,
    pub lockout_writes: usize,
}

#[cfg(test)]
impl SendLogStore for MemorySendLogStore {
    fn load(&self) -> SendLog {
        self.log.clone()
    }

    fn append(&mut self, record: SendRecord) -> Result<(), MailError> {
        self.log.push(record);
        Ok(())
    }

    fn lockout(&self) -> Option<LockoutFlag> {
        self.lockout.clone()
    }

    fn set_lockout(&mut self, flag: &LockoutFlag) -> Result<(), MailError> {
        self.lockout = Some(flag.clone());
        self.lockout_writes += 1;
        Ok(())
    }

    fn lockout_location(&self) -> String {
        "<memory>".to_string()
    }
}
