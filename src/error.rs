//! error.rs
//! Errores tipados del envío. Cada variante se reporta de forma distinta en consola.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::send_log_model::BlockReason;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("config file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("config file {} could not be parsed: {message}", .path.display())]
    ConfigInvalid { path: PathBuf, message: String },

    #[error("account '{name}' not found in config")]
    AccountNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("credential not configured for account '{account}' (missing {key})")]
    CredentialNotConfigured { account: String, key: String },

    #[error("attachment not found: {}", .0.display())]
    AttachmentNotFound(PathBuf),

    #[error("invalid address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("could not build message: {0}")]
    MessageBuild(String),

    #[error("sending blocked ({reason}): {details}")]
    LockedOut { reason: BlockReason, details: String },

    #[error("SMTP authentication failed for {user}: {message}")]
    AuthenticationError { user: String, message: String },

    #[error("SMTP send failed: {0}")]
    TransportError(String),

    #[error("state file {} could not be written: {message}", .path.display())]
    StateIo { path: PathBuf, message: String },

    /// No fatal: el historial se trata como vacío.
    #[error("send log {} is corrupt: {message}", .path.display())]
    LogCorrupt { path: PathBuf, message: String },
}
