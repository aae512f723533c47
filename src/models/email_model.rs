use std::path::PathBuf;

/// Email listo para despachar. Los adjuntos son rutas aún sin verificar.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub cc: Vec<String>,
    pub subject: String,
    pub text: String,
    pub attachments: Vec<PathBuf>,
}

/// Adjunto ya resuelto y leído de disco.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub message_id: String,
    pub attachment_names: Vec<String>,
}
