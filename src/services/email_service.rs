//! services/email_service.rs
//! Despacho del email por SMTP. Un solo intento por invocación.

use std::fs;
use std::path::{Path, PathBuf};

use lettre::{
    address::Address,
    message::{
        header::{ContentDisposition, ContentType},
        Body, Mailbox, MultiPart, SinglePart,
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use crate::{
    error::MailError,
    models::{
        account_model::Account,
        email_model::{EmailAttachment, OutgoingEmail, SentEmail},
    },
};

/// Puerto de SMTP sobre TLS implícito; cualquier otro usa STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

pub struct EmailService {
    account: Account,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailService {
    /// Construye el transporte (no abre conexión todavía).
    pub fn new(account: Account) -> Result<Self, MailError> {
        let tls_params = TlsParameters::new(account.smtp_host.clone())
            .map_err(|e| MailError::TransportError(e.to_string()))?;
        let tls = if account.smtp_port == IMPLICIT_TLS_PORT {
            Tls::Wrapper(tls_params)
        } else {
            Tls::Required(tls_params)
        };

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&account.smtp_host)
            .map_err(|e| MailError::TransportError(e.to_string()))?
            .port(account.smtp_port)
            .credentials(Credentials::new(
                account.address.clone(),
                account.secret.clone(),
            ))
            .tls(tls)
            .build();

        Ok(Self { account, mailer })
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Resuelve adjuntos, arma el mensaje y lo envía.
    /// Cualquier adjunto faltante se rechaza antes de tocar la red.
    pub async fn send(&self, email: &OutgoingEmail) -> Result<SentEmail, MailError> {
        let attachments = resolve_attachments(&email.attachments)?;
        let attachment_names = attachments.iter().map(|a| a.filename.clone()).collect();

        let message_id = generate_message_id(&self.account.address);
        let message = self.build_message(email, attachments, &message_id)?;

        log::info!(
            "Enviando email a {} desde {} ({})",
            email.to,
            self.account.address,
            self.account.smtp_host
        );

        let response = self
            .mailer
            .send(message)
            .await
            .map_err(|e| classify_transport_error(&self.account.address, e))?;

        log::debug!(
            "Respuesta SMTP {}: {}",
            response.code(),
            response.message().collect::<Vec<_>>().join(" ")
        );

        Ok(SentEmail {
            message_id,
            attachment_names,
        })
    }

    fn build_message(
        &self,
        email: &OutgoingEmail,
        attachments: Vec<EmailAttachment>,
        message_id: &str,
    ) -> Result<Message, MailError> {
        let from_address = parse_address(&self.account.address)?;
        let from = Mailbox::new(Some(self.account.display_name.clone()), from_address);

        let mut builder = Message::builder()
            .from(from)
            .to(parse_mailbox(&email.to)?)
            .subject(&email.subject)
            .message_id(Some(message_id.to_string()));

        for cc in &email.cc {
            builder = builder.cc(parse_mailbox(cc)?);
        }

        let text_part = SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(email.text.clone());

        let result = if attachments.is_empty() {
            builder.singlepart(text_part)
        } else {
            let mut multipart = MultiPart::mixed().singlepart(text_part);
            for attach in attachments {
                let content_type = ContentType::parse(&attach.content_type)
                    .map_err(|e| MailError::MessageBuild(e.to_string()))?;
                let part = SinglePart::builder()
                    .header(content_type)
                    .header(ContentDisposition::attachment(&attach.filename))
                    .body(Body::new(attach.data));
                multipart = multipart.singlepart(part);
            }
            builder.multipart(multipart)
        };

        result.map_err(|e| MailError::MessageBuild(e.to_string()))
    }
}

/// Verifica y lee todos los adjuntos. Falla con el primero que no exista.
pub fn resolve_attachments(paths: &[PathBuf]) -> Result<Vec<EmailAttachment>, MailError> {
    // Primero verificar todos, luego leer
    if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
        return Err(MailError::AttachmentNotFound(missing.clone()));
    }

    paths
        .iter()
        .map(|path| {
            let data =
                fs::read(path).map_err(|_| MailError::AttachmentNotFound(path.clone()))?;
            Ok(EmailAttachment {
                filename: attachment_filename(path),
                content_type: guess_content_type(path).to_string(),
                data,
            })
        })
        .collect()
}

pub fn attachment_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string())
}

pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "xml" => "application/xml",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => "application/octet-stream",
    }
}

/// Separa `--cc a@x.com, b@y.com` ignorando entradas vacías.
pub fn parse_cc_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `<uuid@dominio-del-remitente>`
pub fn generate_message_id(sender: &str) -> String {
    let domain = sender
        .rsplit_once('@')
        .map(|(_, d)| d)
        .filter(|d| !d.is_empty())
        .unwrap_or("localhost");
    format!("<{}@{}>", Uuid::new_v4(), domain)
}

/// 530 = auth requerida, 534 = mecanismo/app-password, 535 = credenciales inválidas
pub fn is_auth_failure_code(code: &str) -> bool {
    matches!(code, "530" | "534" | "535")
}

fn classify_transport_error(user: &str, err: lettre::transport::smtp::Error) -> MailError {
    let is_auth = err
        .status()
        .map(|code| is_auth_failure_code(&code.to_string()))
        .unwrap_or(false);

    if is_auth {
        MailError::AuthenticationError {
            user: user.to_string(),
            message: err.to_string(),
        }
    } else {
        MailError::TransportError(err.to_string())
    }
}

fn parse_address(raw: &str) -> Result<Address, MailError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| MailError::InvalidAddress {
            address: raw.to_string(),
            message: e.to_string(),
        })
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, MailError> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress {
            address: raw.to_string(),
            message: e.to_string(),
        })
}
