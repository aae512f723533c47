//! handlers/send_handler.rs
//! Flujo completo de una invocación: cuenta -> guard -> envío -> log -> reporte.

use chrono::{DateTime, Utc};

use crate::{
    app::Cli,
    config::{account_config::AccountConfig, guard_config::GuardConfig},
    error::MailError,
    models::{
        account_model::Account,
        email_model::{OutgoingEmail, SentEmail},
        send_log_model::{GuardRequest, SendRecord},
    },
    services::{
        email_service::{parse_cc_list, EmailService},
        guard_service::GuardService,
        send_log_service::{FileSendLogStore, SendLogStore},
    },
};

#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub record: SendRecord,
}

pub async fn send_email_command(cli: &Cli) -> Result<SendOutcome, MailError> {
    // 1) Resolver cuenta
    let config = AccountConfig::load(&cli.config)?;
    let account = config.resolve(cli.from.as_deref())?;
    log::debug!("Cuenta resuelta: {:?}", account);

    // 2) Guard (bloqueo, luego reglas sobre el log)
    let now = Utc::now();
    let request = GuardRequest {
        to: cli.to.trim().to_string(),
        subject: cli.subject.clone(),
        timestamp: now,
    };
    let mut guard = GuardService::new(
        FileSendLogStore::new(&cli.state_dir),
        GuardConfig::default(),
    );
    log::debug!("Bloqueo esperado en {}", guard.store().lockout_location());
    guard.check(&request, now)?;

    // 3) Enviar
    let cc = cli.cc.as_deref().map(parse_cc_list).unwrap_or_default();
    let email = OutgoingEmail {
        to: request.to.clone(),
        cc,
        subject: cli.subject.clone(),
        text: cli.message.clone(),
        attachments: cli.attachments.clone(),
    };
    let service = EmailService::new(account)?;
    let sent = service.send(&email).await?;

    // 4) Registrar
    let record = build_send_record(service.account(), email, sent, Utc::now());
    // El email ya salió: un fallo al escribir el log no se reporta como fallo de envío
    if let Err(e) = guard.record_sent(record.clone()) {
        log::error!("Email enviado pero no se pudo registrar en el log: {e}");
    }

    Ok(SendOutcome { record })
}

/// Registro del log para un envío exitoso. CC vacío se guarda como ausente.
pub fn build_send_record(
    account: &Account,
    email: OutgoingEmail,
    sent: SentEmail,
    timestamp: DateTime<Utc>,
) -> SendRecord {
    SendRecord {
        timestamp,
        account: account.name.clone(),
        from: account.address.clone(),
        to: email.to,
        cc: if email.cc.is_empty() { None } else { Some(email.cc) },
        subject: email.subject,
        message_id: sent.message_id,
        attachments: sent.attachment_names,
    }
}

pub fn print_success(outcome: &SendOutcome) {
    let r = &outcome.record;
    println!("Email sent successfully");
    println!("  account:    {}", r.account);
    println!("  from:       {}", r.from);
    println!("  to:         {}", r.to);
    if let Some(cc) = &r.cc {
        println!("  cc:         {}", cc.join(", "));
    }
    println!("  subject:    {}", r.subject);
    if !r.attachments.is_empty() {
        println!("  attachments: {}", r.attachments.join(", "));
    }
    println!("  message id: {}", r.message_id);
}

/// Reporte en consola con la remediación correspondiente a cada error.
pub fn print_failure(cli: &Cli, err: &MailError) {
    match err {
        MailError::LockedOut { reason, details } => {
            let lockout = FileSendLogStore::new(&cli.state_dir).lockout_location();
            println!("BLOCKED: sending is locked out ({reason})");
            println!("  details: {details}");
            println!("  lockout file: {lockout}");
            println!("  No email was sent. All sends stay blocked until an operator");
            println!("  reviews and manually deletes the lockout file:");
            println!("    rm -f {lockout}");
        }
        MailError::AuthenticationError { user, .. } => {
            println!("ERROR: {err}");
            println!("  Check the app password configured for {user}.");
            println!("  Gmail requires 2-Step Verification and an App Password");
            println!("  (https://myaccount.google.com/apppasswords), not the account password.");
        }
        MailError::AccountNotFound { available, .. } => {
            println!("ERROR: {err}");
            if available.is_empty() {
                println!("  No accounts are configured in {}", cli.config.display());
            } else {
                println!("  Configured accounts: {}", available.join(", "));
            }
        }
        MailError::CredentialNotConfigured { key, .. } => {
            println!("ERROR: {err}");
            println!("  Set {key} in {}", cli.config.display());
        }
        MailError::ConfigMissing(path) => {
            println!("ERROR: {err}");
            println!(
                "  Create {} with DEFAULT_ACCOUNT and <NAME>_EMAIL_USER / <NAME>_APP_PASSWORD entries",
                path.display()
            );
        }
        MailError::AttachmentNotFound(_) => {
            println!("ERROR: {err}");
            println!("  No email was sent.");
        }
        MailError::StateIo { .. } => {
            println!("ERROR: {err}");
            println!(
                "  No email was sent. Fix the state directory ({}) and retry.",
                cli.state_dir.display()
            );
        }
        _ => println!("ERROR: {err}"),
    }
}
