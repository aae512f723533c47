//! tests/email_tests.rs
//! Pruebas del despacho sin red: adjuntos, CC, Message-ID y clasificación de errores.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::MailError;
use crate::models::account_model::Account;
use crate::models::email_model::OutgoingEmail;
use crate::services::email_service::{
    attachment_filename, generate_message_id, guess_content_type, is_auth_failure_code,
    parse_cc_list, resolve_attachments, EmailService,
};

// Puerto 1 en loopback: si se llegara a intentar el envío, fallaría con TransportError
fn unreachable_account() -> Account {
    Account {
        name: "test".to_string(),
        address: "me@example.com".to_string(),
        secret: "secret".to_string(),
        display_name: "Test Sender".to_string(),
        smtp_host: "127.0.0.1".to_string(),
        smtp_port: 1,
    }
}

fn email_with(attachments: Vec<PathBuf>) -> OutgoingEmail {
    OutgoingEmail {
        to: "a@x.com".to_string(),
        cc: vec![],
        subject: "Hi".to_string(),
        text: "Hello".to_string(),
        attachments,
    }
}

#[test]
fn resolve_reads_existing_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Report.PDF");
    fs::write(&path, b"%PDF-1.4").unwrap();

    let resolved = resolve_attachments(&[path]).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].filename, "Report.PDF");
    assert_eq!(resolved[0].content_type, "application/pdf");
    assert_eq!(resolved[0].data, b"%PDF-1.4");
}

#[test]
fn resolve_rejects_missing_file() {
    let dir = TempDir::new().unwrap();
    let present = dir.path().join("notes.txt");
    fs::write(&present, "ok").unwrap();
    let missing = dir.path().join("missing.txt");

    let err = resolve_attachments(&[present, missing.clone()]).unwrap_err();
    match err {
        MailError::AttachmentNotFound(path) => assert_eq!(path, missing),
        other => panic!("expected AttachmentNotFound, got {other:?}"),
    }
}

#[test]
fn resolve_rejects_directories() {
    let dir = TempDir::new().unwrap();
    let err = resolve_attachments(&[dir.path().to_path_buf()]).unwrap_err();
    assert!(matches!(err, MailError::AttachmentNotFound(_)));
}

#[tokio::test]
async fn missing_attachment_fails_before_transport() {
    let service = EmailService::new(unreachable_account()).unwrap();
    let email = email_with(vec![PathBuf::from("/definitely/not/here.pdf")]);

    let err = service.send(&email).await.unwrap_err();
    assert!(matches!(err, MailError::AttachmentNotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let service = EmailService::new(unreachable_account()).unwrap();

    let err = service.send(&email_with(vec![])).await.unwrap_err();
    assert!(matches!(err, MailError::TransportError(_)), "got {err:?}");
}

#[tokio::test]
async fn invalid_recipient_is_rejected_before_transport() {
    let service = EmailService::new(unreachable_account()).unwrap();
    let mut email = email_with(vec![]);
    email.to = "not an address".to_string();

    let err = service.send(&email).await.unwrap_err();
    assert!(matches!(err, MailError::InvalidAddress { .. }), "got {err:?}");
}

#[test]
fn cc_list_splits_and_trims() {
    assert_eq!(
        parse_cc_list(" b@x.com, ,c@y.org,"),
        vec!["b@x.com".to_string(), "c@y.org".to_string()]
    );
    assert!(parse_cc_list("").is_empty());
}

#[test]
fn message_id_uses_sender_domain() {
    let id = generate_message_id("me@example.com");
    assert!(id.starts_with('<'));
    assert!(id.ends_with("@example.com>"));
    assert_ne!(id, generate_message_id("me@example.com"));

    assert!(generate_message_id("no-domain").ends_with("@localhost>"));
}

#[test]
fn content_type_falls_back_to_octet_stream() {
    assert_eq!(guess_content_type(Path::new("a.png")), "image/png");
    assert_eq!(guess_content_type(Path::new("a.tar.gz")), "application/gzip");
    assert_eq!(guess_content_type(Path::new("Makefile")), "application/octet-stream");
    assert_eq!(attachment_filename(Path::new("/tmp/dir/file.csv")), "file.csv");
}

#[test]
fn auth_codes_are_recognized() {
    assert!(is_auth_failure_code("535"));
    assert!(is_auth_failure_code("534"));
    assert!(!is_auth_failure_code("550"));
    assert!(!is_auth_failure_code("421"));
}
