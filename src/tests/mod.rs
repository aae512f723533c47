//! tests/mod.rs
//! Pruebas unitarias y helpers compartidos.

mod email_tests;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::send_log_model::{GuardRequest, SendRecord};

// Instante fijo para que las pruebas no dependan del reloj
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn at(offset_secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(offset_secs)
}

pub fn record(to: &str, subject: &str, timestamp: DateTime<Utc>) -> SendRecord {
    SendRecord {
        timestamp,
        account: "personal".to_string(),
        from: "me@example.com".to_string(),
        to: to.to_string(),
        cc: None,
        subject: subject.to_string(),
        message_id: format!("<{}@example.com>", timestamp.timestamp()),
        attachments: vec![],
    }
}

pub fn request(to: &str, subject: &str, timestamp: DateTime<Utc>) -> GuardRequest {
    GuardRequest {
        to: to.to_string(),
        subject: subject.to_string(),
        timestamp,
    }
}
