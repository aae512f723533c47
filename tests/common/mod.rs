use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub config: PathBuf,
    pub state_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let config = tmp.path().join("mailer.env");
        fs::write(
            &config,
            "DEFAULT_ACCOUNT=personal\n\
             PERSONAL_EMAIL_USER=me@example.com\n\
             PERSONAL_APP_PASSWORD=not-a-real-password\n\
             PERSONAL_DISPLAY_NAME=Tester\n",
        )
        .expect("write config");
        let state_dir = tmp.path().join("data");

        Self {
            _tmp: tmp,
            config,
            state_dir,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("guarded_mailer");
        cmd.env_remove("RUST_LOG")
            .env_remove("MAILER_CONFIG")
            .env_remove("MAILER_STATE_DIR")
            .arg("--config")
            .arg(&self.config)
            .arg("--state-dir")
            .arg(&self.state_dir);
        cmd
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("sent_emails.json")
    }

    pub fn lockout_path(&self) -> PathBuf {
        self.state_dir.join("LOCKOUT.json")
    }

    pub fn seed_log(&self, records: &[(&str, &str, DateTime<Utc>)]) {
        let log: Vec<Value> = records
            .iter()
            .map(|(to, subject, ts)| {
                json!({
                    "timestamp": ts,
                    "account": "personal",
                    "from": "me@example.com",
                    "to": to,
                    "subject": subject,
                    "message_id": "<seed@example.com>",
                    "attachments": []
                })
            })
            .collect();
        fs::create_dir_all(&self.state_dir).expect("create state dir");
        fs::write(self.log_path(), serde_json::to_string_pretty(&log).unwrap())
            .expect("seed log");
    }

    pub fn seed_lockout(&self, reason: &str) {
        fs::create_dir_all(&self.state_dir).expect("create state dir");
        let flag = json!({
            "reason": reason,
            "timestamp": Utc::now(),
            "details": "seeded by test",
            "attempted_request": null,
            "previous_request": null
        });
        fs::write(self.lockout_path(), flag.to_string()).expect("seed lockout");
    }

    pub fn read_lockout(&self) -> Value {
        let raw = fs::read_to_string(self.lockout_path()).expect("lockout exists");
        serde_json::from_str(&raw).expect("lockout json")
    }
}
