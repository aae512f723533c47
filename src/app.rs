//! app.rs
//! Interfaz de línea de comandos.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "guarded_mailer",
    version,
    about = "Send one email over SMTP, guarded by rate, daily-recipient and duplicate limits"
)]
pub struct Cli {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub message: String,
    /// Files to attach
    pub attachments: Vec<PathBuf>,

    #[arg(long, help = "Sender account name (defaults to DEFAULT_ACCOUNT)")]
    pub from: Option<String>,

    #[arg(long, help = "Comma-separated CC addresses")]
    pub cc: Option<String>,

    #[arg(
        long,
        env = "MAILER_CONFIG",
        default_value = ".env",
        help = "Account config file (dotenv format)"
    )]
    pub config: PathBuf,

    #[arg(
        long,
        env = "MAILER_STATE_DIR",
        default_value = "data",
        help = "Directory holding the send log and the lockout file"
    )]
    pub state_dir: PathBuf,

    #[arg(short, long, default_value_t = false, help = "Debug logging on stderr")]
    pub verbose: bool,
}
