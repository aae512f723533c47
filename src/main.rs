use std::process::ExitCode;

use clap::Parser;

use crate::app::Cli;
use crate::handlers::send_handler::{print_failure, print_success, send_email_command};
use crate::logger::init_logger;

mod app;
mod config;
mod error;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

fn main() -> anyhow::Result<ExitCode> {
    // Errores de argumentos salen con 1 (no el 2 de clap); --help/--version con 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => e.exit(),
    };
    init_logger(cli.verbose);

    // Una sola invocación, un solo envío: runtime de un hilo alcanza
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(send_email_command(&cli)) {
        Ok(outcome) => {
            print_success(&outcome);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            log::debug!("Invocación terminada con error: {:?}", e);
            print_failure(&cli, &e);
            Ok(ExitCode::FAILURE)
        }
    }
}
