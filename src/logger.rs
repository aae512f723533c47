//! logger.rs
//! Configuración del logger usando env_logger.

pub fn init_logger(verbose: bool) {
    // RUST_LOG tiene prioridad; si no está, "warn" (o "debug" con --verbose)
    let default_level = if verbose { "debug" } else { "warn" };
    let log_env = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_env))
        .format_timestamp_secs()
        .init();
}
