use std::env;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Hold on to the returned guard for the whole
/// run, otherwise buffered file output is lost.
pub fn init_logger() -> Option<WorkerGuard> {
    // Menus own stdout, so only warnings and up reach the terminal by default.
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| "warn".to_string());
    let filter_layer = EnvFilter::new(filter);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .compact()
        .with_file(false)
        .without_time()
        .with_ansi(true);

    let (file_layer, guard) = match env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let file_appender = tracing_appender::rolling::never("./", log_file_path);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(filter_layer)
        .init();

    info!("Tracing is configured");

    guard
}
