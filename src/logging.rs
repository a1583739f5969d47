use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "CHROMATAP_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Sends tracing output to a daily-rolling file in `dir`.
///
/// The terminal belongs to the game screen, so nothing is written to stdout or stderr.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    if std::fs::create_dir_all(dir).is_err() {
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, "chromatap.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init();

    match installed {
        Ok(()) => {
            tracing::info!(dir = %dir.display(), "logging initialized");
            Some(guard)
        }
        // a subscriber is already installed (tests, embedding)
        Err(_) => None,
    }
}
