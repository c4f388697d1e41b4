//! crewdesk binary entrypoint kept minimal. The runtime lives in `app`.

mod app;
mod args;
mod config;
mod dialer;
mod logic;
mod session;
mod sources;
mod state;
mod util;

use std::sync::OnceLock;
use std::{fmt, time::SystemTime};

use clap::Parser;

struct CrewdeskTimer;

impl tracing_subscriber::fmt::time::FormatTime for CrewdeskTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let secs = match SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(_) => 0,
        };
        let s = crate::util::ts_to_date(Some(secs)); // "YYYY-MM-DD HH:MM:SS"
        let ts = s.replacen(' ', "-T", 1); // "YYYY-MM-DD-T HH:MM:SS"
        w.write_str(&ts)
    }
}

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// RUST_LOG wins over the `--log-level` flag when both are present.
fn log_filter(flag_level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(flag_level))
}

#[tokio::main]
async fn main() {
    let cli = args::Args::parse();

    // Initialize tracing logger writing to ~/.config/crewdesk/logs/crewdesk.log
    {
        let mut log_path = crate::config::logs_dir();
        log_path.push("crewdesk.log");
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                tracing_subscriber::fmt()
                    .with_env_filter(log_filter(&cli.log_level))
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .with_timer(CrewdeskTimer)
                    .init();
                let _ = LOG_GUARD.set(guard);
                tracing::info!(path = %log_path.display(), "logging initialized");
            }
            Err(e) => {
                // Fallback: init stderr logger to avoid blocking startup
                tracing_subscriber::fmt()
                    .with_env_filter(log_filter(&cli.log_level))
                    .with_target(false)
                    .with_ansi(true)
                    .with_timer(CrewdeskTimer)
                    .init();
                tracing::warn!(error = %e, "failed to open log file; using stderr");
            }
        }
    }

    tracing::info!(module = ?cli.module, offline = cli.offline, "crewdesk starting");
    if let Err(err) = app::run(cli).await {
        tracing::error!(error = %err, "run failed");
        eprintln!("crewdesk: {err}");
        std::process::exit(1);
    }
    tracing::info!("crewdesk exited");
}

#[cfg(test)]
mod tests {
    /// What: FormatTime impl writes a non-empty timestamp without panicking
    ///
    /// - Input: Tracing writer buffer
    /// - Output: Buffer receives some content
    #[test]
    fn crewdesk_timer_formats_time_without_panic() {
        use tracing_subscriber::fmt::time::FormatTime;
        let mut buf = String::new();
        let mut writer = tracing_subscriber::fmt::format::Writer::new(&mut buf);
        let t = super::CrewdeskTimer;
        let _ = t.format_time(&mut writer);
        assert!(!buf.is_empty());
    }
}
