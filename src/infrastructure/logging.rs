use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::AppConfig, infrastructure::directories::ResolvedPaths};

const LOG_PREFIX: &str = "chatrapati";
const LOG_SUFFIX: &str = "log";

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// File-only subscriber: the terminal belongs to the UI, so nothing is written to stdout.
pub fn init_tracing(config: &AppConfig, paths: &ResolvedPaths) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.logging.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_PREFIX)
            .filename_suffix(LOG_SUFFIX)
            .max_log_files(config.logging.retention_days)
            .build(&paths.logs_dir)
            .context("failed to open rolling log file")?;
        let (file_writer, guard) = tracing_appender::non_blocking(appender);
        let _ = GUARD.set(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_ansi(false),
            )
            .try_init()?;

        tracing::info!(
            target: "app",
            log_files = %paths.logs_dir.join(format!("{LOG_PREFIX}.*.{LOG_SUFFIX}")).display(),
            retention_days = config.logging.retention_days,
            version = env!("CARGO_PKG_VERSION"),
            "logging to rolling file"
        );
        Ok(())
    })?;
    Ok(())
}
