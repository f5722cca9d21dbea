//! Logging setup and configuration

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::storage::OUTPUT_DIR;

pub struct LoggingGuard {
    pub _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Console plus an hourly rolling file under `output/logs`.
/// `LOG_FORMAT=json` switches the file layer to JSON lines.
pub fn setup_logging() -> Result<Arc<LoggingGuard>> {
    let file_appender = tracing_appender::rolling::hourly(
        format!("{}/logs", OUTPUT_DIR),
        "arb-pipeline.log",
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let file_layer = if json {
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_ansi(false)
            .json()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(false)
            .compact()
            .boxed()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_ansi(true)
                .with_level(true)
        )
        .with(file_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .init();

    Ok(Arc::new(LoggingGuard { _guard: guard }))
}

pub fn setup_output_directories() -> Result<()> {
    use std::fs;

    for kind in ["logs", "opportunities", "allocations", "ledger"] {
        fs::create_dir_all(format!("{}/{}", OUTPUT_DIR, kind))?;
    }

    Ok(())
}
