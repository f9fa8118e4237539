//! Logging setup for embedders of the engine
//!
//! Console output stays human-readable; enforcement audit events additionally
//! go to a daily-rotated JSON file so a moderation platform can ship them to
//! its log pipeline.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log directory name
pub const LOG_DIR: &str = "logs";
/// Audit log file name
pub const AUDIT_LOG_FILE: &str = "audit";

/// Initialize the logging system with console and file outputs
///
/// # Errors
/// Fails if the log directory cannot be created.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if !Path::new(LOG_DIR).exists() {
        std::fs::create_dir_all(LOG_DIR)?;
    }

    let audit_file = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, AUDIT_LOG_FILE);

    // Console output (human-readable format)
    let console_layer = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_ansi(true);

    // Audit log (JSON format)
    let audit_layer = fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_ansi(false)
        .json()
        .with_writer(audit_file);

    // Use env filter to allow runtime configuration of log levels,
    // defaulting to INFO when unspecified
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(audit_layer)
        .init();

    tracing::info!("Logging system initialized");
    Ok(())
}
