//! Global `tracing` subscriber setup.
//!
//! Library code only emits events; binaries call [`init_logger`] once at
//! startup to route them to stderr or to daily files named
//! `<log_path>/<app_name>.<YYYY-MM-DD>.log`, as JSON lines.

use crate::utils::{LoggingConfig, Result, UtilError};
use crate::version::VERSION;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// `debug`, `warn` and `error` in any case; anything else is `INFO`.
pub fn parse_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Installs the global subscriber. `RUST_LOG` directives, when set, refine
/// the configured level. Fails if a subscriber is already installed.
///
/// File output rolls over at UTC midnight and keeps at most
/// `max_log_files` files. Writes are synchronous, so there is no guard to
/// hold and nothing is lost on exit.
pub fn init_logger(config: &LoggingConfig) -> Result<()> {
    let level = parse_level(&config.level);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let writer = if config.console {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        std::fs::create_dir_all(&config.log_path).map_err(|e| {
            UtilError::Logger(format!(
                "failed to create log dir '{}': {e}",
                config.log_path.display()
            ))
        })?;

        let mut builder = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(&config.app_name)
            .filename_suffix("log");
        if config.max_log_files > 0 {
            builder = builder.max_log_files(config.max_log_files);
        }

        let appender = builder.build(&config.log_path).map_err(|e| {
            UtilError::Logger(format!("failed to open rolling log file: {e}"))
        })?;
        BoxMakeWriter::new(appender)
    };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init()
        .map_err(|e| UtilError::Logger(format!("failed to set subscriber: {e}")))?;

    tracing::info!(
        app = %config.app_name,
        version = VERSION,
        level = %level,
        "logger initialized"
    );
    Ok(())
}
