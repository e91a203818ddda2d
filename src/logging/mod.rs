//! Logging setup and the production event sink
//!
//! The library never installs a subscriber. The binary calls [`init`], which
//! writes one stream to stdout and to a daily-rotated file under the log
//! folder, and hands a [`TracingSink`] to the engine.

use crate::types::{EventLevel, EventSink, SyncError, SyncEvent};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Prefix of every log file name
pub const LOG_FILE_PREFIX: &str = "foldsync";

/// Rotated log files kept on disk
pub const MAX_LOG_FILES: usize = 7;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Forwards sync events to `tracing` at their level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &SyncEvent) {
        match event.level() {
            EventLevel::Debug => debug!("{}", event),
            EventLevel::Info => info!("{}", event),
            EventLevel::Warn => warn!("{}", event),
            EventLevel::Error => error!("{}", event),
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` overrides the default `info` filter.
///
/// # Errors
/// `SyncError::Config` if the log folder cannot be created, the file
/// appender cannot be built, or a subscriber is already installed.
pub fn init(log_folder: &Path) -> Result<(), SyncError> {
    fs::create_dir_all(log_folder).map_err(|e| {
        SyncError::Config(format!(
            "Cannot create log folder {}: {}",
            log_folder.display(),
            e
        ))
    })?;

    let file_appender = Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_folder)
        .map_err(|e| SyncError::Config(format!("Cannot open log file: {}", e)))?;

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = fmt::layer()
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_target(false)
        .with_level(true);

    let file_layer = fmt::layer()
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .with_writer(file_appender);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| SyncError::Config(format!("Cannot install logger: {}", e)))?;

    Ok(())
}
