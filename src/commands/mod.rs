//! Command entry points used by the binary

pub mod sync;
pub mod watch;

pub use sync::run_once;
pub use watch::{run_scheduled, shutdown_signal};

use crate::engine::SyncEngine;
use crate::types::{EventSink, SyncError};
use crate::Config;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::error;

/// Run `config` to completion: one pass with `--once`, otherwise the
/// scheduler until `token` fires
///
/// Returns the number of completed runs. A fatal error is logged through
/// `tracing` before it is returned, so it lands in the log file too.
pub async fn serve(
    config: Config,
    sink: Arc<dyn EventSink>,
    token: CancellationToken,
) -> Result<usize, SyncError> {
    let result = dispatch(config, sink, token).await;
    if let Err(e) = &result {
        error!("Synchronization stopped: {}", e);
    }
    result
}

async fn dispatch(
    config: Config,
    sink: Arc<dyn EventSink>,
    token: CancellationToken,
) -> Result<usize, SyncError> {
    if config.once {
        tokio::task::spawn_blocking(move || run_once(&config, sink))
            .await
            .map_err(|e| SyncError::RunAborted(e.to_string()))??;
        return Ok(1);
    }

    let engine = Arc::new(SyncEngine::new(&config.source, &config.replica, sink)?);
    run_scheduled(engine, config.interval, token).await
}
