//! Periodic scheduler
//!
//! Runs the engine on the blocking pool, waits `interval`, and repeats until
//! the cancellation token fires. The token is only observed between runs.

use crate::engine::SyncEngine;
use crate::types::SyncError;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Run `engine` every `interval` until `token` is cancelled
///
/// Returns the number of completed runs. A run that takes longer than
/// `interval` is followed by a full wait, never by an overlapping run.
///
/// # Errors
/// `SyncError::RunAborted` if a run panics.
pub async fn run_scheduled(
    engine: Arc<SyncEngine>,
    interval: Duration,
    token: CancellationToken,
) -> Result<usize, SyncError> {
    let mut runs = 0usize;

    loop {
        let worker = Arc::clone(&engine);
        let report = tokio::task::spawn_blocking(move || worker.run())
            .await
            .map_err(|e| SyncError::RunAborted(e.to_string()))?;
        runs += 1;
        debug!("Run {} finished: {}", runs, report.summary());

        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!("Synchronization stopped after {} run(s).", runs);
    Ok(runs)
}

/// Cancel `token` on Ctrl+C or SIGTERM
pub async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, finishing current run"),
        _ = terminate => info!("Received SIGTERM, finishing current run"),
    }

    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NullSink, SyncEvent};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_stops_after_cancellation_between_runs() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("a.txt"), b"a").expect("write");

        let token = CancellationToken::new();
        let completed = Arc::new(AtomicUsize::new(0));
        let sink = {
            let token = token.clone();
            let completed = Arc::clone(&completed);
            move |event: &SyncEvent| {
                if let SyncEvent::RunComplete(_) = event {
                    if completed.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                        token.cancel();
                    }
                }
            }
        };

        let engine = Arc::new(SyncEngine::new(src.path(), dst.path(), Arc::new(sink)).expect("engine"));
        let runs = run_scheduled(engine, Duration::from_millis(10), token)
            .await
            .expect("scheduler should stop cleanly");

        assert_eq!(runs, 3);
        assert_eq!(completed.load(Ordering::SeqCst), 3);
        assert!(dst.path().join("a.txt").is_file());
    }

    #[tokio::test]
    async fn test_cancelled_before_start_still_runs_once() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("a.txt"), b"a").expect("write");

        let token = CancellationToken::new();
        token.cancel();

        let engine = Arc::new(SyncEngine::new(src.path(), dst.path(), Arc::new(NullSink)).expect("engine"));
        let runs = run_scheduled(engine, Duration::from_secs(3600), token)
            .await
            .expect("scheduler should stop cleanly");

        assert_eq!(runs, 1);
        assert!(dst.path().join("a.txt").is_file());
    }

    #[tokio::test]
    async fn test_panicking_run_is_reported() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");

        let sink = |event: &SyncEvent| {
            if let SyncEvent::RunComplete(_) = event {
                panic!("sink exploded");
            }
        };

        let engine = Arc::new(SyncEngine::new(src.path(), dst.path(), Arc::new(sink)).expect("engine"));
        let err = run_scheduled(engine, Duration::from_millis(10), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::RunAborted(_)));
        assert!(err.is_fatal());
    }
}
