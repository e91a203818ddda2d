//! Single sync pass

use crate::engine::SyncEngine;
use crate::types::{EventSink, SyncError, SyncReport};
use crate::Config;
use std::sync::Arc;

/// Run one pass for `config` and return its report
///
/// Only construction errors surface here; item failures are counted in the
/// report and already went through `sink`.
pub fn run_once(config: &Config, sink: Arc<dyn EventSink>) -> Result<SyncReport, SyncError> {
    let engine = SyncEngine::new(&config.source, &config.replica, sink)?;
    Ok(engine.run())
}
