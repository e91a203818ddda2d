//! # foldsync - one-way periodic folder mirroring
//!
//! Each run makes a replica directory tree equal to a source tree: same
//! directories, same files, same contents. Failures on single items are
//! reported and retried on the next run.

// Module declarations
pub mod config;
pub mod scanner;
pub mod diff;
pub mod executor;
pub mod hash;
pub mod reconcile;
pub mod engine;
pub mod logging;
pub mod commands;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use engine::SyncEngine;
pub use types::{EventSink, SyncError, SyncEvent, SyncReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
