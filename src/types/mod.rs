//! Core type definitions for foldsync

mod error;
mod event;
mod report;
mod tree;

pub use error::SyncError;
pub use event::{EventLevel, EventSink, NullSink, Operation, SyncEvent, SyncPhase};
pub use report::SyncReport;
pub use tree::{PathSet, TreeSnapshot};
