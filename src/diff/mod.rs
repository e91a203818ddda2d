//! Diff engine - set differences between source and replica

mod plan;

pub use plan::{DirectoryPlan, FilePlan};
