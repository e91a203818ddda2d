//! Directory scanning logic

mod walker;

pub use walker::{is_under_unreadable, PathScanner};
