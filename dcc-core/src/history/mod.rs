//! Change detection and the character audit trail.

mod detector;
mod report;

pub use detector::{compare_collection, ChangeDetector, TrackedItem};
pub use report::{render_history, TIMESTAMP_FORMAT};
