//! Audio-file records and folder enumeration.
//!
//! Records are disposable snapshots of what a file's tags said at scan time;
//! the file on disk stays the source of truth.

mod model;
mod scan;

pub use model::*;
pub use scan::*;
