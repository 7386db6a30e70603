//! Bounding-box validation
//!
//! Finalization barrier run once over the complete toolpath.

pub mod bounds;

pub use bounds::{check_bounds, finalize, CENTER_TOLERANCE, Z_START_LIMIT};
