//! Aggregation & Layout Engine
//!
//! Pure functions that derive display data from a telemetry snapshot:
//! - Summary statistics (min, max, average, median)
//! - Reshaping flat arrays into display tables and locating values in them
//! - Flag marking for per-cell indicators
//! - Fault-table projection

mod faults;
mod layout;
mod stats;

pub use faults::{fault_rows, FaultRow, PLACEHOLDER};
pub use layout::{
    fit_to_geometry, flatten, locate_extreme, locate_in_matrix, mark_flag, reshape,
    reshape_column_major, Matrix,
};
pub use stats::{max, median, min, min_max_avg_median, Summary};
