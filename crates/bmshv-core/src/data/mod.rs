//! Telemetry data model
//!
//! Typed in-memory form of one BMS telemetry record.

mod snapshot;

pub use snapshot::{FaultDetail, FaultKind, FaultPair, FaultReport, TelemetrySnapshot};
