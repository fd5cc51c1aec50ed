//! Telemetry line decoding
//!
//! Turns one newline-terminated JSON line from the BMS into a
//! [`TelemetrySnapshot`](crate::data::TelemetrySnapshot).

mod decoder;

pub use decoder::{decode, TelemetryDecoder, TelemetrySchema};
