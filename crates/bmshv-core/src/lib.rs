//! # BMS HV Core
//!
//! Telemetry model, decoder, aggregation engine and configuration for the
//! BMS HV utility. Everything here is pure and synchronous; the serial link
//! and the front-end live in their own crates.

pub mod aggregation;
pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod protocol;
pub mod telemetry;
pub mod view;

pub use aggregation::{
    fault_rows, fit_to_geometry, flatten, locate_extreme, locate_in_matrix, mark_flag, max,
    median, min, min_max_avg_median, reshape, reshape_column_major, FaultRow, Matrix, Summary,
};

pub use config::{
    DisplaySettings, FeatureSettings, FillOrder, LinkSettings, MonitorConfig, OverflowPolicy,
    PackGeometry, QueueSettings, TableGeometry,
};

pub use data::{FaultDetail, FaultKind, FaultPair, FaultReport, TelemetrySnapshot};

pub use display::{DisplaySink, FieldId, TableId};

pub use error::{
    AggregationError, ConfigError, ConnectionError, DecodeError, Discarded, Error, ProtocolError,
    QueueError, Result,
};

pub use protocol::{ChargeCurrent, CommandTokens, OutboundCommand, UserAction};

pub use telemetry::{decode, TelemetryDecoder, TelemetrySchema};

pub use view::{build_view, format_value, render, CellExtreme, DashboardView};
