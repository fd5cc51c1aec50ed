//! # BMS HV Utility
//!
//! Monitoring and control utility for the BMS HV battery management unit.
//! The BMS streams one JSON telemetry line per cycle over a serial link; the
//! utility shows it as a dashboard and sends charge and balance commands back.
//!
//! ## Architecture
//!
//! The workspace is split into three crates:
//!
//! 1. **bmshv-core** - telemetry model, decoder, aggregation, configuration
//! 2. **bmshv-communication** - serial link worker, reconnection, bounded queues
//! 3. **bmshv-ui** - control loop and console dashboard
//! 4. **bmshv** - this binary, wiring the three together

pub mod cli;

pub use bmshv_communication::{
    list_ports, LinkChannels, LinkStatus, LinkWorker, LinkWorkerHandle, SerialOpener, StopSignal,
};
pub use bmshv_core::{
    ConfigError, ConnectionError, DecodeError, Error, MonitorConfig, QueueError, Result,
    UserAction,
};
pub use bmshv_ui::{run_dashboard, ConsoleSink, ControlLoop};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout to the dashboard
/// - RUST_LOG environment variable support, `info` by default
/// - Target, thread name and line number on every event
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
