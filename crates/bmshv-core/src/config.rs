//! Configuration for the BMS HV utility
//!
//! One [`MonitorConfig`] describes everything that differs between front-ends:
//! pack geometry, which optional tables are shown, link timing, queue
//! policies, display formatting and the command-token table.
//!
//! Configuration is organized into logical sections:
//! - Pack geometry (cell and temperature tables, fill order)
//! - Features (fault table, discharge marking)
//! - Link timing (cycle period, read timeout, reconnect back-off)
//! - Queues (capacities and overflow policies)
//! - Display (poll interval, precision, markers)
//! - Command tokens
//!
//! The default is the 9x15 HV pack with every feature enabled.

use crate::error::ConfigError;
use crate::protocol::CommandTokens;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rows and columns of one display table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGeometry {
    pub rows: usize,
    pub columns: usize,
}

impl TableGeometry {
    /// Create a geometry
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Number of values the table holds
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    /// Check whether the table holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Order in which the firmware streams a flat array relative to the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOrder {
    /// Consecutive values fill a row
    RowMajor,
    /// Consecutive values fill a column (one LTC after another)
    #[default]
    ColumnMajor,
}

/// Physical pack layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackGeometry {
    /// Cell voltage table
    pub cells: TableGeometry,
    /// Temperature probe table
    pub temperatures: TableGeometry,
    /// Fill order shared by both tables
    pub order: FillOrder,
}

impl Default for PackGeometry {
    fn default() -> Self {
        Self {
            cells: TableGeometry::new(9, 15),
            temperatures: TableGeometry::new(3, 15),
            order: FillOrder::ColumnMajor,
        }
    }
}

/// Optional tables and markings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    /// Show the fault table; telemetry must carry all six fault pairs
    pub has_fault_table: bool,
    /// Mark discharging cells; telemetry must carry `discharge`
    pub has_discharge_marking: bool,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            has_fault_table: true,
            has_discharge_marking: true,
        }
    }
}

/// Serial link timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSettings {
    /// Baud rate for the serial port
    pub baud_rate: u32,
    /// How often the BMS sends a telemetry line
    pub telemetry_interval_ms: u64,
    /// Line read timeout, must exceed the telemetry interval
    pub read_timeout_ms: u64,
    /// Minimum duration of one connected cycle
    pub cycle_period_ms: u64,
    /// Wait between failed open attempts
    pub reconnect_backoff_ms: u64,
    /// Send the keep-alive token every cycle
    pub keep_alive: bool,
    /// Discard the first (partial) line read after flushing input
    pub resync_after_flush: bool,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            telemetry_interval_ms: 250,
            read_timeout_ms: 450,
            cycle_period_ms: 250,
            reconnect_backoff_ms: 1000,
            keep_alive: true,
            resync_after_flush: true,
        }
    }
}

impl LinkSettings {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn cycle_period(&self) -> Duration {
        Duration::from_millis(self.cycle_period_ms)
    }

    pub fn reconnect_backoff(&self) -> Duration {
        Duration::from_millis(self.reconnect_backoff_ms)
    }
}

/// What a full bounded queue does with a new item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep what is queued, drop the new item
    DropNewest,
    /// Drop the oldest queued item, enqueue the new one
    DisplaceOldest,
}

/// Capacities and overflow policies of the two link queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    pub inbound_capacity: usize,
    pub outbound_capacity: usize,
    pub inbound_policy: OverflowPolicy,
    pub outbound_policy: OverflowPolicy,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            inbound_capacity: 1,
            outbound_capacity: 1,
            inbound_policy: OverflowPolicy::DisplaceOldest,
            outbound_policy: OverflowPolicy::DropNewest,
        }
    }
}

/// Display formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// How often the control loop polls for telemetry
    pub poll_interval_ms: u64,
    /// Decimal places for measured values
    pub float_precision: usize,
    /// Text placed before a discharging cell's value
    pub discharge_marker_prefix: String,
    /// Text placed after a discharging cell's value
    pub discharge_marker_suffix: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            float_precision: 4,
            discharge_marker_prefix: "#".to_string(),
            discharge_marker_suffix: "#".to_string(),
        }
    }
}

impl DisplaySettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Complete monitor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub pack: PackGeometry,
    pub features: FeatureSettings,
    pub link: LinkSettings,
    pub queues: QueueSettings,
    pub display: DisplaySettings,
    pub commands: CommandTokens,
}

impl MonitorConfig {
    /// Parse a configuration from TOML text
    ///
    /// Missing sections and keys take their default values. The result is
    /// validated before it is returned.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: MonitorConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        tracing::debug!(
            cells = config.pack.cells.len(),
            temperatures = config.pack.temperatures.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Serialize the configuration to TOML text
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every section for values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (table, geometry) in [
            ("cell voltage", self.pack.cells),
            ("temperature", self.pack.temperatures),
        ] {
            if geometry.rows == 0 || geometry.columns == 0 {
                return Err(ConfigError::InvalidGeometry {
                    table,
                    rows: geometry.rows,
                    columns: geometry.columns,
                });
            }
        }

        let link = &self.link;
        if link.read_timeout_ms <= link.telemetry_interval_ms {
            return Err(ConfigError::InvalidTiming {
                key: "read_timeout_ms",
                reason: format!(
                    "{}ms must be greater than the telemetry interval of {}ms",
                    link.read_timeout_ms, link.telemetry_interval_ms
                ),
            });
        }
        if link.reconnect_backoff_ms == 0 {
            return Err(ConfigError::InvalidTiming {
                key: "reconnect_backoff_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.display.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidTiming {
                key: "poll_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        for (queue, capacity) in [
            ("inbound", self.queues.inbound_capacity),
            ("outbound", self.queues.outbound_capacity),
        ] {
            if capacity == 0 {
                return Err(ConfigError::InvalidCapacity { queue, capacity });
            }
        }

        self.commands.validate()
    }
}
