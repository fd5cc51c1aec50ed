//! Telemetry snapshot types
//!
//! A [`TelemetrySnapshot`] is built once per decoded line and never mutated.
//! It is handed to the aggregation engine by reference and dropped after the
//! render pass; no history is kept.

use std::fmt;

/// One fully decoded telemetry record
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    /// Pack current in amperes
    pub current: f64,
    /// Accumulator voltage in volts
    pub acc_voltage: f64,
    /// Car-side (tractive system) voltage in volts
    pub car_voltage: f64,
    /// Per-module state of charge, fraction 0..1
    pub soc: Vec<f64>,
    /// Flat cell voltages in firmware order
    pub cell_voltage: Vec<f64>,
    /// Flat temperature probe readings in degrees Celsius
    pub temperature: Vec<f64>,
    /// Per-cell discharge (balancing resistor) flags, when the firmware sends them
    pub discharge: Option<Vec<bool>>,
    /// Balancing enabled
    pub balance: Option<bool>,
    /// Charging enabled
    pub charging: Option<bool>,
    /// Fault pairs, when the firmware sends them
    pub faults: Option<FaultReport>,
    /// Firmware uptime in milliseconds
    pub timestamp_ms: Option<f64>,
}

impl TelemetrySnapshot {
    /// Firmware uptime in seconds
    pub fn timestamp_secs(&self) -> Option<f64> {
        self.timestamp_ms.map(|ms| ms / 1000.0)
    }

    /// Discharge flag for a cell, false when flags are absent
    pub fn is_discharging(&self, cell: usize) -> bool {
        self.discharge
            .as_ref()
            .and_then(|flags| flags.get(cell).copied())
            .unwrap_or(false)
    }
}

/// The six fault categories reported by the BMS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FaultKind {
    UnderVoltage,
    OverVoltage,
    UnderTemperature,
    OverTemperature,
    OverCurrent,
    CurrentSensorDisconnected,
}

impl FaultKind {
    /// All categories in fault-table order
    pub const ALL: [FaultKind; 6] = [
        FaultKind::UnderVoltage,
        FaultKind::OverVoltage,
        FaultKind::UnderTemperature,
        FaultKind::OverTemperature,
        FaultKind::OverCurrent,
        FaultKind::CurrentSensorDisconnected,
    ];

    /// Label shown in the fault table
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnderVoltage => "Under Voltage",
            Self::OverVoltage => "Over Voltage",
            Self::UnderTemperature => "Under Temperature",
            Self::OverTemperature => "Over Temperature",
            Self::OverCurrent => "Over Current",
            Self::CurrentSensorDisconnected => "Current Sensor",
        }
    }

    /// Telemetry field name on the wire
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::UnderVoltage => "under_voltage",
            Self::OverVoltage => "over_voltage",
            Self::UnderTemperature => "under_temperature",
            Self::OverTemperature => "over_temperature",
            Self::OverCurrent => "over_current",
            Self::CurrentSensorDisconnected => "current_sensor_disconnected",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Second element of a fault pair: where or how the fault occurred
#[derive(Debug, Clone, PartialEq)]
pub enum FaultDetail {
    /// Cell, probe or LTC index
    Index(i64),
    /// Measured value
    Value(f64),
    /// Free-form text
    Text(String),
}

impl fmt::Display for FaultDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{}", index),
            Self::Value(value) => write!(f, "{}", value),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

/// A `(triggered, detail)` fault pair
#[derive(Debug, Clone, PartialEq)]
pub struct FaultPair {
    pub triggered: bool,
    pub detail: FaultDetail,
}

/// All six fault pairs of a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct FaultReport {
    pub under_voltage: FaultPair,
    pub over_voltage: FaultPair,
    pub under_temperature: FaultPair,
    pub over_temperature: FaultPair,
    pub over_current: FaultPair,
    pub current_sensor_disconnected: FaultPair,
}

impl FaultReport {
    /// Pair for a category
    pub fn get(&self, kind: FaultKind) -> &FaultPair {
        match kind {
            FaultKind::UnderVoltage => &self.under_voltage,
            FaultKind::OverVoltage => &self.over_voltage,
            FaultKind::UnderTemperature => &self.under_temperature,
            FaultKind::OverTemperature => &self.over_temperature,
            FaultKind::OverCurrent => &self.over_current,
            FaultKind::CurrentSensorDisconnected => &self.current_sensor_disconnected,
        }
    }

    /// Categories whose trigger flag is set
    pub fn active(&self) -> impl Iterator<Item = FaultKind> + '_ {
        FaultKind::ALL
            .into_iter()
            .filter(move |kind| self.get(*kind).triggered)
    }
}
