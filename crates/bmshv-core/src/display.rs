//! Display sink interface
//!
//! The engine never talks to a GUI toolkit. Front-ends implement
//! [`DisplaySink`] and receive already formatted values, addressed by
//! [`FieldId`] and [`TableId`].

use crate::aggregation::Matrix;
use std::fmt;

/// Single-value display elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    ConnectionStatus,
    Timestamp,
    Current,
    AccVoltage,
    CarVoltage,
    ChargingStatus,
    BalanceStatus,
    MaxTemperature,
    CellMaxVoltage,
    CellMaxVoltageLtc,
    CellMaxVoltageCell,
    CellMinVoltage,
    CellMinVoltageLtc,
    CellMinVoltageCell,
}

impl FieldId {
    /// Caption shown next to the value
    pub fn caption(&self) -> &'static str {
        match self {
            Self::ConnectionStatus => "Connection Status",
            Self::Timestamp => "Timestamp",
            Self::Current => "Current",
            Self::AccVoltage => "Acc Voltage",
            Self::CarVoltage => "Car Voltage",
            Self::ChargingStatus => "Charging Status",
            Self::BalanceStatus => "Balance Status",
            Self::MaxTemperature => "Max Temp",
            Self::CellMaxVoltage => "Max Voltage",
            Self::CellMaxVoltageLtc => "Max Voltage LTC",
            Self::CellMaxVoltageCell => "Max Voltage Cell",
            Self::CellMinVoltage => "Min Voltage",
            Self::CellMinVoltageLtc => "Min Voltage LTC",
            Self::CellMinVoltageCell => "Min Voltage Cell",
        }
    }

    /// Unit shown after the value, if any
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Timestamp => Some("s"),
            Self::Current => Some("A"),
            Self::AccVoltage | Self::CarVoltage => Some("V"),
            Self::CellMaxVoltage | Self::CellMinVoltage => Some("V"),
            Self::MaxTemperature => Some("°C"),
            _ => None,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.caption())
    }
}

/// Table display elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableId {
    CellVoltage,
    Temperature,
    Soc,
    Faults,
}

impl TableId {
    /// Frame title
    pub fn title(&self) -> &'static str {
        match self {
            Self::CellVoltage => "Cell Voltages",
            Self::Temperature => "Temperatures",
            Self::Soc => "Soc",
            Self::Faults => "Errors",
        }
    }

    /// Column headings for a table `columns` wide
    pub fn headings(&self, columns: usize) -> Vec<String> {
        match self {
            Self::CellVoltage => (0..columns).map(|j| format!("LTC {}", j)).collect(),
            Self::Temperature => (0..columns).map(|j| format!("Col {}", j + 1)).collect(),
            Self::Soc => ["Min", "Max", "Avg", "Median"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            Self::Faults => vec!["Error".to_string(), "Value".to_string()],
        }
    }

    /// Whether row numbers are shown in front of each row
    pub fn numbered_rows(&self) -> bool {
        matches!(self, Self::CellVoltage | Self::Temperature)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Receiver of rendered telemetry
///
/// Implementations update whatever widgets they own. Calls arrive on the
/// control context only, one render pass at a time.
pub trait DisplaySink {
    /// Replace the text of a single-value element
    fn set_status(&mut self, field: FieldId, text: &str);

    /// Replace the contents of a table
    fn set_table(&mut self, table: TableId, rows: &Matrix<String>);

    /// Called once after every render pass
    fn refresh(&mut self) {}
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn set_status(&mut self, field: FieldId, text: &str) {
        (**self).set_status(field, text)
    }

    fn set_table(&mut self, table: TableId, rows: &Matrix<String>) {
        (**self).set_table(table, rows)
    }

    fn refresh(&mut self) {
        (**self).refresh()
    }
}
