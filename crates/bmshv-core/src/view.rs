//! Dashboard view
//!
//! Combines the aggregation helpers into the complete set of formatted values
//! a front-end shows for one snapshot, and pushes them into a
//! [`DisplaySink`].

use crate::aggregation::{
    fault_rows, fit_to_geometry, locate_in_matrix, mark_flag, max, min, min_max_avg_median,
    FaultRow, Matrix, Summary, PLACEHOLDER,
};
use crate::config::MonitorConfig;
use crate::data::TelemetrySnapshot;
use crate::display::{DisplaySink, FieldId, TableId};
use crate::error::AggregationError;

/// Decimal places used for the timestamp in seconds
const TIMESTAMP_PRECISION: usize = 3;

/// Format a measured value with a fixed number of decimals
pub fn format_value(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

fn on_off(flag: Option<bool>) -> String {
    match flag {
        Some(true) => "On".to_string(),
        Some(false) => "Off".to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// A cell voltage extreme and where it sits in the cell table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellExtreme {
    pub voltage: f64,
    /// Table column, one LTC monitor chip per column
    pub ltc: usize,
    /// Table row, the cell's position on its LTC
    pub cell: usize,
}

/// Everything shown for one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Single-value fields in display order
    pub status: Vec<(FieldId, String)>,
    /// Formatted cell voltage table, discharge markers applied
    pub cells: Matrix<String>,
    /// Formatted temperature table
    pub temperatures: Matrix<String>,
    /// State of charge statistics as fractions
    pub soc: Summary,
    /// State of charge row in percent
    pub soc_table: Matrix<String>,
    pub max_cell: CellExtreme,
    pub min_cell: CellExtreme,
    pub max_temperature: f64,
    /// Fault table, when the front-end shows one and the snapshot carries faults
    pub faults: Option<[FaultRow; 6]>,
}

impl DashboardView {
    /// Text of a status field
    pub fn field(&self, id: FieldId) -> Option<&str> {
        self.status
            .iter()
            .find(|(field, _)| *field == id)
            .map(|(_, text)| text.as_str())
    }

    /// Fault table as rows of cells
    pub fn fault_table(&self) -> Option<Matrix<String>> {
        self.faults
            .as_ref()
            .map(|rows| rows.iter().map(FaultRow::to_cells).collect())
    }
}

/// Derive the dashboard view of a snapshot
///
/// Fails when the snapshot does not fit the configured geometry or an array
/// that statistics are computed over is empty.
pub fn build_view(
    snapshot: &TelemetrySnapshot,
    config: &MonitorConfig,
) -> Result<DashboardView, AggregationError> {
    let precision = config.display.float_precision;
    let order = config.pack.order;

    let cell_values = fit_to_geometry(
        "cell_voltage",
        &snapshot.cell_voltage,
        config.pack.cells,
        order,
    )?;

    let discharge = match (&snapshot.discharge, config.features.has_discharge_marking) {
        (Some(flags), true) => {
            fit_to_geometry("discharge", flags, config.pack.cells, order)?
        }
        _ => vec![vec![false; config.pack.cells.columns]; config.pack.cells.rows],
    };

    let cells = cell_values
        .iter()
        .zip(discharge.iter())
        .map(|(values, flags)| {
            values
                .iter()
                .zip(flags.iter())
                .map(|(value, flagged)| {
                    mark_flag(
                        &format_value(*value, precision),
                        *flagged,
                        &config.display.discharge_marker_prefix,
                        &config.display.discharge_marker_suffix,
                    )
                })
                .collect()
        })
        .collect();

    let extreme = |voltage: f64| -> Result<CellExtreme, AggregationError> {
        let (row, column) = locate_in_matrix(&cell_values, voltage)?;
        Ok(CellExtreme {
            voltage,
            ltc: column,
            cell: row,
        })
    };
    let max_cell = extreme(max(&snapshot.cell_voltage)?)?;
    let min_cell = extreme(min(&snapshot.cell_voltage)?)?;

    let temperatures = fit_to_geometry(
        "temperature",
        &snapshot.temperature,
        config.pack.temperatures,
        order,
    )?
    .into_iter()
    .map(|row| row.into_iter().map(|v| format_value(v, precision)).collect())
    .collect();
    let max_temperature = max(&snapshot.temperature)?;

    let soc = min_max_avg_median(&snapshot.soc)?;
    let soc_table = vec![soc
        .map(|fraction| fraction * 100.0)
        .to_array()
        .iter()
        .map(|v| format_value(*v, precision))
        .collect()];

    let faults = if config.features.has_fault_table {
        snapshot.faults.as_ref().map(fault_rows)
    } else {
        None
    };

    let timestamp = snapshot
        .timestamp_secs()
        .map(|secs| format_value(secs, TIMESTAMP_PRECISION))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let status = vec![
        (FieldId::Timestamp, timestamp),
        (FieldId::Current, format_value(snapshot.current, precision)),
        (FieldId::AccVoltage, format_value(snapshot.acc_voltage, precision)),
        (FieldId::CarVoltage, format_value(snapshot.car_voltage, precision)),
        (FieldId::ChargingStatus, on_off(snapshot.charging)),
        (FieldId::BalanceStatus, on_off(snapshot.balance)),
        (FieldId::MaxTemperature, format_value(max_temperature, precision)),
        (FieldId::CellMaxVoltage, format_value(max_cell.voltage, precision)),
        (FieldId::CellMaxVoltageLtc, max_cell.ltc.to_string()),
        (FieldId::CellMaxVoltageCell, max_cell.cell.to_string()),
        (FieldId::CellMinVoltage, format_value(min_cell.voltage, precision)),
        (FieldId::CellMinVoltageLtc, min_cell.ltc.to_string()),
        (FieldId::CellMinVoltageCell, min_cell.cell.to_string()),
    ];

    Ok(DashboardView {
        status,
        cells,
        temperatures,
        soc,
        soc_table,
        max_cell,
        min_cell,
        max_temperature,
        faults,
    })
}

/// Push a view into a display sink and refresh it
pub fn render<S: DisplaySink + ?Sized>(view: &DashboardView, sink: &mut S) {
    for (field, text) in &view.status {
        sink.set_status(*field, text);
    }

    sink.set_table(TableId::CellVoltage, &view.cells);
    sink.set_table(TableId::Temperature, &view.temperatures);
    sink.set_table(TableId::Soc, &view.soc_table);
    if let Some(faults) = view.fault_table() {
        sink.set_table(TableId::Faults, &faults);
    }

    sink.refresh();
}
