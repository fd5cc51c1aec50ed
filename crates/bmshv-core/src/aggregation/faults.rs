//! Fault table projection

use crate::data::{FaultKind, FaultReport};

/// Text shown in both columns of an inactive fault row
pub const PLACEHOLDER: &str = "-";

/// One row of the fault table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultRow {
    pub label: String,
    pub detail: String,
}

impl FaultRow {
    fn placeholder() -> Self {
        Self {
            label: PLACEHOLDER.to_string(),
            detail: PLACEHOLDER.to_string(),
        }
    }

    /// Row as table cells
    pub fn to_cells(&self) -> Vec<String> {
        vec![self.label.clone(), self.detail.clone()]
    }
}

/// Fixed-size fault table, one row per category
///
/// Triggered categories show their label and detail; the others show
/// placeholders. The current-sensor detail is always reported as
/// `Disconnected`, the firmware's second element carries no location there.
pub fn fault_rows(report: &FaultReport) -> [FaultRow; 6] {
    FaultKind::ALL.map(|kind| {
        let pair = report.get(kind);
        if !pair.triggered {
            return FaultRow::placeholder();
        }

        let detail = match kind {
            FaultKind::CurrentSensorDisconnected => "Disconnected".to_string(),
            _ => pair.detail.to_string(),
        };
        FaultRow {
            label: kind.label().to_string(),
            detail,
        }
    })
}
