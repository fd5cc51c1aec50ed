use bmshv_core::aggregation::{
    fault_rows, fit_to_geometry, flatten, locate_extreme, min_max_avg_median, reshape,
    reshape_column_major, PLACEHOLDER,
};
use bmshv_core::config::{FillOrder, TableGeometry};
use bmshv_core::{AggregationError, FaultDetail, FaultPair, FaultReport};
use proptest::prelude::*;

#[test]
fn test_reshape_row_major() {
    let matrix = reshape(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
    assert_eq!(matrix, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
}

#[test]
fn test_fit_to_geometry_rejects_wrong_length() {
    let err = fit_to_geometry(
        "cell_voltage",
        &[1.0; 5],
        TableGeometry::new(2, 2),
        FillOrder::RowMajor,
    )
    .unwrap_err();
    assert_eq!(
        err,
        AggregationError::GeometryMismatch {
            field: "cell_voltage",
            expected: 4,
            actual: 5
        }
    );
}

#[test]
fn test_fit_to_geometry_column_major() {
    let matrix = fit_to_geometry(
        "temperature",
        &[1, 2, 3, 4, 5, 6],
        TableGeometry::new(2, 3),
        FillOrder::ColumnMajor,
    )
    .unwrap();
    assert_eq!(matrix, vec![vec![1, 3, 5], vec![2, 4, 6]]);
}

#[test]
fn test_locate_extreme_first_occurrence() {
    let values = [3.1, 4.2, 4.2, 2.9];
    assert_eq!(locate_extreme(&values, 4.2, 2).unwrap(), (0, 1));
    assert_eq!(locate_extreme(&values, 2.9, 2).unwrap(), (1, 1));
    assert_eq!(
        locate_extreme(&values, 5.0, 2),
        Err(AggregationError::NotFound { target: 5.0 })
    );
}

#[test]
fn test_soc_summary() {
    let summary = min_max_avg_median(&[0.5, 0.6]).unwrap();
    assert_eq!(summary.min, 0.5);
    assert_eq!(summary.max, 0.6);
    assert!((summary.avg - 0.55).abs() < 1e-12);
    assert!((summary.median - 0.55).abs() < 1e-12);
}

fn pair(triggered: bool, detail: FaultDetail) -> FaultPair {
    FaultPair { triggered, detail }
}

#[test]
fn test_fault_rows() {
    let report = FaultReport {
        under_voltage: pair(false, FaultDetail::Index(0)),
        over_voltage: pair(true, FaultDetail::Index(17)),
        under_temperature: pair(false, FaultDetail::Index(0)),
        over_temperature: pair(true, FaultDetail::Value(61.5)),
        over_current: pair(false, FaultDetail::Index(0)),
        current_sensor_disconnected: pair(true, FaultDetail::Index(0)),
    };
    let rows = fault_rows(&report);

    assert_eq!(rows[0].label, PLACEHOLDER);
    assert_eq!(rows[0].detail, PLACEHOLDER);
    assert_eq!(rows[1].label, "Over Voltage");
    assert_eq!(rows[1].detail, "17");
    assert_eq!(rows[3].detail, "61.5");
    assert_eq!(rows[5].to_cells(), vec!["Current Sensor", "Disconnected"]);
}

proptest! {
    #[test]
    fn prop_reshape_then_flatten_is_identity(
        rows in 1usize..12,
        columns in 1usize..16,
        seed in proptest::collection::vec(-10.0f64..10.0, 192),
    ) {
        let flat: Vec<f64> = seed.into_iter().take(rows * columns).collect();
        prop_assume!(flat.len() == rows * columns);

        let matrix = reshape(&flat, columns).unwrap();
        prop_assert_eq!(matrix.len(), rows);
        prop_assert!(matrix.iter().all(|row| row.len() == columns));
        prop_assert_eq!(flatten(&matrix), flat.clone());

        let transposed = reshape_column_major(&flat, rows).unwrap();
        prop_assert_eq!(transposed.len(), rows);
        for (i, value) in flat.iter().enumerate() {
            prop_assert_eq!(transposed[i % rows][i / rows], *value);
        }
    }

    #[test]
    fn prop_summary_is_ordered(values in proptest::collection::vec(-1.0e6f64..1.0e6, 1..64)) {
        let summary = min_max_avg_median(&values).unwrap();
        prop_assert!(summary.min <= summary.avg);
        prop_assert!(summary.avg <= summary.max);
        prop_assert!(summary.min <= summary.median);
        prop_assert!(summary.median <= summary.max);
    }
}
