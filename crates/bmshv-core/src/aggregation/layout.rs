//! Table layout helpers
//!
//! The BMS streams cell voltages and temperatures as flat arrays; the display
//! shows them as tables. Reshaping rejects lengths that do not divide evenly
//! instead of padding.

use crate::config::{FillOrder, TableGeometry};
use crate::error::AggregationError;

/// Row-major table of values
pub type Matrix<T> = Vec<Vec<T>>;

/// Split `flat` into rows of `columns` values
pub fn reshape<T: Clone>(flat: &[T], columns: usize) -> Result<Matrix<T>, AggregationError> {
    if columns == 0 || flat.len() % columns != 0 {
        return Err(AggregationError::Shape {
            len: flat.len(),
            group: columns,
        });
    }

    Ok(flat.chunks(columns).map(<[T]>::to_vec).collect())
}

/// Split `flat` into columns of `rows` values
///
/// Value `i` lands at row `i % rows`, column `i / rows`.
pub fn reshape_column_major<T: Clone>(
    flat: &[T],
    rows: usize,
) -> Result<Matrix<T>, AggregationError> {
    if rows == 0 || flat.len() % rows != 0 {
        return Err(AggregationError::Shape {
            len: flat.len(),
            group: rows,
        });
    }

    let columns = flat.len() / rows;
    Ok((0..rows)
        .map(|row| {
            (0..columns)
                .map(|column| flat[column * rows + row].clone())
                .collect()
        })
        .collect())
}

/// Concatenate the rows of a matrix
pub fn flatten<T: Clone>(matrix: &[Vec<T>]) -> Vec<T> {
    matrix.concat()
}

/// Reshape a telemetry array into a table of the configured geometry
pub fn fit_to_geometry<T: Clone>(
    field: &'static str,
    flat: &[T],
    geometry: TableGeometry,
    order: FillOrder,
) -> Result<Matrix<T>, AggregationError> {
    if flat.len() != geometry.len() {
        return Err(AggregationError::GeometryMismatch {
            field,
            expected: geometry.len(),
            actual: flat.len(),
        });
    }

    match order {
        FillOrder::RowMajor => reshape(flat, geometry.columns),
        FillOrder::ColumnMajor => reshape_column_major(flat, geometry.rows),
    }
}

/// First `(row, column)` in row-major order holding `target`
pub fn locate_in_matrix(
    matrix: &[Vec<f64>],
    target: f64,
) -> Result<(usize, usize), AggregationError> {
    matrix
        .iter()
        .enumerate()
        .find_map(|(row, values)| {
            values
                .iter()
                .position(|v| *v == target)
                .map(|column| (row, column))
        })
        .ok_or(AggregationError::NotFound { target })
}

/// Position of `target` once `values` is reshaped into rows of `columns`
///
/// Ties resolve to the first occurrence in row-major order.
pub fn locate_extreme(
    values: &[f64],
    target: f64,
    columns: usize,
) -> Result<(usize, usize), AggregationError> {
    let matrix = reshape(values, columns)?;
    locate_in_matrix(&matrix, target)
}

/// Wrap a formatted value in markers when its flag is set
pub fn mark_flag(formatted: &str, flagged: bool, prefix: &str, suffix: &str) -> String {
    if flagged {
        format!("{}{}{}", prefix, formatted, suffix)
    } else {
        formatted.to_string()
    }
}
