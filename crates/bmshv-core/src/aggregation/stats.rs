//! Summary statistics over telemetry arrays

use crate::error::AggregationError;

/// Minimum, maximum, average and median of a sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
}

impl Summary {
    /// Apply `f` to every statistic
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            min: f(self.min),
            max: f(self.max),
            avg: f(self.avg),
            median: f(self.median),
        }
    }

    /// Statistics in table order: min, max, avg, median
    pub fn to_array(self) -> [f64; 4] {
        [self.min, self.max, self.avg, self.median]
    }
}

/// Smallest value
pub fn min(values: &[f64]) -> Result<f64, AggregationError> {
    values
        .iter()
        .copied()
        .reduce(f64::min)
        .ok_or(AggregationError::EmptyInput)
}

/// Largest value
pub fn max(values: &[f64]) -> Result<f64, AggregationError> {
    values
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or(AggregationError::EmptyInput)
}

/// Middle value, or the mean of the two middle values for even lengths
pub fn median(values: &[f64]) -> Result<f64, AggregationError> {
    if values.is_empty() {
        return Err(AggregationError::EmptyInput);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Compute all four statistics in one call
///
/// The average is clamped into `[min, max]`; summing can round a mean of
/// equal values just outside the range. Non-finite input is rejected.
pub fn min_max_avg_median(values: &[f64]) -> Result<Summary, AggregationError> {
    if !values.iter().all(|v| v.is_finite()) {
        return Err(AggregationError::NonFinite);
    }

    let min = min(values)?;
    let max = max(values)?;
    let avg = (values.iter().sum::<f64>() / values.len() as f64).clamp(min, max);
    let median = median(values)?;

    Ok(Summary {
        min,
        max,
        avg,
        median,
    })
}
