//! Distribution summary of simulated values.

use super::{interpolate, mean, sorted_values};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Descriptive statistics for a vector of simulated portfolio values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValueSummary {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (zero for a single value)
    pub std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// 5th percentile
    pub p5: f64,
    /// Median
    pub median: f64,
    /// 95th percentile
    pub p95: f64,
    /// Value the loss probability is measured against
    pub reference_value: f64,
    /// Fraction of values strictly below `reference_value`
    pub loss_probability: f64,
}

impl ValueSummary {
    /// Summarize `values`, measuring losses against `reference_value`
    /// (usually the initial investment).
    pub fn from_values(values: &[f64], reference_value: f64) -> Result<Self> {
        let sorted = sorted_values(values)?;
        let n = sorted.len();
        let mean = mean(&sorted);

        let std_dev = if n > 1 {
            let variance =
                sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        let below = sorted.partition_point(|&v| v < reference_value);

        Ok(Self {
            count: n,
            mean,
            std_dev,
            min: sorted[0],
            max: sorted[n - 1],
            p5: interpolate(&sorted, 5.0),
            median: interpolate(&sorted, 50.0),
            p95: interpolate(&sorted, 95.0),
            reference_value,
            loss_probability: below as f64 / n as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_summary_of_known_values() {
        let values: Vec<f64> = (1..=5).map(|v| f64::from(v) * 100.0).collect();
        let summary = ValueSummary::from_values(&values, 250.0).unwrap();

        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, 300.0);
        assert_eq!(summary.min, 100.0);
        assert_eq!(summary.max, 500.0);
        assert_eq!(summary.median, 300.0);
        // rank 0.2 -> 100 + 0.2 * 100
        assert_abs_diff_eq!(summary.p5, 120.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.p95, 480.0, epsilon = 1e-9);
        // sample variance = (4 + 1 + 0 + 1 + 4) * 100^2 / 4
        assert_abs_diff_eq!(summary.std_dev, 25_000.0_f64.sqrt(), epsilon = 1e-9);
        // 100 and 200 lie below 250
        assert_eq!(summary.loss_probability, 0.4);
    }

    #[test]
    fn test_single_value_summary() {
        let summary = ValueSummary::from_values(&[1000.0], 1000.0).unwrap();
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.p5, 1000.0);
        assert_eq!(summary.p95, 1000.0);
        // Equal to the reference is not a loss
        assert_eq!(summary.loss_probability, 0.0);
    }

    #[test]
    fn test_summary_rejects_empty() {
        assert!(matches!(
            ValueSummary::from_values(&[], 1.0),
            Err(Error::InvalidParameter(_))
        ));
    }
}
