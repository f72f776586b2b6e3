//! Tail-risk estimation over simulated portfolio values.
//!
//! Provides empirical percentiles, VaR, CVaR and distribution summaries.
//!
//! VaR and CVaR are measured from the sample mean, not from the initial
//! investment: `VaR = mean - percentile` and `CVaR = mean - mean(tail)`, where
//! the tail is every value at or below the `(1 - confidence) * 100`-th
//! percentile. Callers who want loss relative to the starting capital must
//! subtract it separately.

mod summary;

pub use summary::ValueSummary;

use crate::types::RiskStatistics;
use crate::{Error, Result};

/// Calculate the `q`-th percentile of `values` (`q` in `[0, 100]`).
///
/// Uses linear interpolation between order statistics: for sorted values
/// `x[0..n]` the target rank is `q / 100 * (n - 1)`, and a fractional rank
/// interpolates between the two neighbouring values.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `values` is empty or contains a
/// non-finite value, or if `q` is outside `[0, 100]`.
pub fn percentile(values: &[f64], q: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&q) {
        return Err(Error::InvalidParameter(format!(
            "percentile must be within [0, 100], got {}",
            q
        )));
    }
    let sorted = sorted_values(values)?;
    Ok(interpolate(&sorted, q))
}

/// Calculate Value at Risk relative to the mean.
///
/// # Arguments
///
/// * `values` - Portfolio values, typically the final day across all paths
/// * `confidence_level` - Confidence level in `(0, 1)` (e.g., 0.95)
///
/// # Returns
///
/// `mean(values) - percentile(values, (1 - confidence_level) * 100)`. Positive
/// when the tail lies below the mean.
pub fn value_at_risk(values: &[f64], confidence_level: f64) -> Result<f64> {
    validate_confidence(confidence_level)?;
    let sorted = sorted_values(values)?;
    let threshold = interpolate(&sorted, tail_percentile(confidence_level));
    Ok(mean(&sorted) - threshold)
}

/// Calculate Conditional Value at Risk (Expected Shortfall) relative to the mean.
///
/// Averages every value at or below the VaR percentile threshold and reports
/// `mean(values) - mean(tail)`. Never smaller than [`value_at_risk`] for the
/// same input.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` for empty or non-finite input or a
/// confidence level outside `(0, 1)`, and `Error::InsufficientData` if no value
/// falls at or below the threshold.
pub fn conditional_value_at_risk(values: &[f64], confidence_level: f64) -> Result<f64> {
    Ok(risk_statistics(values, confidence_level)?.cvar)
}

/// Calculate VaR and CVaR together with a single sort.
pub fn risk_statistics(values: &[f64], confidence_level: f64) -> Result<RiskStatistics> {
    validate_confidence(confidence_level)?;
    let sorted = sorted_values(values)?;

    let threshold = interpolate(&sorted, tail_percentile(confidence_level));
    let mean = mean(&sorted);

    // Sorted ascending, so the tail is a prefix
    let tail_len = sorted.partition_point(|&v| v <= threshold);
    if tail_len == 0 {
        return Err(Error::InsufficientData(format!(
            "no values at or below the {:.4} threshold",
            threshold
        )));
    }
    let var = mean - threshold;

    // Average shortfall below the threshold; every term is non-negative, so
    // adding it to VaR can never produce CVaR < VaR.
    let k = tail_len as f64;
    let excess = sorted[..tail_len]
        .iter()
        .map(|v| threshold / k - v / k)
        .sum::<f64>();

    tracing::debug!(
        samples = sorted.len(),
        tail = tail_len,
        threshold,
        confidence_level,
        "computed tail statistics"
    );

    Ok(RiskStatistics {
        confidence_level,
        var,
        cvar: var + excess,
    })
}

fn validate_confidence(confidence_level: f64) -> Result<()> {
    if confidence_level > 0.0 && confidence_level < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "confidence level must be in (0, 1), got {}",
            confidence_level
        )))
    }
}

fn tail_percentile(confidence_level: f64) -> f64 {
    (1.0 - confidence_level) * 100.0
}

/// Copy and sort `values`, rejecting empty or non-finite input.
fn sorted_values(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(Error::InvalidParameter(
            "values must be non-empty".to_string(),
        ));
    }
    if let Some(bad) = values.iter().position(|v| !v.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "value at index {} is not finite: {}",
            bad, values[bad]
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

/// Linear interpolation between order statistics of a sorted, non-empty slice.
///
/// The result always lies within `[sorted[lo], sorted[hi]]`, including when
/// the two neighbours are more than `f64::MAX` apart.
fn interpolate(sorted: &[f64], q: f64) -> f64 {
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (rank.ceil() as usize).min(sorted.len() - 1);
    let (below, above) = (sorted[lo], sorted[hi]);
    if lo == hi || below == above {
        return below;
    }

    let w = rank - lo as f64;
    let span = above - below;
    let value = if span.is_finite() {
        below + w * span
    } else {
        below * (1.0 - w) + above * w
    };
    value.clamp(below, above)
}

/// Mean of a sorted, non-empty slice.
///
/// Offset from the minimum so constant input averages to itself exactly.
/// Each term is scaled before summing to keep the total finite.
fn mean(sorted: &[f64]) -> f64 {
    let n = sorted.len() as f64;
    let base = sorted[0];
    base + sorted.iter().map(|v| v / n - base / n).sum::<f64>()
}
