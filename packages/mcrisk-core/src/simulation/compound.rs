//! Path compounding from daily returns to portfolio values.

use crate::matrix::Matrix;
use crate::{Error, Result};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Paths below this count are compounded on the calling thread.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_PATHS: usize = 256;

/// Compound a returns matrix into portfolio values.
///
/// For each path, value at day `t` is
/// `initial_investment * (1 + r[0]) * ... * (1 + r[t])`. Row 0 already
/// reflects one day of return; the uninvested starting capital is not a row.
///
/// Returns at or below -100% are not clamped, so values can reach zero or go
/// negative.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `initial_investment` is not a finite
/// positive number or `returns` is empty in either dimension.
pub fn compound(returns: &Matrix, initial_investment: f64) -> Result<Matrix> {
    if !initial_investment.is_finite() || initial_investment <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "initial investment must be positive, got {}",
            initial_investment
        )));
    }
    if returns.is_empty() {
        return Err(Error::InvalidParameter(format!(
            "returns matrix must be non-empty, got {} x {}",
            returns.rows(),
            returns.cols()
        )));
    }

    let (days, paths) = returns.shape();
    tracing::debug!(days, paths, initial_investment, "compounding paths");

    #[cfg(feature = "parallel")]
    let data = if paths >= PARALLEL_MIN_PATHS {
        compound_by_path(returns, initial_investment)
    } else {
        compound_by_day(returns, initial_investment)
    };
    #[cfg(not(feature = "parallel"))]
    let data = compound_by_day(returns, initial_investment);

    let non_positive = data.iter().filter(|&&v| v <= 0.0).count();
    if non_positive > 0 {
        tracing::warn!(
            non_positive,
            "compounded values at or below zero; returns of -100% or worse are not clamped"
        );
    }

    Matrix::from_vec(days, paths, data)
}

/// Row-major sweep keeping one running growth factor per path.
fn compound_by_day(returns: &Matrix, initial_investment: f64) -> Vec<f64> {
    let mut growth = vec![1.0; returns.cols()];
    let mut data = Vec::with_capacity(returns.as_slice().len());

    for row in returns.iter_rows() {
        for (factor, &r) in growth.iter_mut().zip(row) {
            *factor *= 1.0 + r;
            data.push(initial_investment * *factor);
        }
    }

    data
}

/// Compound each path on the rayon pool, then lay the columns back out row-major.
#[cfg(feature = "parallel")]
fn compound_by_path(returns: &Matrix, initial_investment: f64) -> Vec<f64> {
    let (days, paths) = returns.shape();
    let source = returns.as_slice();

    let columns: Vec<Vec<f64>> = (0..paths)
        .into_par_iter()
        .map(|s| {
            let mut factor = 1.0;
            (0..days)
                .map(|t| {
                    factor *= 1.0 + source[t * paths + s];
                    initial_investment * factor
                })
                .collect()
        })
        .collect();

    let mut data = Vec::with_capacity(days * paths);
    for t in 0..days {
        data.extend(columns.iter().map(|column| column[t]));
    }
    data
}
