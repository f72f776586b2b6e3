//! Core data types for the simulation pipeline.

use crate::simulation::TRADING_DAYS_PER_YEAR;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters that fully determine a returns matrix for a given random stream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimulationParams {
    /// Annualized expected return (e.g., 0.10 for 10%)
    pub mu: f64,
    /// Annualized volatility, must be non-negative
    pub sigma: f64,
    /// Number of trading days to simulate
    pub days: usize,
    /// Number of independent paths
    pub simulations: usize,
    /// Seed for reproducible output; `None` draws from OS entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SimulationParams {
    /// Create a new parameter set.
    pub fn new(mu: f64, sigma: f64, days: usize, simulations: usize, seed: Option<u64>) -> Self {
        Self {
            mu,
            sigma,
            days,
            simulations,
            seed,
        }
    }

    /// Check that every field is inside its domain.
    pub fn validate(&self) -> Result<()> {
        if self.days == 0 {
            return Err(Error::InvalidParameter(
                "days must be greater than zero".to_string(),
            ));
        }
        if self.simulations == 0 {
            return Err(Error::InvalidParameter(
                "simulations must be greater than zero".to_string(),
            ));
        }
        if !self.mu.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "mu must be finite, got {}",
                self.mu
            )));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "sigma must be finite and non-negative, got {}",
                self.sigma
            )));
        }
        Ok(())
    }

    /// Mean of a single day's return.
    pub fn daily_mean(&self) -> f64 {
        self.mu / TRADING_DAYS_PER_YEAR
    }

    /// Standard deviation of a single day's return.
    pub fn daily_std(&self) -> f64 {
        self.sigma / TRADING_DAYS_PER_YEAR.sqrt()
    }
}

/// Tail-risk statistics for one value vector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskStatistics {
    /// Confidence level (e.g., 0.95 for 95%)
    pub confidence_level: f64,
    /// Value at Risk measured from the mean
    pub var: f64,
    /// Conditional VaR (Expected Shortfall) measured from the mean
    pub cvar: f64,
}

/// API response wrapper for success cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
