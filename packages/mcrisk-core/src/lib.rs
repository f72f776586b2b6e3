//! mcrisk Core - Monte Carlo portfolio simulation and tail-risk library.
//!
//! This crate provides the simulation-and-risk pipeline:
//!
//! - **Return generation**: Normal daily returns from annualized drift/volatility
//! - **Path compounding**: Portfolio value trajectories from a returns matrix
//! - **Risk estimation**: VaR and CVaR over simulated portfolio values
//! - **Scenarios**: Named parameter sets, a pipeline runner and report export
//!
//! # Example
//!
//! ```rust
//! use mcrisk_core::{compound, conditional_value_at_risk, generate_returns, value_at_risk};
//!
//! let returns = generate_returns(0.10, 0.10, 252, 500, Some(42)).unwrap();
//! let values = compound(&returns, 10_000.0).unwrap();
//!
//! let final_values = values.last_row();
//! let var = value_at_risk(&final_values, 0.95).unwrap();
//! let cvar = conditional_value_at_risk(&final_values, 0.95).unwrap();
//! assert!(cvar >= var);
//! ```

pub mod matrix;
pub mod report;
pub mod risk;
pub mod scenario;
pub mod simulation;
pub mod types;

// Re-export commonly used types
pub use matrix::Matrix;
pub use types::{ApiResponse, RiskStatistics, SimulationParams};

// Re-export main functionality
pub use report::{write_csv_report, write_json_report};
pub use risk::{
    conditional_value_at_risk, percentile, risk_statistics, value_at_risk, ValueSummary,
};
pub use scenario::{
    get_scenario, list_scenarios, run_scenario, run_scenarios, RunConfig, Scenario, ScenarioBook,
    ScenarioReport, ScenarioRun, BUILTIN_SCENARIOS,
};
pub use simulation::{
    compound, generate_returns, generate_returns_partitioned, generate_returns_with,
    ReturnSource, TRADING_DAYS_PER_YEAR,
};

/// Error types for mcrisk-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

/// Result type for mcrisk-core operations.
pub type Result<T> = std::result::Result<T, Error>;
