//! End-to-end scenario runs: generate, compound, then measure tail risk.

use super::Scenario;
use crate::matrix::Matrix;
use crate::risk::{risk_statistics, ValueSummary};
use crate::simulation::{compound, generate_returns_partitioned, ReturnSource};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Settings shared by every scenario in a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Starting portfolio value
    pub initial_investment: f64,
    /// Trading days per path
    pub days: usize,
    /// Number of paths
    pub simulations: usize,
    /// Confidence level for VaR/CVaR
    pub confidence_level: f64,
    /// Seed applied to every scenario; `None` for non-reproducible runs
    pub seed: Option<u64>,
    /// Draw each path from its own sub-stream instead of one shared stream
    #[serde(default)]
    pub sub_streams: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            initial_investment: 10_000.0,
            days: 252,
            simulations: 500,
            confidence_level: 0.95,
            seed: Some(42),
            sub_streams: false,
        }
    }
}

impl RunConfig {
    /// Reject settings no stage could accept, before any sampling happens.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_investment.is_finite() || self.initial_investment <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "initial investment must be positive, got {}",
                self.initial_investment
            )));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "confidence level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        if self.days == 0 || self.simulations == 0 {
            return Err(Error::InvalidParameter(format!(
                "days and simulations must be positive, got {} x {}",
                self.days, self.simulations
            )));
        }
        Ok(())
    }
}

/// One record per scenario, ready for a report sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub scenario: String,
    /// Starting portfolio value
    pub initial_investment: f64,
    /// Annualized expected return
    pub mu: f64,
    /// Annualized volatility
    pub sigma: f64,
    /// Trading days simulated
    pub days: usize,
    /// Paths simulated
    pub simulations: usize,
    /// Confidence level used for VaR/CVaR
    pub confidence_level: f64,
    /// Seed, if the run was reproducible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Value at Risk of final values, measured from their mean
    pub var: f64,
    /// Conditional VaR of final values, measured from their mean
    pub cvar: f64,
    /// Distribution of final-day values
    pub final_values: ValueSummary,
    /// When the run finished
    pub generated_at: DateTime<Utc>,
}

/// Full output of a scenario run, including both matrices for plotting.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    /// Simulated daily returns (`days × simulations`)
    pub returns: Matrix,
    /// Portfolio values (`days × simulations`)
    pub values: Matrix,
    /// Summary record
    pub report: ScenarioReport,
}

/// Run the full pipeline for one scenario.
///
/// Risk statistics are computed over the final day's values across all paths.
pub fn run_scenario(scenario: &Scenario, config: &RunConfig) -> Result<ScenarioRun> {
    config.validate()?;
    scenario.validate()?;

    let params = scenario.params(config.days, config.simulations, config.seed);
    let returns = if config.sub_streams {
        generate_returns_partitioned(&params)?
    } else {
        ReturnSource::new(config.seed).generate(&params)?
    };
    let values = compound(&returns, config.initial_investment)?;

    let final_values = values.last_row();
    let stats = risk_statistics(&final_values, config.confidence_level)?;
    let summary = ValueSummary::from_values(&final_values, config.initial_investment)?;

    tracing::info!(
        scenario = %scenario.name,
        var = stats.var,
        cvar = stats.cvar,
        "scenario complete"
    );

    let report = ScenarioReport {
        scenario: scenario.name.clone(),
        initial_investment: config.initial_investment,
        mu: scenario.mu,
        sigma: scenario.sigma,
        days: config.days,
        simulations: config.simulations,
        confidence_level: stats.confidence_level,
        seed: config.seed,
        var: stats.var,
        cvar: stats.cvar,
        final_values: summary,
        generated_at: Utc::now(),
    };

    Ok(ScenarioRun {
        returns,
        values,
        report,
    })
}

/// Run several scenarios with the same settings, keeping only their reports.
///
/// Every scenario restarts from `config.seed`, so results do not depend on
/// the order scenarios are listed in.
pub fn run_scenarios(scenarios: &[Scenario], config: &RunConfig) -> Result<Vec<ScenarioReport>> {
    scenarios
        .iter()
        .map(|scenario| run_scenario(scenario, config).map(|run| run.report))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{get_scenario, list_scenarios};

    fn small_config() -> RunConfig {
        RunConfig {
            days: 60,
            simulations: 200,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_matches_reference_run() {
        let config = RunConfig::default();
        assert_eq!(config.initial_investment, 10_000.0);
        assert_eq!(config.days, 252);
        assert_eq!(config.simulations, 500);
        assert_eq!(config.confidence_level, 0.95);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_run_scenario_end_to_end() {
        let scenario = get_scenario("optimistic").unwrap();
        let run = run_scenario(&scenario, &RunConfig::default()).unwrap();

        assert_eq!(run.returns.shape(), (252, 500));
        assert_eq!(run.values.shape(), (252, 500));
        assert_eq!(run.report.scenario, "optimistic");
        assert_eq!(run.report.final_values.count, 500);
        assert!(run.report.cvar >= run.report.var);
    }

    #[test]
    fn test_run_scenario_is_reproducible() {
        let scenario = get_scenario("pessimistic").unwrap();
        let config = small_config();

        let a = run_scenario(&scenario, &config).unwrap();
        let b = run_scenario(&scenario, &config).unwrap();

        assert_eq!(a.values, b.values);
        assert_eq!(a.report.var, b.report.var);
        assert_eq!(a.report.cvar, b.report.cvar);
    }

    #[test]
    fn test_sub_streams_are_reproducible() {
        let scenario = get_scenario("optimistic").unwrap();
        let config = RunConfig {
            sub_streams: true,
            ..small_config()
        };

        let a = run_scenario(&scenario, &config).unwrap();
        let b = run_scenario(&scenario, &config).unwrap();
        assert_eq!(a.returns, b.returns);
        assert!(a.report.cvar >= a.report.var);
    }

    #[test]
    fn test_higher_volatility_means_more_risk() {
        let reports = run_scenarios(&list_scenarios(), &RunConfig::default()).unwrap();
        assert_eq!(reports.len(), 2);

        let optimistic = reports.iter().find(|r| r.scenario == "optimistic").unwrap();
        let pessimistic = reports.iter().find(|r| r.scenario == "pessimistic").unwrap();
        assert!(pessimistic.var > optimistic.var);
        assert!(pessimistic.final_values.std_dev > optimistic.final_values.std_dev);
    }

    #[test]
    fn test_scenario_order_does_not_change_results() {
        let mut scenarios = list_scenarios();
        let forward = run_scenarios(&scenarios, &small_config()).unwrap();
        scenarios.reverse();
        let backward = run_scenarios(&scenarios, &small_config()).unwrap();

        assert_eq!(forward[0].var, backward[1].var);
        assert_eq!(forward[1].cvar, backward[0].cvar);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let scenario = get_scenario("optimistic").unwrap();

        let bad_investment = RunConfig {
            initial_investment: -1.0,
            ..small_config()
        };
        assert!(matches!(
            run_scenario(&scenario, &bad_investment),
            Err(Error::InvalidParameter(_))
        ));

        let bad_confidence = RunConfig {
            confidence_level: 1.0,
            ..small_config()
        };
        assert!(matches!(
            run_scenario(&scenario, &bad_confidence),
            Err(Error::InvalidParameter(_))
        ));

        let no_days = RunConfig {
            days: 0,
            ..small_config()
        };
        assert!(matches!(
            run_scenario(&scenario, &no_days),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_report_serializes() {
        let scenario = get_scenario("optimistic").unwrap();
        let run = run_scenario(&scenario, &small_config()).unwrap();

        let json = serde_json::to_value(&run.report).unwrap();
        assert_eq!(json["scenario"], "optimistic");
        assert_eq!(json["seed"], 42);
        assert!(json["final_values"]["p95"].is_number());
    }
}
