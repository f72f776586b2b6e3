//! Report export for scenario results.

use crate::scenario::ScenarioReport;
use crate::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// One flat CSV row; nested summaries are left to the JSON report.
#[derive(Serialize)]
struct CsvRow<'a> {
    scenario: &'a str,
    initial_investment: f64,
    mu: f64,
    sigma: f64,
    days: usize,
    simulations: usize,
    confidence_level: f64,
    var: f64,
    cvar: f64,
}

impl<'a> From<&'a ScenarioReport> for CsvRow<'a> {
    fn from(report: &'a ScenarioReport) -> Self {
        Self {
            scenario: &report.scenario,
            initial_investment: report.initial_investment,
            mu: report.mu,
            sigma: report.sigma,
            days: report.days,
            simulations: report.simulations,
            confidence_level: report.confidence_level,
            var: report.var,
            cvar: report.cvar,
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write reports as a pretty-printed JSON array, creating parent directories.
pub fn write_json_report(path: &Path, reports: &[ScenarioReport]) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_string_pretty(reports)?)?;
    tracing::debug!(path = %path.display(), count = reports.len(), "wrote JSON report");
    Ok(())
}

/// Write one CSV row per report, creating parent directories.
///
/// Columns: scenario, initial_investment, mu, sigma, days, simulations,
/// confidence_level, var, cvar.
pub fn write_csv_report(path: &Path, reports: &[ScenarioReport]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for report in reports {
        writer.serialize(CsvRow::from(report))?;
    }
    writer.flush()?;
    tracing::debug!(path = %path.display(), count = reports.len(), "wrote CSV report");
    Ok(())
}
