//! Scenario driver.
//!
//! Named return/volatility assumptions, a JSON-backed catalogue and the
//! pipeline runner that turns a scenario into a report record.

mod catalogue;
mod runner;

pub use catalogue::{get_scenario, list_scenarios, Scenario, ScenarioBook, BUILTIN_SCENARIOS};
pub use runner::{run_scenario, run_scenarios, RunConfig, ScenarioReport, ScenarioRun};
