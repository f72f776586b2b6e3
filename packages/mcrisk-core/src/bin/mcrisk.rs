//! mcrisk CLI - Command line interface for Monte Carlo risk runs.
//!
//! Prints JSON envelopes on stdout; logs go to stderr (`RUST_LOG` to tune).

use clap::{Args, Parser, Subcommand};
use mcrisk_core::{
    run_scenario, run_scenarios, write_csv_report, write_json_report, ApiResponse, Error,
    RunConfig, Scenario, ScenarioBook, ScenarioReport,
};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "mcrisk")]
#[command(about = "Monte Carlo portfolio simulation with VaR and CVaR")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scenario catalogue commands
    Scenario {
        #[command(subcommand)]
        action: ScenarioAction,
    },
    /// Run one scenario, by name or from ad hoc parameters
    Run {
        /// Scenario name from the catalogue
        #[arg(short, long, conflicts_with_all = ["mu", "sigma"])]
        scenario: Option<String>,
        /// Annualized expected return for an ad hoc scenario
        #[arg(long, requires = "sigma", allow_negative_numbers = true)]
        mu: Option<f64>,
        /// Annualized volatility for an ad hoc scenario
        #[arg(long, requires = "mu")]
        sigma: Option<f64>,
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run every scenario in the catalogue
    RunAll {
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
enum ScenarioAction {
    /// List available scenarios
    List,
    /// Get scenario details
    Get {
        /// Scenario name
        #[arg(short, long)]
        name: String,
    },
    /// Add or replace a scenario in the catalogue file
    Add {
        /// Scenario name
        #[arg(short, long)]
        name: String,
        /// Annualized expected return
        #[arg(long, allow_negative_numbers = true)]
        mu: f64,
        /// Annualized volatility
        #[arg(long)]
        sigma: f64,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Starting portfolio value
    #[arg(short, long, default_value = "10000")]
    investment: f64,
    /// Trading days per path
    #[arg(short, long, default_value = "252")]
    days: usize,
    /// Number of simulated paths
    #[arg(short = 'n', long, default_value = "500")]
    simulations: usize,
    /// Confidence level for VaR/CVaR (0.95 = 95%)
    #[arg(short, long, default_value = "0.95")]
    confidence: f64,
    /// Random seed
    #[arg(long, default_value = "42", conflicts_with = "no_seed")]
    seed: u64,
    /// Draw from OS entropy instead of a fixed seed
    #[arg(long)]
    no_seed: bool,
    /// Use an independent random sub-stream per path
    #[arg(long)]
    sub_streams: bool,
}

impl RunArgs {
    fn config(&self) -> RunConfig {
        RunConfig {
            initial_investment: self.investment,
            days: self.days,
            simulations: self.simulations,
            confidence_level: self.confidence,
            seed: if self.no_seed { None } else { Some(self.seed) },
            sub_streams: self.sub_streams,
        }
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Also write the report(s) as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also write the report(s) as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl OutputArgs {
    fn write(&self, reports: &[ScenarioReport]) -> mcrisk_core::Result<()> {
        if let Some(path) = &self.output {
            write_json_report(path, reports)?;
        }
        if let Some(path) = &self.csv {
            write_csv_report(path, reports)?;
        }
        Ok(())
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Scenario { action } => handle_scenario(action),
        Commands::Run {
            scenario,
            mu,
            sigma,
            run,
            output,
        } => handle_run(scenario, mu.zip(sigma), &run, &output),
        Commands::RunAll { run, output } => handle_run_all(&run, &output),
    };

    println!("{}", output);
}

fn render<T: Serialize>(result: mcrisk_core::Result<T>) -> String {
    let rendered = match result {
        Ok(data) => serde_json::to_string_pretty(&ApiResponse::ok(data)),
        Err(e) => {
            tracing::error!("{}", e);
            serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string()))
        }
    };
    rendered.unwrap_or_else(|e| format!(r#"{{"ok": false, "error": "{}"}}"#, e))
}

fn handle_scenario(action: ScenarioAction) -> String {
    let book = match ScenarioBook::load() {
        Ok(book) => book,
        Err(e) => return render::<()>(Err(e)),
    };

    match action {
        ScenarioAction::List => render(Ok(json!({
            "scenarios": book.list(),
            "catalogue": book.path(),
        }))),
        ScenarioAction::Get { name } => render(book.require(&name)),
        ScenarioAction::Add {
            name,
            mu,
            sigma,
            description,
        } => {
            let scenario = Scenario::new(&name, mu, sigma).with_description(description);
            render(add_scenario(book, scenario))
        }
    }
}

fn add_scenario(
    mut book: ScenarioBook,
    scenario: Scenario,
) -> mcrisk_core::Result<serde_json::Value> {
    let replaced = book.insert(scenario.clone())?;
    book.save()?;
    Ok(json!({
        "scenario": scenario,
        "action": if replaced.is_some() { "updated" } else { "added" },
        "catalogue": book.path(),
    }))
}

fn handle_run(
    name: Option<String>,
    ad_hoc: Option<(f64, f64)>,
    run: &RunArgs,
    output: &OutputArgs,
) -> String {
    let scenario = match (name, ad_hoc) {
        (_, Some((mu, sigma))) => Ok(Scenario::new("custom", mu, sigma)),
        (Some(name), None) => ScenarioBook::load().and_then(|book| book.require(&name).cloned()),
        (None, None) => Err(Error::InvalidParameter(
            "pass --scenario NAME or both --mu and --sigma".to_string(),
        )),
    };

    render(scenario.and_then(|scenario| {
        let report = run_scenario(&scenario, &run.config())?.report;
        output.write(std::slice::from_ref(&report))?;
        Ok(report)
    }))
}

fn handle_run_all(run: &RunArgs, output: &OutputArgs) -> String {
    render(ScenarioBook::load().and_then(|book| {
        let scenarios: Vec<Scenario> = book.list().into_iter().cloned().collect();
        let reports = run_scenarios(&scenarios, &run.config())?;
        output.write(&reports)?;
        Ok(json!({
            "reports": reports,
            "written": written_paths(output),
        }))
    }))
}

fn written_paths(output: &OutputArgs) -> Vec<&Path> {
    [&output.output, &output.csv]
        .into_iter()
        .filter_map(|path| path.as_deref())
        .collect()
}
