//! Named scenarios and the on-disk scenario catalogue.

use crate::types::SimulationParams;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// A named return/volatility assumption.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Scenario identifier (lowercase)
    pub name: String,
    /// What market regime the scenario represents
    #[serde(default)]
    pub description: String,
    /// Annualized expected return
    pub mu: f64,
    /// Annualized volatility
    pub sigma: f64,
}

impl Scenario {
    /// Create a scenario; the name is stored lowercase.
    pub fn new(name: &str, mu: f64, sigma: f64) -> Self {
        Self {
            name: name.to_lowercase(),
            description: String::new(),
            mu,
            sigma,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Simulation parameters for this scenario.
    pub fn params(&self, days: usize, simulations: usize, seed: Option<u64>) -> SimulationParams {
        SimulationParams::new(self.mu, self.sigma, days, simulations, seed)
    }

    /// Reject scenarios whose drift or volatility is out of domain.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidParameter(
                "scenario name must not be empty".to_string(),
            ));
        }
        self.params(1, 1, None).validate()
    }
}

/// Built-in scenarios.
pub static BUILTIN_SCENARIOS: LazyLock<BTreeMap<String, Scenario>> = LazyLock::new(|| {
    let mut scenarios = BTreeMap::new();

    scenarios.insert(
        "optimistic".to_string(),
        Scenario::new("optimistic", 0.10, 0.10)
            .with_description("Steady growth: 10% expected return at 10% volatility"),
    );

    scenarios.insert(
        "pessimistic".to_string(),
        Scenario::new("pessimistic", 0.03, 0.25)
            .with_description("Weak, turbulent market: 3% expected return at 25% volatility"),
    );

    scenarios
});

/// List all built-in scenarios, ordered by name.
pub fn list_scenarios() -> Vec<Scenario> {
    BUILTIN_SCENARIOS.values().cloned().collect()
}

/// Get a built-in scenario by name (case-insensitive).
pub fn get_scenario(name: &str) -> Option<Scenario> {
    BUILTIN_SCENARIOS.get(&name.to_lowercase()).cloned()
}

#[derive(Serialize, Deserialize)]
struct CatalogueFile {
    scenarios: Vec<Scenario>,
}

/// Scenario catalogue: the built-ins overlaid with user scenarios from a JSON file.
#[derive(Debug)]
pub struct ScenarioBook {
    /// Path to the catalogue JSON file
    path: PathBuf,
    /// Scenarios keyed by lowercase name
    scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioBook {
    /// Load the catalogue from the default path.
    ///
    /// Default path: `~/.mcrisk/scenarios.json`
    /// Can be overridden with `MCRISK_SCENARIOS_FILE` environment variable.
    pub fn load() -> Result<Self> {
        Self::load_from_path(Self::default_path())
    }

    /// Load the catalogue from a specific path. A missing file yields the built-ins.
    pub fn load_from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let user = Self::read_file(&path)?;

        let mut book = Self {
            path,
            scenarios: (*BUILTIN_SCENARIOS).clone(),
        };
        for scenario in user {
            book.insert(scenario)?;
        }

        tracing::debug!(path = %book.path.display(), count = book.len(), "loaded scenarios");
        Ok(book)
    }

    /// A catalogue with only the built-ins and no backing file.
    pub fn builtin() -> Self {
        Self {
            path: PathBuf::new(),
            scenarios: (*BUILTIN_SCENARIOS).clone(),
        }
    }

    /// Get the default catalogue file path.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("MCRISK_SCENARIOS_FILE") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".mcrisk/scenarios.json"))
            .unwrap_or_else(|| PathBuf::from("scenarios.json"))
    }

    /// Get the current path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Accepts either `{"scenarios": [...]}` or a bare array.
    fn read_file(path: &Path) -> Result<Vec<Scenario>> {
        if !path.is_file() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        let data: serde_json::Value = serde_json::from_str(&content)?;

        if data.is_array() {
            return Ok(serde_json::from_value(data)?);
        }

        let file: CatalogueFile = serde_json::from_value(data)?;
        Ok(file.scenarios)
    }

    /// Save the non-built-in and overridden scenarios to the catalogue path.
    pub fn save(&self) -> Result<()> {
        // Skip if in-memory only
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        self.save_to_path(&self.path)
    }

    /// Save user scenarios to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = CatalogueFile {
            scenarios: self
                .scenarios
                .values()
                .filter(|s| BUILTIN_SCENARIOS.get(&s.name) != Some(s))
                .cloned()
                .collect(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Add or replace a scenario. Returns the scenario it replaced, if any.
    pub fn insert(&mut self, mut scenario: Scenario) -> Result<Option<Scenario>> {
        scenario.validate()?;
        scenario.name = scenario.name.to_lowercase();
        Ok(self.scenarios.insert(scenario.name.clone(), scenario))
    }

    /// Get a scenario by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.get(&name.to_lowercase())
    }

    /// Get a scenario by name, failing with `Error::UnknownScenario`.
    pub fn require(&self, name: &str) -> Result<&Scenario> {
        self.get(name).ok_or_else(|| {
            let available: Vec<&str> = self.scenarios.keys().map(String::as_str).collect();
            Error::UnknownScenario(format!("{} (available: {})", name, available.join(", ")))
        })
    }

    /// All scenarios, ordered by name.
    pub fn list(&self) -> Vec<&Scenario> {
        self.scenarios.values().collect()
    }

    /// Number of scenarios.
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// True if the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl Default for ScenarioBook {
    fn default() -> Self {
        Self::builtin()
    }
}
