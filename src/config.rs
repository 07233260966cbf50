use crate::datasources::{FileForecaster, Forecaster, SyntheticForecaster};
use crate::error::{MaizeOpsError, Result};
use crate::logic::optimizer::{
    GeneticParams, GeneticStrategy, OptimizerSettings, SearchStrategy, SwarmParams, SwarmStrategy,
};
use crate::models::DayDomain;
use dialoguer::{Input, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub cycle: CycleConfig,
    pub optimizer: OptimizerConfig,
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CycleConfig {
    /// First admissible sowing day (day of year, 1-based)
    pub domain_start: i64,
    pub domain_end: i64,
    /// Days from sowing to harvest
    pub cycle_length: usize,
    /// Year used to turn days of year into calendar dates
    pub base_year: i32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            domain_start: 1,
            domain_end: 240,
            cycle_length: 120,
            base_year: 2026,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Genetic,
    #[default]
    Swarm,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Genetic => "genetic",
            StrategyKind::Swarm => "swarm",
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = MaizeOpsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "genetic" | "ga" => Ok(StrategyKind::Genetic),
            "swarm" | "pso" => Ok(StrategyKind::Swarm),
            other => Err(MaizeOpsError::Config(format!(
                "unknown strategy '{}', expected 'genetic' or 'swarm'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub strategy: StrategyKind,
    pub population_size: usize,
    pub generations: usize,
    pub seed: u64,
    /// Evaluate each population on the rayon thread pool
    pub parallel: bool,
    pub genetic: GeneticParams,
    pub swarm: SwarmParams,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            population_size: 20,
            generations: 50,
            seed: 42,
            parallel: true,
            genetic: GeneticParams::default(),
            swarm: SwarmParams::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn build_strategy(&self, kind: StrategyKind) -> Result<Box<dyn SearchStrategy>> {
        Ok(match kind {
            StrategyKind::Genetic => Box::new(GeneticStrategy::new(self.genetic)?),
            StrategyKind::Swarm => Box::new(SwarmStrategy::new(self.swarm)?),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastSource {
    #[default]
    Synthetic,
    File,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub source: ForecastSource,
    /// JSON forecast, required when `source` is `file`
    pub path: Option<PathBuf>,
    pub seed: u64,
    pub horizon_days: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            source: ForecastSource::default(),
            path: None,
            seed: 7,
            horizon_days: 365,
        }
    }
}

impl ForecastConfig {
    pub fn build(&self) -> Result<Box<dyn Forecaster>> {
        match self.source {
            ForecastSource::Synthetic => Ok(Box::new(SyntheticForecaster::new(
                self.seed,
                self.horizon_days,
            )?)),
            ForecastSource::File => {
                let path = self.path.as_ref().ok_or_else(|| {
                    MaizeOpsError::Config("forecast.path is required for a file forecast".into())
                })?;
                Ok(Box::new(FileForecaster::load(path)?))
            }
        }
    }
}

impl Config {
    /// Load from `config_override`, or the first config file found in the
    /// standard locations. Falls back to defaults when there is none.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(MaizeOpsError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::info!("No config file found, using defaults");
                    let config = Config::default();
                    config.validate()?;
                    return Ok(config);
                }
            },
        };

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| MaizeOpsError::Config(format!("Failed to read config: {}", e)))?;
        let config = Self::from_yaml(&config_str)?;

        tracing::info!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| MaizeOpsError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("maizeops").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Path of the config file `load` would read, if any.
    pub fn resolved_path(config_override: Option<&PathBuf>) -> Option<PathBuf> {
        match config_override {
            Some(p) => Some(p.clone()).filter(|p| p.exists()),
            None => Self::find_config_path(),
        }
    }

    /// Default path for writing new config files (~/.config/maizeops/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| MaizeOpsError::Config("Cannot determine config directory".into()))?
            .join("maizeops");
        Ok(config_dir.join("config.yaml"))
    }

    /// Check every section before a run starts.
    pub fn validate(&self) -> Result<()> {
        let settings = self.optimizer_settings()?;
        settings.validate()?;

        if self.cycle.cycle_length == 0 {
            return Err(MaizeOpsError::Config(
                "cycle_length must be at least one day".into(),
            ));
        }
        if chrono::NaiveDate::from_ymd_opt(self.cycle.base_year, 1, 1).is_none() {
            return Err(MaizeOpsError::Config(format!(
                "invalid base_year {}",
                self.cycle.base_year
            )));
        }

        self.optimizer.genetic.validate()?;
        self.optimizer.swarm.validate()?;

        if self.forecast.source == ForecastSource::File && self.forecast.path.is_none() {
            return Err(MaizeOpsError::Config(
                "forecast.path is required for a file forecast".into(),
            ));
        }
        if self.forecast.source == ForecastSource::Synthetic && self.forecast.horizon_days == 0 {
            return Err(MaizeOpsError::Config(
                "forecast.horizon_days must be at least 1".into(),
            ));
        }

        Ok(())
    }

    pub fn domain(&self) -> Result<DayDomain> {
        DayDomain::new(self.cycle.domain_start, self.cycle.domain_end)
    }

    pub fn optimizer_settings(&self) -> Result<OptimizerSettings> {
        Ok(OptimizerSettings {
            domain: self.domain()?,
            population_size: self.optimizer.population_size,
            generations: self.optimizer.generations,
            seed: self.optimizer.seed,
            parallel: self.optimizer.parallel,
        })
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let defaults = Config::default();

        println!();
        println!("Let's set up MaizeOps!");
        println!();

        // --- Cultivation cycle ---
        println!("Cultivation cycle");
        let domain_start: i64 = Input::new()
            .with_prompt("  Earliest sowing day (day of year)")
            .default(defaults.cycle.domain_start)
            .interact_text()
            .map_err(|e| MaizeOpsError::Config(format!("Input error: {}", e)))?;

        let domain_end: i64 = Input::new()
            .with_prompt("  Latest sowing day (day of year)")
            .default(defaults.cycle.domain_end)
            .interact_text()
            .map_err(|e| MaizeOpsError::Config(format!("Input error: {}", e)))?;

        let cycle_length: usize = Input::new()
            .with_prompt("  Cycle length (days)")
            .default(defaults.cycle.cycle_length)
            .interact_text()
            .map_err(|e| MaizeOpsError::Config(format!("Input error: {}", e)))?;

        let base_year: i32 = Input::new()
            .with_prompt("  Season year")
            .default(defaults.cycle.base_year)
            .interact_text()
            .map_err(|e| MaizeOpsError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Optimizer ---
        println!("Optimizer");
        let strategies = [StrategyKind::Swarm, StrategyKind::Genetic];
        let strategy_index = Select::new()
            .with_prompt("  Strategy")
            .items(&strategies.map(|s| s.as_str()))
            .default(0)
            .interact()
            .map_err(|e| MaizeOpsError::Config(format!("Input error: {}", e)))?;

        let population_size: usize = Input::new()
            .with_prompt("  Population size")
            .default(defaults.optimizer.population_size)
            .interact_text()
            .map_err(|e| MaizeOpsError::Config(format!("Input error: {}", e)))?;

        let generations: usize = Input::new()
            .with_prompt("  Generations")
            .default(defaults.optimizer.generations)
            .interact_text()
            .map_err(|e| MaizeOpsError::Config(format!("Input error: {}", e)))?;

        let seed: u64 = Input::new()
            .with_prompt("  Random seed")
            .default(defaults.optimizer.seed)
            .interact_text()
            .map_err(|e| MaizeOpsError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Forecast ---
        println!("Forecast (leave path blank for the synthetic season)");
        let path: String = Input::new()
            .with_prompt("  Forecast JSON path")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| MaizeOpsError::Config(format!("Input error: {}", e)))?;

        let forecast = if path.is_empty() {
            defaults.forecast.clone()
        } else {
            ForecastConfig {
                source: ForecastSource::File,
                path: Some(PathBuf::from(path)),
                ..defaults.forecast.clone()
            }
        };

        println!();

        let config = Config {
            cycle: CycleConfig {
                domain_start,
                domain_end,
                cycle_length,
                base_year,
            },
            optimizer: OptimizerConfig {
                strategy: strategies[strategy_index],
                population_size,
                generations,
                seed,
                ..defaults.optimizer
            },
            forecast,
        };
        config.validate()?;

        // Write to default config path
        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| MaizeOpsError::Config(format!("Failed to serialize config: {}", e)))?;

        // Write with a header comment
        let content = format!(
            "# MaizeOps Configuration\n# Generated by `maizeops init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| MaizeOpsError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.domain().unwrap(), DayDomain::default());
        assert_eq!(config.optimizer.strategy, StrategyKind::Swarm);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "optimizer:\n  strategy: genetic\n  generations: 10\n  genetic:\n    mutation_rate: 0.3\n",
        )
        .unwrap();
        assert_eq!(config.optimizer.strategy, StrategyKind::Genetic);
        assert_eq!(config.optimizer.generations, 10);
        assert_eq!(config.optimizer.population_size, 20);
        assert_eq!(config.optimizer.genetic.mutation_rate, 0.3);
        assert_eq!(config.optimizer.genetic.crossover_rate, 0.9);
        assert_eq!(config.cycle.cycle_length, 120);
    }

    #[test]
    fn invalid_settings_fail_fast() {
        assert!(Config::from_yaml("optimizer:\n  population_size: 1\n").is_err());
        assert!(Config::from_yaml("optimizer:\n  generations: 0\n").is_err());
        assert!(Config::from_yaml("cycle:\n  domain_start: 200\n  domain_end: 100\n").is_err());
        assert!(Config::from_yaml("forecast:\n  source: file\n").is_err());
        assert!(
            Config::from_yaml("optimizer:\n  swarm:\n    max_velocity_fraction: 2.0\n").is_err()
        );
    }

    #[test]
    fn env_vars_are_substituted() {
        std::env::set_var("MAIZEOPS_TEST_GENERATIONS", "7");
        let config = Config::from_yaml("optimizer:\n  generations: ${MAIZEOPS_TEST_GENERATIONS}\n")
            .unwrap();
        assert_eq!(config.optimizer.generations, 7);
    }

    #[test]
    fn strategy_names_parse() {
        assert_eq!("pso".parse::<StrategyKind>().unwrap(), StrategyKind::Swarm);
        assert_eq!("Genetic".parse::<StrategyKind>().unwrap(), StrategyKind::Genetic);
        assert!("annealing".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn builds_configured_strategy() {
        let config = Config::default();
        let strategy = config.optimizer.build_strategy(StrategyKind::Genetic).unwrap();
        assert_eq!(strategy.name(), "genetic");
        let strategy = config.optimizer.build_strategy(config.optimizer.strategy).unwrap();
        assert_eq!(strategy.name(), "swarm");
    }

    #[test]
    fn missing_override_is_an_error() {
        let missing = PathBuf::from("/nonexistent/maizeops/config.yaml");
        assert!(Config::load(Some(missing)).is_err());
    }
}
