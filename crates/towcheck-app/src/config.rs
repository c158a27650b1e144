//! Configuration management for towcheck
//!
//! Config stored at: ~/.config/towcheck/config.json
//! (`TOWCHECK_CONFIG` overrides the path)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use towcheck_domain::ComplianceRules;
use towcheck_types::{ConfigError, OutputFormat, Result};

pub const CONFIG_ENV: &str = "TOWCHECK_CONFIG";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Directory for exported report documents (defaults to the working directory)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Worker threads for batch evaluation. 0 = CPU count.
    #[serde(default)]
    pub jobs: usize,

    /// Fallback ratio and advisory bands
    #[serde(default)]
    pub rules: ComplianceRules,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            export_dir: None,
            jobs: 0,
            rules: ComplianceRules::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("towcheck");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory exports are written to
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Update one setting from a `key=value` pair.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let ratio = || -> Result<f64> {
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| ConfigError::ParseError(format!("{} = {}", key, value)).into())
        };

        match key {
            "output_format" => {
                self.output_format = match value.trim() {
                    "table" => OutputFormat::Table,
                    "json" => OutputFormat::Json,
                    other => {
                        return Err(ConfigError::ParseError(format!("output_format = {}", other)).into())
                    }
                }
            }
            "export_dir" => {
                self.export_dir = Some(value.trim())
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from);
            }
            "jobs" => {
                self.jobs = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::ParseError(format!("jobs = {}", value)))?;
            }
            "rules.tbm_fallback_ratio" => self.rules.tbm_fallback_ratio = ratio()?,
            "rules.van_to_car_ideal_max" => self.rules.van_to_car_ideal_max = ratio()?,
            "rules.tow_ball_ideal_min" => self.rules.tow_ball_ideal_min = ratio()?,
            "rules.tow_ball_ideal_max" => self.rules.tow_ball_ideal_max = ratio()?,
            "rules.btc_ideal_max" => self.rules.btc_ideal_max = ratio()?,
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        }
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Towcheck Configuration")?;
        writeln!(f, "======================")?;
        writeln!(f)?;
        writeln!(f, "Output format:        {}", self.output_format)?;
        writeln!(f, "Export dir:           {}", self.export_dir().display())?;
        if self.jobs == 0 {
            writeln!(f, "Batch jobs:           auto ({})", num_cpus::get())?;
        } else {
            writeln!(f, "Batch jobs:           {}", self.jobs)?;
        }
        writeln!(f, "TBM fallback ratio:   {}", self.rules.tbm_fallback_ratio)?;
        writeln!(f, "Van to car ideal:     < {}", self.rules.van_to_car_ideal_max)?;
        writeln!(
            f,
            "Tow ball ideal:       {} - {}",
            self.rules.tow_ball_ideal_min, self.rules.tow_ball_ideal_max
        )?;
        writeln!(f, "BTC ratio ideal:      < {}", self.rules.btc_ideal_max)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:          {}", path.display())?;
        }

        Ok(())
    }
}
