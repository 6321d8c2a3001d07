//! Configuration management for kurumadai
//!
//! Config stored at: ~/.config/kurumadai/config.json

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Trip log CSV path override
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Roster CSV path
    #[serde(default)]
    pub roster_path: Option<PathBuf>,

    /// Distance table CSV path
    #[serde(default)]
    pub distance_table: Option<PathBuf>,

    /// Home ground name used as the distance origin
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Selectable flat fare tiers in yen
    #[serde(default = "default_fare_tiers")]
    pub fare_tiers: Vec<i64>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_origin() -> String {
    "ホームグラウンド".to_string()
}

fn default_fare_tiers() -> Vec<i64> {
    crate::domain::service::FARE_TIERS.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: None,
            roster_path: None,
            distance_table: None,
            origin: default_origin(),
            fare_tiers: default_fare_tiers(),
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("config directory not found".to_string()))?
            .join("kurumadai");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the trip log path (configured or the default data location)
    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.log_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| Error::Config("data directory not found".to_string()))?
            .join("kurumadai");
        Ok(data_dir.join("trips.csv"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Kurumadai Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Trip log:        {}",
            self.log_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(
            f,
            "Roster:          {}",
            self.roster_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string())
        )?;
        writeln!(
            f,
            "Distance table:  {}",
            self.distance_table
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string())
        )?;
        writeln!(f, "Origin:          {}", self.origin)?;
        writeln!(
            f,
            "Fare tiers:      {}",
            self.fare_tiers
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join("/")
        )?;
        writeln!(f, "Output format:   {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:     {}", path.display())?;
        }

        Ok(())
    }
}
