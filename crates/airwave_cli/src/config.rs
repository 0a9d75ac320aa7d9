//! Airwave configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use airwave_core::demographics::{AGE_KEYS, GENDER_KEYS, TOTAL_FIELD};
use airwave_core::DemographicKeys;

pub const CONFIG_FILE: &str = "airwave.toml";

/// Top-level Airwave configuration (airwave.toml)
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct AirwaveConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub demographic: DemographicConfig,
    #[serde(default)]
    pub charts: ChartsConfig,
}

/// Aggregation settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct PipelineConfig {
    /// Number of categories kept per series
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    10
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

/// Columns of the demographic table
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct DemographicConfig {
    #[serde(default = "default_age_keys")]
    pub age_keys: Vec<String>,
    #[serde(default = "default_gender_keys")]
    pub gender_keys: Vec<String>,
    #[serde(default = "default_total_field")]
    pub total_field: String,
}

fn default_age_keys() -> Vec<String> {
    AGE_KEYS.iter().map(|k| k.to_string()).collect()
}

fn default_gender_keys() -> Vec<String> {
    GENDER_KEYS.iter().map(|k| k.to_string()).collect()
}

fn default_total_field() -> String {
    TOTAL_FIELD.to_string()
}

impl Default for DemographicConfig {
    fn default() -> Self {
        Self {
            age_keys: default_age_keys(),
            gender_keys: default_gender_keys(),
            total_field: default_total_field(),
        }
    }
}

/// Chart runtime settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ChartsConfig {
    /// Update transition length in milliseconds
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

fn default_transition_ms() -> u64 {
    300
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
        }
    }
}

impl AirwaveConfig {
    /// Load configuration from a directory (looks for airwave.toml)
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found in {}. Run `airwave init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: AirwaveConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it holds a config, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let exists = path.is_file() || path.join(CONFIG_FILE).exists();
        if exists {
            Self::load_from_dir(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.pipeline.top_n > 0, "[pipeline] top_n must be at least 1");
        anyhow::ensure!(
            !self.demographic.total_field.is_empty(),
            "[demographic] total_field must not be empty"
        );
        Ok(())
    }

    pub fn top_n(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.pipeline.top_n).context("[pipeline] top_n must be at least 1")
    }

    pub fn demographic_keys(&self) -> DemographicKeys {
        DemographicKeys {
            age: self.demographic.age_keys.clone(),
            gender: self.demographic.gender_keys.clone(),
            total_field: self.demographic.total_field.clone(),
        }
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.charts.transition_ms)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_sections_use_defaults() {
        let config: AirwaveConfig = toml::from_str("[pipeline]\ntop_n = 3\n").unwrap();
        assert_eq!(config.pipeline.top_n, 3);
        assert_eq!(config.demographic, DemographicConfig::default());
        assert_eq!(config.transition(), Duration::from_millis(300));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = AirwaveConfig::default();
        let text = config.to_toml().unwrap();
        let back: AirwaveConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[pipeline]\ntop_n = 0\n").unwrap();
        assert!(AirwaveConfig::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn absent_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AirwaveConfig::load_from_dir(dir.path()).is_err());
        assert_eq!(
            AirwaveConfig::load_or_default(dir.path()).unwrap(),
            AirwaveConfig::default()
        );
    }
}
